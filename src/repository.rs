use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{
    errors::DatabaseError,
    fields::{Inviter, NewUser, PhoneNumber, ReferralCode},
    model::DbInviter,
};

/// Storage capability shared by the user registry and the referral ledger.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts the user unless a row with the same id already exists.
    async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError>;

    /// Overwrites the phone number and returns the number of rows affected.
    async fn set_phone_number(
        &self,
        user_id: i64,
        phone_number: &PhoneNumber,
    ) -> Result<u64, DatabaseError>;

    /// Returns `false` when the code was already taken and nothing was stored.
    async fn insert_referral(
        &self,
        code: &ReferralCode,
        user_id: i64,
    ) -> Result<bool, DatabaseError>;

    async fn find_inviter(&self, code: &ReferralCode) -> Result<Option<Inviter>, DatabaseError>;
}

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError> {
        sqlx::query(
            "insert into users (user_id, username, first_name, last_name) values ($1, $2, $3, $4) on conflict (user_id) do nothing",
        )
        .bind(user.user_id)
        .bind(user.username.as_ref().map(|u| u.inner()))
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("saving user failed >>> {}", e);
            DatabaseError::ServerError
        })?;

        Ok(())
    }

    async fn set_phone_number(
        &self,
        user_id: i64,
        phone_number: &PhoneNumber,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query("update users set phone_number = $1 where user_id = $2")
            .bind(phone_number.as_ref())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("saving phone number failed >>> {}", e);
                DatabaseError::ServerError
            })?;

        Ok(result.rows_affected())
    }

    async fn insert_referral(
        &self,
        code: &ReferralCode,
        user_id: i64,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "insert into referrals (referral_code, user_id) values ($1, $2) on conflict (referral_code) do nothing",
        )
        .bind(code.as_str())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("creating referral failed >>> {}", e);
            DatabaseError::ServerError
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_inviter(&self, code: &ReferralCode) -> Result<Option<Inviter>, DatabaseError> {
        let inviter = sqlx::query_as::<_, DbInviter>(
            "select u.user_id, u.username from referrals as r join users as u on r.user_id = u.user_id where r.referral_code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get inviter by referral code failed >>> {}", e);
            DatabaseError::ServerError
        })?;

        Ok(inviter.map(|i| i.into()))
    }
}

use std::sync::Arc;

use crate::{
    domain::{
        errors::DatabaseError,
        fields::{NewUser, PhoneNumber},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UserRegistry {
    repository: Arc<dyn Repository>,
}

impl UserRegistry {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Records the user on first contact. Repeat registrations keep the
    /// originally stored names. Failures are logged and swallowed.
    pub async fn register(&self, user: &NewUser) {
        if let Err(e) = self.repository.insert_user(user).await {
            tracing::error!(user_id = user.user_id, "registering user failed >>> {}", e);
        }
    }

    /// Returns the number of rows updated; an unknown user yields `Ok(0)`.
    pub async fn attach_phone(
        &self,
        user_id: i64,
        phone_number: &PhoneNumber,
    ) -> Result<u64, DatabaseError> {
        let updated = self
            .repository
            .set_phone_number(user_id, phone_number)
            .await?;
        tracing::info!(user_id, updated, "phone number attached");
        Ok(updated)
    }
}

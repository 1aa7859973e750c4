use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    domain::{
        errors::{DatabaseError, TransportError},
        fields::{Inviter, NewUser, PhoneNumber, ReferralCode, Username},
    },
    repository::Repository,
    telegram::{types::ReplyKeyboardMarkup, Messenger},
};

#[derive(Clone, Debug, Default)]
pub struct StoredUser {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<i64, StoredUser>,
    referrals: HashMap<String, i64>,
}

/// Mirrors the Postgres schema: primary keys, the referrals foreign key and
/// the insert-or-ignore statements.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl InMemoryRepository {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn seed_user(&self, user: NewUser) {
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(user.user_id, stored(&user));
    }

    pub fn seed_referral(&self, code: &ReferralCode, user_id: i64) {
        self.tables
            .lock()
            .unwrap()
            .referrals
            .insert(code.as_str().to_owned(), user_id);
    }

    pub fn user(&self, user_id: i64) -> Option<StoredUser> {
        self.tables.lock().unwrap().users.get(&user_id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn referral_owner(&self, code: &ReferralCode) -> Option<i64> {
        self.tables
            .lock()
            .unwrap()
            .referrals
            .get(code.as_str())
            .copied()
    }

    pub fn referral_count(&self) -> usize {
        self.tables.lock().unwrap().referrals.len()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::ServerError);
        }
        Ok(())
    }
}

fn stored(user: &NewUser) -> StoredUser {
    StoredUser {
        username: user.username.as_ref().map(|u| u.inner()),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        phone_number: None,
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .users
            .entry(user.user_id)
            .or_insert_with(|| stored(user));
        Ok(())
    }

    async fn set_phone_number(
        &self,
        user_id: i64,
        phone_number: &PhoneNumber,
    ) -> Result<u64, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.users.get_mut(&user_id) {
            Some(user) => {
                user.phone_number = Some(phone_number.inner());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert_referral(
        &self,
        code: &ReferralCode,
        user_id: i64,
    ) -> Result<bool, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::ServerError);
        }
        if tables.referrals.contains_key(code.as_str()) {
            return Ok(false);
        }
        tables.referrals.insert(code.as_str().to_owned(), user_id);
        Ok(true)
    }

    async fn find_inviter(&self, code: &ReferralCode) -> Result<Option<Inviter>, DatabaseError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let inviter = tables.referrals.get(code.as_str()).and_then(|user_id| {
            tables.users.get(user_id).map(|user| Inviter {
                user_id: *user_id,
                username: user
                    .username
                    .clone()
                    .filter(|u| !u.is_empty())
                    .map(Username::from),
            })
        });
        Ok(inviter)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<ReplyKeyboardMarkup>,
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<SentMessage>>,
    failing: AtomicBool,
}

impl RecordingMessenger {
    pub fn fail_sends(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                method: "sendMessage",
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_owned(),
            keyboard,
        });
        Ok(())
    }
}

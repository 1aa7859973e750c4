use rand::{distributions::Uniform, prelude::Distribution, Rng};
use std::fmt::Display;

use super::model::DbInviter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub const LENGTH: usize = 8;
    const ALPHABET: &'static [u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Draws [`Self::LENGTH`] independent uniform samples from `[a-zA-Z0-9]`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let uni_sample = Uniform::from(0..Self::ALPHABET.len());
        let code = (0..Self::LENGTH)
            .map(|_| Self::ALPHABET[uni_sample.sample(&mut *rng)] as char)
            .collect();
        Self(code)
    }

    /// Accepts only strings that could have been produced by [`Self::generate`].
    pub fn parse(value: &str) -> Option<Self> {
        let well_formed =
            value.len() == Self::LENGTH && value.bytes().all(|b| Self::ALPHABET.contains(&b));
        well_formed.then(|| Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for PhoneNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Identity fields captured on first contact with the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: i64,
    pub username: Option<Username>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The owner of a referral code, as resolved at lookup time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inviter {
    pub user_id: i64,
    pub username: Option<Username>,
}

impl Inviter {
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) => username.inner(),
            None => format!("user with ID {}", self.user_id),
        }
    }
}

impl From<DbInviter> for Inviter {
    fn from(value: DbInviter) -> Self {
        Self {
            user_id: value.user_id,
            username: value
                .username
                .filter(|u| !u.is_empty())
                .map(Username::from),
        }
    }
}

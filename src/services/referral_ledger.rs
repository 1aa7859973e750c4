use std::sync::{Arc, Mutex, PoisonError};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    domain::{
        errors::{DatabaseError, LedgerError},
        fields::{Inviter, ReferralCode},
    },
    repository::Repository,
};

/// Issues referral codes and resolves them back to the inviting user.
pub struct ReferralLedger {
    repository: Arc<dyn Repository>,
    rng: Mutex<StdRng>,
    max_attempts: u32,
}

impl ReferralLedger {
    pub fn new(repository: Arc<dyn Repository>, max_attempts: u32) -> Self {
        Self::with_rng(repository, max_attempts, StdRng::from_entropy())
    }

    pub fn with_rng(repository: Arc<dyn Repository>, max_attempts: u32, rng: StdRng) -> Self {
        Self {
            repository,
            rng: Mutex::new(rng),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Generates and stores a fresh code owned by `user_id`. A code that
    /// collides with an existing row is discarded and another one drawn, so
    /// the returned code is always resolvable.
    pub async fn create_code(&self, user_id: i64) -> Result<ReferralCode, LedgerError> {
        for attempt in 1..=self.max_attempts {
            let code = self.next_code();
            if self.repository.insert_referral(&code, user_id).await? {
                tracing::info!(user_id, attempt, "referral code created");
                return Ok(code);
            }
            tracing::warn!(user_id, attempt, "referral code collision, drawing again");
        }

        Err(LedgerError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    /// `Ok(None)` covers both unknown codes and strings that are not
    /// well-formed codes at all.
    pub async fn resolve_code(&self, code: &str) -> Result<Option<Inviter>, DatabaseError> {
        let Some(code) = ReferralCode::parse(code) else {
            return Ok(None);
        };
        self.repository.find_inviter(&code).await
    }

    fn next_code(&self) -> ReferralCode {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        ReferralCode::generate(&mut *rng)
    }
}

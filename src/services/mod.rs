pub mod referral_ledger;
pub mod user_registry;

pub use referral_ledger::ReferralLedger;
pub use user_registry::UserRegistry;

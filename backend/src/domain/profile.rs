//! User profile aggregate.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UserId;

/// One row per identity holding the integer credit balance.
///
/// Mutated only through the conditional debit on the profile repository
/// (decrement) and external top-up processes (increment, out of scope here).
/// The conditional debit keeps `credits` non-negative even under concurrent
/// uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Owning identity.
    pub user_id: UserId,
    /// Remaining credit balance.
    pub credits: i64,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Whether the balance covers an operation of the given cost.
    pub const fn covers(&self, cost: u32) -> bool {
        self.credits >= cost as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(credits: i64) -> Profile {
        Profile {
            user_id: UserId::random(),
            credits,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn covers_compares_balance_against_cost() {
        assert!(profile(1).covers(1));
        assert!(!profile(0).covers(1));
        assert!(!profile(2).covers(3));
    }
}

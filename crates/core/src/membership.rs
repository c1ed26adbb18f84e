//! Membership tier/status vocabulary and Stripe subscription status mapping.

use crate::error::{validate_one_of, CoreError};

pub const TIER_BASIC: &str = "basic";
pub const TIER_PRO: &str = "pro";
pub const TIER_ENTERPRISE: &str = "enterprise";

/// All valid membership tiers, cheapest first.
pub const VALID_TIERS: &[&str] = &[TIER_BASIC, TIER_PRO, TIER_ENTERPRISE];

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_EXPIRED: &str = "expired";

pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_CANCELLED, STATUS_EXPIRED];

pub fn validate_tier(tier: &str) -> Result<(), CoreError> {
    validate_one_of(tier, VALID_TIERS, "membership tier")
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_STATUSES, "membership status")
}

/// Map a Stripe subscription status onto a membership status.
///
/// Returns `None` for transitional Stripe states (`trialing`, `past_due`,
/// `incomplete`, `paused`) which leave the membership unchanged.
pub fn map_stripe_subscription_status(stripe_status: &str) -> Option<&'static str> {
    match stripe_status {
        "active" => Some(STATUS_ACTIVE),
        "canceled" => Some(STATUS_CANCELLED),
        "incomplete_expired" | "unpaid" => Some(STATUS_EXPIRED),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_and_statuses_validate() {
        for t in VALID_TIERS {
            assert!(validate_tier(t).is_ok());
        }
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_tier("platinum").is_err());
        assert!(validate_status("paused").is_err());
    }

    #[test]
    fn stripe_status_mapping() {
        assert_eq!(map_stripe_subscription_status("active"), Some(STATUS_ACTIVE));
        assert_eq!(map_stripe_subscription_status("canceled"), Some(STATUS_CANCELLED));
        assert_eq!(map_stripe_subscription_status("unpaid"), Some(STATUS_EXPIRED));
        assert_eq!(map_stripe_subscription_status("trialing"), None);
    }
}

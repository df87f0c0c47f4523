use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "referral_status", rename_all = "snake_case")]
pub enum ReferralStatus {
    Active,
    Inactive,
}

impl ReferralStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ReferralStatus::Active => "active",
            ReferralStatus::Inactive => "inactive",
        }
    }
}

/// One edge of the referral graph, written once at the referred user's
/// registration time for every ancestor up to 12 levels. total_earnings is
/// denormalized; referral_commissions rows are the source of truth.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Referral {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_user_id: Uuid,
    pub level: i32,
    pub status: ReferralStatus,
    pub total_earnings: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ReferralCommission {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub investment_id: Uuid, // the investor's position that matured the ROI
    pub amount: i64,
    pub level: i32,
    pub created_at: Option<DateTime<Utc>>,
}

use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub username: String,
    pub email: String,

    // Referral graph: referral_code is this user's own code, referred_by is
    // the code of whoever referred them (sole upward edge).
    pub referral_code: String,
    pub referred_by: Option<String>,

    // All monetary fields are integer cents.
    pub balance: i64,
    pub total_invested: i64,
    pub total_earnings: i64,
    pub total_withdrawn: i64,

    pub points: i64,
    pub pending_points: i64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn balance_in_dollars(&self) -> f64 {
        self.balance as f64 / 100.0
    }

    pub fn total_earnings_in_dollars(&self) -> f64 {
        self.total_earnings as f64 / 100.0
    }
}

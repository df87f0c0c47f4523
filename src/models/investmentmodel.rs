// models/investmentmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "investment_plan", rename_all = "snake_case")]
pub enum InvestmentPlan {
    Starter,
    Silver,
    Gold,
    Platinum,
}

impl InvestmentPlan {
    pub fn to_str(&self) -> &str {
        match self {
            InvestmentPlan::Starter => "starter",
            InvestmentPlan::Silver => "silver",
            InvestmentPlan::Gold => "gold",
            InvestmentPlan::Platinum => "platinum",
        }
    }

    /// Daily ROI band in percent. The actual rate is sampled uniformly
    /// within this band once, when the position is opened.
    pub fn roi_band(&self) -> (f64, f64) {
        match self {
            InvestmentPlan::Starter => (1.0, 1.5),
            InvestmentPlan::Silver => (1.5, 2.0),
            InvestmentPlan::Gold => (2.0, 2.5),
            InvestmentPlan::Platinum => (2.5, 3.0),
        }
    }

    pub fn duration_days(&self) -> i64 {
        match self {
            InvestmentPlan::Starter => 365,
            InvestmentPlan::Silver => 300,
            InvestmentPlan::Gold => 250,
            InvestmentPlan::Platinum => 200,
        }
    }

    /// Minimum principal in cents.
    pub fn minimum_amount(&self) -> i64 {
        match self {
            InvestmentPlan::Starter => 5_000,
            InvestmentPlan::Silver => 50_000,
            InvestmentPlan::Gold => 250_000,
            InvestmentPlan::Platinum => 1_000_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "investment_status", rename_all = "snake_case")]
pub enum InvestmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl InvestmentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: InvestmentPlan,
    pub amount: i64, // principal in cents, immutable after creation
    pub roi_percentage: f64,
    pub daily_return: i64, // cents, fixed at creation
    pub total_returns: i64,
    pub total_roi_earned: i64,
    pub total_commission_earned: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: InvestmentStatus,
    pub last_paid_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Investment {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    pub fn amount_in_dollars(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

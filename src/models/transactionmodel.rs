// models/transactionmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Roi,
    Referral,
    Task,
}

impl TransactionType {
    pub fn to_str(&self) -> &str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Roi => "roi",
            TransactionType::Referral => "referral",
            TransactionType::Task => "task",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_status", rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Append-only ledger row for every balance-affecting event.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: i64, // cents
    pub status: TransactionStatus,
    pub reference: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn amount_in_dollars(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

pub fn generate_transaction_reference() -> String {
    format!(
        "INV_{}",
        uuid::Uuid::new_v4().to_string().replace("-", "").to_uppercase()[..16].to_string()
    )
}

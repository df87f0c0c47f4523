// db/transactiondb.rs
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::transactionmodel::{
    generate_transaction_reference, Transaction, TransactionType,
};

#[async_trait]
pub trait TransactionExt {
    /// Append one completed ledger row. The reference is generated here so
    /// callers never collide on it.
    async fn record_transaction(
        &self,
        user_id: Uuid,
        transaction_type: TransactionType,
        amount: i64,
        description: String,
        metadata: Option<JsonValue>,
    ) -> Result<Transaction, sqlx::Error>;
}

#[async_trait]
impl TransactionExt for DBClient {
    async fn record_transaction(
        &self,
        user_id: Uuid,
        transaction_type: TransactionType,
        amount: i64,
        description: String,
        metadata: Option<JsonValue>,
    ) -> Result<Transaction, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (user_id, transaction_type, amount, status, reference, description, metadata, completed_at)
            VALUES ($1, $2, $3, 'completed'::transaction_status, $4, $5, $6, NOW())
            RETURNING
                id,
                user_id,
                transaction_type,
                amount,
                status,
                reference,
                description,
                metadata,
                created_at,
                completed_at
            "#,
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(amount)
        .bind(generate_transaction_reference())
        .bind(description)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
    }
}

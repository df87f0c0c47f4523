// db/investmentdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::investmentmodel::{Investment, InvestmentStatus};

#[async_trait]
pub trait InvestmentExt {
    async fn get_investment(&self, investment_id: Uuid) -> Result<Option<Investment>, sqlx::Error>;

    async fn get_active_investments(&self) -> Result<Vec<Investment>, sqlx::Error>;

    async fn get_active_investments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Investment>, sqlx::Error>;

    /// Record one day's ROI against a position: bumps total_roi_earned and
    /// total_returns and stamps last_paid_date.
    async fn apply_roi_payment(
        &self,
        investment_id: Uuid,
        amount: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<Investment, sqlx::Error>;

    /// Record a commission slice against a position: bumps
    /// total_commission_earned and total_returns.
    async fn apply_commission_slice(
        &self,
        investment_id: Uuid,
        amount: i64,
    ) -> Result<Investment, sqlx::Error>;

    async fn update_investment_status(
        &self,
        investment_id: Uuid,
        status: InvestmentStatus,
    ) -> Result<Investment, sqlx::Error>;
}

#[async_trait]
impl InvestmentExt for DBClient {
    async fn get_investment(&self, investment_id: Uuid) -> Result<Option<Investment>, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            r#"
            SELECT
                id,
                user_id,
                plan,
                amount,
                roi_percentage,
                daily_return,
                total_returns,
                total_roi_earned,
                total_commission_earned,
                start_date,
                end_date,
                status,
                last_paid_date,
                created_at,
                updated_at
            FROM investments
            WHERE id = $1
            "#,
        )
        .bind(investment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_active_investments(&self) -> Result<Vec<Investment>, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            r#"
            SELECT
                id,
                user_id,
                plan,
                amount,
                roi_percentage,
                daily_return,
                total_returns,
                total_roi_earned,
                total_commission_earned,
                start_date,
                end_date,
                status,
                last_paid_date,
                created_at,
                updated_at
            FROM investments
            WHERE status = 'active'
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_active_investments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Investment>, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            r#"
            SELECT
                id,
                user_id,
                plan,
                amount,
                roi_percentage,
                daily_return,
                total_returns,
                total_roi_earned,
                total_commission_earned,
                start_date,
                end_date,
                status,
                last_paid_date,
                created_at,
                updated_at
            FROM investments
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn apply_roi_payment(
        &self,
        investment_id: Uuid,
        amount: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<Investment, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            r#"
            UPDATE investments
            SET total_roi_earned = total_roi_earned + $2,
                total_returns = total_returns + $2,
                last_paid_date = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id,
                user_id,
                plan,
                amount,
                roi_percentage,
                daily_return,
                total_returns,
                total_roi_earned,
                total_commission_earned,
                start_date,
                end_date,
                status,
                last_paid_date,
                created_at,
                updated_at
            "#,
        )
        .bind(investment_id)
        .bind(amount)
        .bind(paid_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn apply_commission_slice(
        &self,
        investment_id: Uuid,
        amount: i64,
    ) -> Result<Investment, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            r#"
            UPDATE investments
            SET total_commission_earned = total_commission_earned + $2,
                total_returns = total_returns + $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id,
                user_id,
                plan,
                amount,
                roi_percentage,
                daily_return,
                total_returns,
                total_roi_earned,
                total_commission_earned,
                start_date,
                end_date,
                status,
                last_paid_date,
                created_at,
                updated_at
            "#,
        )
        .bind(investment_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_investment_status(
        &self,
        investment_id: Uuid,
        status: InvestmentStatus,
    ) -> Result<Investment, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            r#"
            UPDATE investments
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id,
                user_id,
                plan,
                amount,
                roi_percentage,
                daily_return,
                total_returns,
                total_roi_earned,
                total_commission_earned,
                start_date,
                end_date,
                status,
                last_paid_date,
                created_at,
                updated_at
            "#,
        )
        .bind(investment_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}

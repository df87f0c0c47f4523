// db/referraldb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::referralmodel::{Referral, ReferralCommission};

#[async_trait]
pub trait ReferralExt {
    async fn create_referral(
        &self,
        referrer_id: Uuid,
        referred_user_id: Uuid,
        level: i32,
    ) -> Result<Referral, sqlx::Error>;

    /// "Has networking": does this user have at least one active downline
    /// edge where they are the referrer?
    async fn has_active_downline(&self, user_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn get_referral_edge(
        &self,
        referrer_id: Uuid,
        referred_user_id: Uuid,
        level: i32,
    ) -> Result<Option<Referral>, sqlx::Error>;

    /// Append the commission audit row and bump the edge's denormalized
    /// earnings in one transaction.
    async fn record_referral_commission(
        &self,
        referral_id: Uuid,
        investment_id: Uuid,
        amount: i64,
        level: i32,
    ) -> Result<ReferralCommission, sqlx::Error>;
}

#[async_trait]
impl ReferralExt for DBClient {
    async fn create_referral(
        &self,
        referrer_id: Uuid,
        referred_user_id: Uuid,
        level: i32,
    ) -> Result<Referral, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            INSERT INTO referrals (referrer_id, referred_user_id, level)
            VALUES ($1, $2, $3)
            RETURNING
                id,
                referrer_id,
                referred_user_id,
                level,
                status,
                total_earnings,
                created_at
            "#,
        )
        .bind(referrer_id)
        .bind(referred_user_id)
        .bind(level)
        .fetch_one(&self.pool)
        .await
    }

    async fn has_active_downline(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM referrals
                WHERE referrer_id = $1 AND status = 'active'
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn get_referral_edge(
        &self,
        referrer_id: Uuid,
        referred_user_id: Uuid,
        level: i32,
    ) -> Result<Option<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id,
                referrer_id,
                referred_user_id,
                level,
                status,
                total_earnings,
                created_at
            FROM referrals
            WHERE referrer_id = $1 AND referred_user_id = $2 AND level = $3
            "#,
        )
        .bind(referrer_id)
        .bind(referred_user_id)
        .bind(level)
        .fetch_optional(&self.pool)
        .await
    }

    async fn record_referral_commission(
        &self,
        referral_id: Uuid,
        investment_id: Uuid,
        amount: i64,
        level: i32,
    ) -> Result<ReferralCommission, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let commission = sqlx::query_as::<_, ReferralCommission>(
            r#"
            INSERT INTO referral_commissions (referral_id, investment_id, amount, level)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                referral_id,
                investment_id,
                amount,
                level,
                created_at
            "#,
        )
        .bind(referral_id)
        .bind(investment_id)
        .bind(amount)
        .bind(level)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE referrals SET total_earnings = total_earnings + $2 WHERE id = $1",
        )
        .bind(referral_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(commission)
    }
}

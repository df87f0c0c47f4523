// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::User;

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error>;

    async fn get_user_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        username: T,
        email: T,
        referral_code: T,
        referred_by: Option<String>,
    ) -> Result<User, sqlx::Error>;

    /// Credit balance and total_earnings together. ROI, commission and task
    /// conversion all flow through here.
    async fn credit_earnings(&self, user_id: Uuid, amount: i64) -> Result<User, sqlx::Error>;

    async fn get_users_with_pending_points(&self) -> Result<Vec<User>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                name,
                username,
                email,
                referral_code,
                referred_by,
                balance,
                total_invested,
                total_earnings,
                total_withdrawn,
                points,
                pending_points,
                created_at,
                updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                name,
                username,
                email,
                referral_code,
                referred_by,
                balance,
                total_invested,
                total_earnings,
                total_withdrawn,
                points,
                pending_points,
                created_at,
                updated_at
            FROM users
            WHERE referral_code = $1
            "#,
        )
        .bind(referral_code)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        username: T,
        email: T,
        referral_code: T,
        referred_by: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, username, email, referral_code, referred_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id,
                name,
                username,
                email,
                referral_code,
                referred_by,
                balance,
                total_invested,
                total_earnings,
                total_withdrawn,
                points,
                pending_points,
                created_at,
                updated_at
            "#,
        )
        .bind(name.into())
        .bind(username.into())
        .bind(email.into())
        .bind(referral_code.into())
        .bind(referred_by)
        .fetch_one(&self.pool)
        .await
    }

    async fn credit_earnings(&self, user_id: Uuid, amount: i64) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET balance = balance + $2,
                total_earnings = total_earnings + $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id,
                name,
                username,
                email,
                referral_code,
                referred_by,
                balance,
                total_invested,
                total_earnings,
                total_withdrawn,
                points,
                pending_points,
                created_at,
                updated_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_users_with_pending_points(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                name,
                username,
                email,
                referral_code,
                referred_by,
                balance,
                total_invested,
                total_earnings,
                total_withdrawn,
                points,
                pending_points,
                created_at,
                updated_at
            FROM users
            WHERE pending_points > 0
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

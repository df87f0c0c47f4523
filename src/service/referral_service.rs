// service/referral_service.rs
use std::sync::Arc;

use crate::{
    db::{db::DBClient, referraldb::ReferralExt, userdb::UserExt},
    models::usermodel::User,
    service::{error::ServiceError, limits::MAX_REFERRAL_LEVELS},
    utils::referral_code::generate_referral_code,
};

/// Registration-time referral plumbing: creates the user row with a fresh
/// referral code and materializes the upward edge records the commission
/// ledger is keyed by.
#[derive(Debug, Clone)]
pub struct ReferralService {
    db_client: Arc<DBClient>,
}

impl ReferralService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn register_user(
        &self,
        name: String,
        username: String,
        email: String,
        referred_by: Option<String>,
    ) -> Result<User, ServiceError> {
        // A referral code that doesn't resolve is dropped rather than
        // rejected; the user just joins without an upline.
        let referred_by = match referred_by {
            Some(code) => self
                .db_client
                .get_user_by_referral_code(&code)
                .await?
                .map(|referrer| referrer.referral_code),
            None => None,
        };

        let user = self
            .db_client
            .save_user(name, username, email, generate_referral_code(), referred_by)
            .await?;

        self.record_signup_referrals(&user).await?;

        Ok(user)
    }

    /// Walks the new user's referred_by chain upward and inserts one active
    /// referrals edge per ancestor, up to 12 levels. Done once, here; the
    /// distribution batch never mutates these edges.
    pub async fn record_signup_referrals(&self, new_user: &User) -> Result<u32, ServiceError> {
        let mut created = 0;
        let mut next_code = new_user.referred_by.clone();

        for level in 1..=MAX_REFERRAL_LEVELS {
            let code = match next_code {
                Some(code) => code,
                None => break,
            };

            let ancestor = match self.db_client.get_user_by_referral_code(&code).await? {
                Some(user) => user,
                None => break,
            };

            self.db_client
                .create_referral(ancestor.id, new_user.id, level)
                .await?;
            created += 1;

            next_code = ancestor.referred_by.clone();
        }

        if created > 0 {
            tracing::info!(
                "Recorded {} referral edge(s) for new user {}",
                created,
                new_user.id
            );
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;
    use uuid::Uuid;

    #[tokio::test]
    async fn signup_without_upline_creates_no_edges() {
        let pool = PgPool::connect_lazy("postgres://localhost/investnest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = ReferralService::new(db_client);

        let user = User {
            id: Uuid::nil(),
            name: "orphan".to_string(),
            username: "orphan".to_string(),
            email: "orphan@example.com".to_string(),
            referral_code: "BBBBBBBB".to_string(),
            referred_by: None,
            balance: 0,
            total_invested: 0,
            total_earnings: 0,
            total_withdrawn: 0,
            points: 0,
            pending_points: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let created = svc.record_signup_referrals(&user).await.unwrap();
        assert_eq!(created, 0);
    }
}

// service/points_conversion.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    db::{db::DBClient, taskdb::TaskExt, transactiondb::TransactionExt, userdb::UserExt},
    models::{transactionmodel::TransactionType, usermodel::User},
    service::{error::ServiceError, limits::points_to_cents},
};

#[derive(Debug, Default)]
pub struct ConversionSummary {
    pub users_processed: u32,
    pub users_converted: u32,
    pub points_converted: i64,
    pub failed: u32,
}

/// Time-delayed settlement of task-reward points into spendable balance.
/// A completed task becomes convertible once its completion is at least
/// `delay_hours` in the past; 100 points settle to $1.
#[derive(Debug, Clone)]
pub struct PointsConversionService {
    db_client: Arc<DBClient>,
    delay_hours: i64,
}

impl PointsConversionService {
    pub fn new(db_client: Arc<DBClient>, delay_hours: i64) -> Self {
        Self {
            db_client,
            delay_hours,
        }
    }

    pub async fn run(&self) -> Result<ConversionSummary, ServiceError> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ConversionSummary, ServiceError> {
        let users = self.db_client.get_users_with_pending_points().await?;

        tracing::info!(
            "Points conversion starting at {}: {} users with pending points",
            now,
            users.len()
        );

        let mut summary = ConversionSummary::default();
        for user in &users {
            summary.users_processed += 1;

            match self.convert_for_user(user, now).await {
                Ok(0) => {} // nothing eligible yet, not an error
                Ok(points) => {
                    summary.users_converted += 1;
                    summary.points_converted += points;
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Points conversion failed for user {}: {}", user.id, e);
                }
            }
        }

        tracing::info!(
            "Points conversion finished: {} users processed, {} converted, {} points settled, {} failed",
            summary.users_processed,
            summary.users_converted,
            summary.points_converted,
            summary.failed
        );

        Ok(summary)
    }

    /// Returns the number of points converted for this user (zero when no
    /// assignment has aged past the delay).
    async fn convert_for_user(&self, user: &User, now: DateTime<Utc>) -> Result<i64, ServiceError> {
        let cutoff = now - Duration::hours(self.delay_hours);
        let assignments = self
            .db_client
            .get_convertible_assignments(user.id, cutoff)
            .await?;

        if assignments.is_empty() {
            return Ok(0);
        }

        let points_to_convert: i64 = assignments.iter().map(|a| a.reward_points).sum();
        let assignment_ids: Vec<uuid::Uuid> = assignments.iter().map(|a| a.id).collect();

        self.db_client.mark_rewards_claimed(&assignment_ids).await?;

        if points_to_convert <= 0 {
            return Ok(0);
        }

        let money_amount = points_to_cents(points_to_convert);

        // Settle: pending points drain (floored at zero), cumulative points
        // and wallet grow, one task transaction records the conversion.
        sqlx::query(
            r#"
            UPDATE users
            SET pending_points = GREATEST(0, pending_points - $2),
                points = points + $2,
                balance = balance + $3,
                total_earnings = total_earnings + $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(points_to_convert)
        .bind(money_amount)
        .execute(&self.db_client.pool)
        .await?;

        self.db_client
            .record_transaction(
                user.id,
                TransactionType::Task,
                money_amount,
                format!(
                    "Converted {} task points from {} completed tasks",
                    points_to_convert,
                    assignments.len()
                ),
                None,
            )
            .await?;

        Ok(points_to_convert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn conversion_cutoff_respects_delay() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let cutoff = now - Duration::hours(24);

        // Completed 23h ago: not yet eligible. Completed 25h ago: eligible.
        let too_recent = now - Duration::hours(23);
        let old_enough = now - Duration::hours(25);
        assert!(too_recent > cutoff);
        assert!(old_enough <= cutoff);
    }

    #[test]
    fn hundred_points_settle_to_one_dollar() {
        assert_eq!(points_to_cents(100), 100);
        assert_eq!(points_to_cents(250), 250); // $2.50
    }
}

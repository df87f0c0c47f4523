// service/investment_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, userdb::UserExt},
    models::investmentmodel::{Investment, InvestmentPlan},
    service::error::ServiceError,
    utils::currency::format_cents_as_dollars,
};

/// Opens investment positions: debits the principal from the user's
/// balance, fixes the daily ROI rate by sampling the plan's band once, and
/// inserts the active position.
#[derive(Debug, Clone)]
pub struct InvestmentService {
    db_client: Arc<DBClient>,
}

impl InvestmentService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn open_investment(
        &self,
        user_id: Uuid,
        plan: InvestmentPlan,
        amount: i64,
    ) -> Result<Investment, ServiceError> {
        if amount < plan.minimum_amount() {
            return Err(ServiceError::Validation(format!(
                "Minimum amount for the {} plan is {} cents",
                plan.to_str(),
                plan.minimum_amount()
            )));
        }

        let user = self
            .db_client
            .get_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        if user.balance < amount {
            return Err(ServiceError::InsufficientBalance {
                required: amount,
                available: user.balance,
            });
        }

        // The rate is fixed for the life of the position, sampled uniformly
        // within the plan band; the daily return in cents follows from it.
        let (roi_min, roi_max) = plan.roi_band();
        let roi_percentage = rand::rng().random_range(roi_min..=roi_max);
        let daily_return = (amount as f64 * roi_percentage / 100.0).round() as i64;

        let start_date = Utc::now();
        let end_date = start_date + Duration::days(plan.duration_days());

        let mut tx = self.db_client.pool.begin().await?;

        // The balance guard is in the WHERE clause so a concurrent debit
        // between the read above and this write still cannot drive the
        // balance negative.
        let debited = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - $2,
                total_invested = total_invested + $2,
                updated_at = NOW()
            WHERE id = $1 AND balance >= $2
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            return Err(ServiceError::InsufficientBalance {
                required: amount,
                available: user.balance,
            });
        }

        let investment = sqlx::query_as::<_, Investment>(
            r#"
            INSERT INTO investments
                (user_id, plan, amount, roi_percentage, daily_return, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
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
        .bind(user_id)
        .bind(plan)
        .bind(amount)
        .bind(roi_percentage)
        .bind(daily_return)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "User {} opened a {} investment of {} at {:.2}% daily",
            user_id,
            plan.to_str(),
            format_cents_as_dollars(amount),
            roi_percentage
        );

        Ok(investment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_return_is_fixed_from_sampled_rate() {
        // $100 at exactly 2% must yield 200 cents a day.
        let amount: i64 = 10_000;
        let roi_percentage: f64 = 2.0;
        let daily_return = (amount as f64 * roi_percentage / 100.0).round() as i64;
        assert_eq!(daily_return, 200);
    }

    #[test]
    fn sampled_rate_stays_in_plan_band() {
        let plan = InvestmentPlan::Gold;
        let (min, max) = plan.roi_band();
        for _ in 0..100 {
            let rate = rand::rng().random_range(min..=max);
            assert!(rate >= min && rate <= max);
        }
    }

    #[test]
    fn plan_durations_and_minimums() {
        assert_eq!(InvestmentPlan::Starter.duration_days(), 365);
        assert_eq!(InvestmentPlan::Platinum.duration_days(), 200);
        assert!(InvestmentPlan::Starter.minimum_amount() < InvestmentPlan::Silver.minimum_amount());
    }
}

// service/roi_distribution.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    db::{
        db::DBClient,
        investmentdb::InvestmentExt,
        referraldb::ReferralExt,
        transactiondb::TransactionExt,
        userdb::UserExt,
    },
    models::{
        investmentmodel::{Investment, InvestmentStatus},
        transactionmodel::TransactionType,
    },
    service::{
        commission::CommissionService,
        error::ServiceError,
        limits::{applicable_total_cap, daily_roi_candidate, same_utc_day},
    },
};

#[derive(Debug, Default)]
pub struct DistributionSummary {
    pub processed: u32,
    pub paid: u32,
    pub completed: u32,
    pub skipped: u32,
    pub failed: u32,
}

#[derive(Debug)]
enum InvestmentOutcome {
    Paid,
    Completed,
    Skipped,
}

/// The daily batch: walks every active position once per UTC day, pays the
/// capped daily return, cascades commissions upward, and flips positions to
/// completed when their lifetime cap is reached.
#[derive(Debug, Clone)]
pub struct RoiDistributionService {
    db_client: Arc<DBClient>,
    commission_service: Arc<CommissionService>,
}

impl RoiDistributionService {
    pub fn new(db_client: Arc<DBClient>, commission_service: Arc<CommissionService>) -> Self {
        Self {
            db_client,
            commission_service,
        }
    }

    pub async fn run(&self) -> Result<DistributionSummary, ServiceError> {
        self.run_at(Utc::now()).await
    }

    /// One failing investment never aborts the batch: its error is logged
    /// and the remaining positions are still processed.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<DistributionSummary, ServiceError> {
        let investments = self.db_client.get_active_investments().await?;

        tracing::info!(
            "ROI distribution starting at {}: {} active investments",
            now,
            investments.len()
        );

        let mut summary = DistributionSummary::default();
        for investment in &investments {
            summary.processed += 1;

            match self.process_investment(investment, now).await {
                Ok(InvestmentOutcome::Paid) => summary.paid += 1,
                Ok(InvestmentOutcome::Completed) => summary.completed += 1,
                Ok(InvestmentOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        "Failed to process investment {}: {}",
                        investment.id,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "ROI distribution finished: {} processed, {} paid, {} completed, {} skipped, {} failed",
            summary.processed,
            summary.paid,
            summary.completed,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    async fn process_investment(
        &self,
        investment: &Investment,
        now: DateTime<Utc>,
    ) -> Result<InvestmentOutcome, ServiceError> {
        // Expired positions complete without a final payment.
        if investment.is_expired(now) {
            self.db_client
                .update_investment_status(investment.id, InvestmentStatus::Completed)
                .await?;
            return Ok(InvestmentOutcome::Completed);
        }

        // Idempotency guard: at most one payment per UTC calendar day.
        if let Some(last_paid) = investment.last_paid_date {
            if same_utc_day(last_paid, now) {
                return Ok(InvestmentOutcome::Skipped);
            }
        }

        let candidate = daily_roi_candidate(
            investment.daily_return,
            investment.amount,
            investment.total_roi_earned,
        );

        if candidate <= 0 {
            // ROI budget exhausted. The position may still be absorbing
            // commission, so completion depends on the applicable cap.
            if self.complete_if_capped(investment.id).await? {
                return Ok(InvestmentOutcome::Completed);
            }
            return Ok(InvestmentOutcome::Skipped);
        }

        let owner = self
            .db_client
            .get_user(investment.user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(investment.user_id))?;

        self.db_client
            .apply_roi_payment(investment.id, candidate, now)
            .await?;
        self.db_client.credit_earnings(owner.id, candidate).await?;
        self.db_client
            .record_transaction(
                owner.id,
                TransactionType::Roi,
                candidate,
                format!("Daily ROI on {} investment", investment.plan.to_str()),
                Some(serde_json::json!({ "investment_id": investment.id })),
            )
            .await?;

        self.commission_service
            .cascade(&owner, investment.id, candidate)
            .await?;

        // Commission may have landed on this same position during the
        // cascade (the owner can be a referrer on another chain), so the cap
        // is re-checked with fresh totals before the cycle ends.
        if self.complete_if_capped(investment.id).await? {
            return Ok(InvestmentOutcome::Completed);
        }

        Ok(InvestmentOutcome::Paid)
    }

    /// Re-reads the position and flips it to completed when total_returns
    /// has reached the applicable cap: 400% of principal when the owner has
    /// an active downline edge, 300% otherwise.
    async fn complete_if_capped(&self, investment_id: uuid::Uuid) -> Result<bool, ServiceError> {
        let investment = self
            .db_client
            .get_investment(investment_id)
            .await?
            .ok_or(ServiceError::InvestmentNotFound(investment_id))?;

        let has_networking = self
            .db_client
            .has_active_downline(investment.user_id)
            .await?;
        let cap = applicable_total_cap(investment.amount, has_networking);

        if investment.total_returns >= cap {
            self.db_client
                .update_investment_status(investment.id, InvestmentStatus::Completed)
                .await?;
            tracing::info!(
                "Investment {} reached its {}% cap and was completed",
                investment.id,
                if has_networking { 400 } else { 300 }
            );
            return Ok(true);
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    use crate::models::investmentmodel::InvestmentPlan;

    fn sample_investment(last_paid_date: Option<DateTime<Utc>>) -> Investment {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Investment {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            plan: InvestmentPlan::Gold,
            amount: 10_000,
            roi_percentage: 2.0,
            daily_return: 200,
            total_returns: 0,
            total_roi_earned: 0,
            total_commission_earned: 0,
            start_date: start,
            end_date: start + chrono::Duration::days(250),
            status: InvestmentStatus::Active,
            last_paid_date,
            created_at: Some(start),
            updated_at: Some(start),
        }
    }

    #[test]
    fn expiry_is_strictly_after_end_date() {
        let investment = sample_investment(None);
        assert!(!investment.is_expired(investment.end_date));
        assert!(investment.is_expired(investment.end_date + chrono::Duration::seconds(1)));
    }

    #[test]
    fn same_day_guard_blocks_second_payment() {
        let morning = Utc.with_ymd_and_hms(2024, 2, 1, 0, 10, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 2, 1, 22, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 2, 2, 0, 10, 0).unwrap();

        let investment = sample_investment(Some(morning));
        let last_paid = investment.last_paid_date.unwrap();
        assert!(same_utc_day(last_paid, evening));
        assert!(!same_utc_day(last_paid, next_day));
    }
}

// service/commission.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        investmentdb::InvestmentExt,
        referraldb::ReferralExt,
        transactiondb::TransactionExt,
        userdb::UserExt,
    },
    models::{transactionmodel::TransactionType, usermodel::User},
    service::{
        error::ServiceError,
        limits::{
            clamp_commission_rate, commission_amount, commission_rate_for_level,
            remaining_commission_budget, split_evenly, MAX_REFERRAL_LEVELS,
        },
    },
};

#[derive(Debug, Default)]
pub struct CascadeOutcome {
    pub levels_paid: u32,
    pub total_commission: i64,
    pub total_percentage: f64,
}

/// Walks a matured ROI event up the investor's referral chain, paying each
/// referrer under the global 20% cap and each referrer's own 400%
/// per-position commission budget.
#[derive(Debug, Clone)]
pub struct CommissionService {
    db_client: Arc<DBClient>,
}

impl CommissionService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// The chain is resolved fresh on every cascade by following live
    /// referred_by codes upward, one user lookup per level, at most 12
    /// levels. The referrals table is only consulted for the audit ledger
    /// key, never for topology.
    pub async fn cascade(
        &self,
        investor: &User,
        investment_id: Uuid,
        roi_amount: i64,
    ) -> Result<CascadeOutcome, ServiceError> {
        let mut outcome = CascadeOutcome::default();
        let mut next_code = investor.referred_by.clone();

        for level in 1..=MAX_REFERRAL_LEVELS {
            let code = match next_code {
                Some(code) => code,
                None => break, // top of the chain
            };

            let referrer = match self.db_client.get_user_by_referral_code(&code).await? {
                Some(user) => user,
                None => break, // dangling code, nothing above this point
            };

            let rate = commission_rate_for_level(level);
            let clamped = clamp_commission_rate(rate, outcome.total_percentage);
            if clamped <= 0.0 {
                tracing::debug!(
                    "Commission cascade for investment {} hit the global cap at level {}",
                    investment_id,
                    level
                );
                break;
            }

            let commission = commission_amount(roi_amount, clamped);
            if commission > 0 {
                self.pay_referrer(&referrer, investor, investment_id, commission, level)
                    .await?;
                outcome.levels_paid += 1;
                outcome.total_commission += commission;
            }

            outcome.total_percentage += clamped;
            next_code = referrer.referred_by.clone();
        }

        Ok(outcome)
    }

    /// One level's payout: wallet credit, even split into the referrer's own
    /// active positions under each position's remaining commission budget,
    /// the referral transaction row, then the audit ledger row. The steps
    /// are applied sequentially with no cross-step rollback; a crash
    /// mid-sequence leaves whatever was committed (accepted by design).
    async fn pay_referrer(
        &self,
        referrer: &User,
        investor: &User,
        investment_id: Uuid,
        commission: i64,
        level: i32,
    ) -> Result<(), ServiceError> {
        self.db_client.credit_earnings(referrer.id, commission).await?;

        // Commission also counts against the referrer's own positions: an
        // even slice per active investment, capped by what is left of each
        // position's 400% budget. Excess is discarded, not carried forward.
        let positions = self
            .db_client
            .get_active_investments_for_user(referrer.id)
            .await?;

        let slice = split_evenly(commission, positions.len());
        if slice > 0 {
            for position in &positions {
                let capped = slice
                    .min(remaining_commission_budget(
                        position.amount,
                        position.total_commission_earned,
                    ))
                    .max(0);
                if capped > 0 {
                    self.db_client
                        .apply_commission_slice(position.id, capped)
                        .await?;
                }
            }
        }

        self.db_client
            .record_transaction(
                referrer.id,
                TransactionType::Referral,
                commission,
                format!("Level {} referral commission from {}", level, investor.username),
                Some(serde_json::json!({
                    "investment_id": investment_id,
                    "level": level,
                })),
            )
            .await?;

        // The ledger row is keyed by the registration-time edge. If that edge
        // was never created, the wallet credit above stands without an audit
        // row; this matches the upstream behavior.
        match self
            .db_client
            .get_referral_edge(referrer.id, investor.id, level)
            .await?
        {
            Some(edge) => {
                self.db_client
                    .record_referral_commission(edge.id, investment_id, commission, level)
                    .await?;
            }
            None => {
                tracing::warn!(
                    "No referral edge for referrer {} -> user {} at level {}; commission {} credited without ledger row",
                    referrer.id,
                    investor.id,
                    level,
                    commission
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[tokio::test]
    async fn cascade_without_referrer_is_a_no_op() {
        let pool = PgPool::connect_lazy("postgres://localhost/investnest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = CommissionService::new(db_client);

        let investor = User {
            id: Uuid::nil(),
            name: "test".to_string(),
            username: "test".to_string(),
            email: "test@example.com".to_string(),
            referral_code: "AAAAAAAA".to_string(),
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

        // No referrer: the walk stops before touching the pool.
        let outcome = svc.cascade(&investor, Uuid::nil(), 200).await.unwrap();
        assert_eq!(outcome.levels_paid, 0);
        assert_eq!(outcome.total_commission, 0);
        assert_eq!(outcome.total_percentage, 0.0);
    }
}

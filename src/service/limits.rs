// service/limits.rs
//
// Earning-limit policy: every cap the batch engines enforce lives here as a
// pure function over integer cents, so the arithmetic can be tested without
// touching the database.
use chrono::{DateTime, Utc};

/// Lifetime ROI cap, percent of principal.
pub const MAX_ROI_PERCENTAGE: i64 = 300;

/// Lifetime ROI + commission cap, percent of principal.
pub const MAX_COMMISSION_PERCENTAGE: i64 = 400;

/// Global cap on the summed per-level rates of a single cascade.
pub const MAX_REFERRAL_COMMISSION_PERCENTAGE: f64 = 20.0;

pub const MAX_REFERRAL_LEVELS: i32 = 12;

/// Fixed schedule: 8% for the direct referrer, 1% for levels 2 through 12.
pub fn commission_rate_for_level(level: i32) -> f64 {
    match level {
        1 => 8.0,
        2..=12 => 1.0,
        _ => 0.0,
    }
}

/// Clamp a level's rate to whatever is left under the global 20% cap.
/// A result of zero (or less) means the cascade stops.
pub fn clamp_commission_rate(rate: f64, running_total: f64) -> f64 {
    let remaining = MAX_REFERRAL_COMMISSION_PERCENTAGE - running_total;
    rate.min(remaining)
}

pub fn roi_cap(amount: i64) -> i64 {
    amount * MAX_ROI_PERCENTAGE / 100
}

pub fn commission_cap(amount: i64) -> i64 {
    amount * MAX_COMMISSION_PERCENTAGE / 100
}

pub fn remaining_roi_budget(amount: i64, total_roi_earned: i64) -> i64 {
    roi_cap(amount) - total_roi_earned
}

pub fn remaining_commission_budget(amount: i64, total_commission_earned: i64) -> i64 {
    commission_cap(amount) - total_commission_earned
}

/// Today's ROI for a position: the fixed daily return, capped by what is
/// left of the 300% budget. Zero means nothing is payable.
pub fn daily_roi_candidate(daily_return: i64, amount: i64, total_roi_earned: i64) -> i64 {
    daily_return.min(remaining_roi_budget(amount, total_roi_earned)).max(0)
}

/// The completion cap for total_returns: 400% of principal once the owner
/// has an active downline edge, 300% otherwise.
pub fn applicable_total_cap(amount: i64, has_networking: bool) -> i64 {
    if has_networking {
        commission_cap(amount)
    } else {
        roi_cap(amount)
    }
}

/// Commission in cents for one cascade level, rounded to the nearest cent.
pub fn commission_amount(roi_amount: i64, rate: f64) -> i64 {
    (roi_amount as f64 * rate / 100.0).round() as i64
}

/// Even split of a commission across a referrer's positions. Integer cents;
/// any sub-cent remainder is simply not distributed.
pub fn split_evenly(total: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    total / count as i64
}

/// The daily idempotency guard compares UTC calendar days, not instants.
pub fn same_utc_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Fixed conversion rate: 100 points = $1, i.e. one point is one cent.
pub fn points_to_cents(points: i64) -> i64 {
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_schedule() {
        assert_eq!(commission_rate_for_level(1), 8.0);
        for level in 2..=12 {
            assert_eq!(commission_rate_for_level(level), 1.0);
        }
        assert_eq!(commission_rate_for_level(0), 0.0);
        assert_eq!(commission_rate_for_level(13), 0.0);
    }

    #[test]
    fn test_full_schedule_stays_under_global_cap() {
        let mut total = 0.0;
        for level in 1..=MAX_REFERRAL_LEVELS {
            let clamped = clamp_commission_rate(commission_rate_for_level(level), total);
            assert!(clamped > 0.0);
            total += clamped;
        }
        // 8 + 11 * 1 = 19, inside the 20% cap with the default schedule.
        assert_eq!(total, 19.0);
        assert!(total <= MAX_REFERRAL_COMMISSION_PERCENTAGE);
    }

    #[test]
    fn test_clamp_stops_cascade_at_cap() {
        assert_eq!(clamp_commission_rate(8.0, 15.0), 5.0);
        assert!(clamp_commission_rate(1.0, 20.0) <= 0.0);
        assert!(clamp_commission_rate(1.0, 25.0) <= 0.0);
    }

    #[test]
    fn test_caps() {
        // $100 principal
        assert_eq!(roi_cap(10_000), 30_000);
        assert_eq!(commission_cap(10_000), 40_000);
        assert_eq!(applicable_total_cap(10_000, false), 30_000);
        assert_eq!(applicable_total_cap(10_000, true), 40_000);
    }

    #[test]
    fn test_daily_roi_candidate_clamps_to_budget() {
        // $100 at 2% a day: 200 cents until the 300% budget runs dry.
        assert_eq!(daily_roi_candidate(200, 10_000, 0), 200);
        assert_eq!(daily_roi_candidate(200, 10_000, 29_900), 100);
        assert_eq!(daily_roi_candidate(200, 10_000, 30_000), 0);
        assert_eq!(daily_roi_candidate(200, 10_000, 30_100), 0);
    }

    #[test]
    fn test_roi_cap_scenario_149_then_150_cycles() {
        // amount=$100, 2% daily => 200 cents/day, cap 300% => 30_000 cents.
        let amount = 10_000;
        let daily_return = 200;
        let mut total_roi_earned = 0;

        for _ in 0..149 {
            total_roi_earned += daily_roi_candidate(daily_return, amount, total_roi_earned);
        }
        assert_eq!(total_roi_earned, 29_800);

        total_roi_earned += daily_roi_candidate(daily_return, amount, total_roi_earned);
        assert_eq!(total_roi_earned, 30_000);

        // Nothing left; the position is due for completion.
        assert_eq!(daily_roi_candidate(daily_return, amount, total_roi_earned), 0);
        assert!(total_roi_earned >= applicable_total_cap(amount, false));
    }

    #[test]
    fn test_level_one_commission_on_two_dollar_roi() {
        // $2 ROI, level 1 at 8% => $0.16.
        let commission = commission_amount(200, commission_rate_for_level(1));
        assert_eq!(commission, 16);
    }

    #[test]
    fn test_even_split_across_two_positions() {
        // $10 commission over two $50 positions: $5 each, far below the
        // $200 per-position commission cap.
        let slice = split_evenly(1_000, 2);
        assert_eq!(slice, 500);
        assert!(slice <= remaining_commission_budget(5_000, 0));
    }

    #[test]
    fn test_split_evenly_edge_cases() {
        assert_eq!(split_evenly(1_000, 0), 0);
        assert_eq!(split_evenly(1_000, 3), 333);
        assert_eq!(split_evenly(1, 2), 0);
    }

    #[test]
    fn test_same_utc_day() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 0, 5, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        let c = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 1).unwrap();
        assert!(same_utc_day(a, b));
        assert!(!same_utc_day(b, c));
    }

    #[test]
    fn test_points_to_cents() {
        assert_eq!(points_to_cents(100), 100); // 100 points = $1.00
        assert_eq!(points_to_cents(0), 0);
        assert_eq!(points_to_cents(2_500), 2_500); // $25.00
    }
}

pub mod commission;
pub mod error;
pub mod investment_service;
pub mod limits;
pub mod points_conversion;
pub mod referral_service;
pub mod roi_distribution;
pub mod scheduler;

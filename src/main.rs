mod config;
mod db;
mod models;
mod service;
mod utils;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use crate::service::{
    commission::CommissionService,
    investment_service::InvestmentService,
    points_conversion::PointsConversionService,
    referral_service::ReferralService,
    roi_distribution::RoiDistributionService,
    scheduler::{BatchScheduler, SystemClock},
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub commission_service: Arc<CommissionService>,
    pub roi_service: Arc<RoiDistributionService>,
    pub points_service: Arc<PointsConversionService>,
    pub investment_service: Arc<InvestmentService>,
    pub referral_service: Arc<ReferralService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let commission_service = Arc::new(CommissionService::new(db_client_arc.clone()));
        let roi_service = Arc::new(RoiDistributionService::new(
            db_client_arc.clone(),
            commission_service.clone(),
        ));
        let points_service = Arc::new(PointsConversionService::new(
            db_client_arc.clone(),
            config.points_conversion_hours,
        ));
        let investment_service = Arc::new(InvestmentService::new(db_client_arc.clone()));
        let referral_service = Arc::new(ReferralService::new(db_client_arc.clone()));

        Self {
            env: config,
            db_client: db_client_arc,
            commission_service,
            roi_service,
            points_service,
            investment_service,
            referral_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");

            // Start a background task to monitor pool health
            let max_connections = 20;
            let pool_for_monitoring = pool.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
                loop {
                    interval.tick().await;
                    let size = pool_for_monitoring.size();
                    let idle = pool_for_monitoring.num_idle();
                    tracing::debug!(
                        "🔍 Pool Status - Active: {}, Idle: {}, Total: {}",
                        size - idle as u32,
                        idle,
                        size
                    );

                    if size >= max_connections * 8 / 10 {
                        tracing::warn!(
                            "⚠️  Connection pool at 80% capacity! Consider increasing max_connections"
                        );
                    }
                }
            });

            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);
    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    println!(
        "🚀 investnest batch engine running in {} mode",
        config.environment
    );

    // Start the batch scheduler: daily ROI distribution at UTC midnight,
    // hourly points conversion, optional immediate run outside production.
    let mut scheduler = BatchScheduler::new(
        app_state.roi_service.clone(),
        app_state.points_service.clone(),
        Arc::new(SystemClock),
        config.run_jobs_on_startup(),
    );
    scheduler.start();

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            println!("Shutting down");
            scheduler.stop();
        }
        Err(err) => {
            tracing::error!("Failed to listen for shutdown signal: {}", err);
        }
    }
}

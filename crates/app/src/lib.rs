//! Orgdesk application composition root
//!
//! Composes all domain routers into a single application.

use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;

use orgdesk_activity::{ActivityRecorder, PgActivityRecorder};
use orgdesk_approvals::{ApprovalLedger, ApprovalService, ApprovalsState, PgApprovalLedger};
use orgdesk_assets::{AssetManager, AssetsState};
use orgdesk_common::{AuthVerifier, Config};
use orgdesk_content::{EntityDirectory, PgEntityDirectory};
use orgdesk_drive::{DriveConfig, DriveServiceFactory};

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    // Storage-backed capabilities shared across domains
    let directory: Arc<dyn EntityDirectory> = Arc::new(PgEntityDirectory::new(pool.clone()));
    let ledger: Arc<dyn ApprovalLedger> = Arc::new(PgApprovalLedger::new(pool.clone()));
    let activity: Arc<dyn ActivityRecorder> = Arc::new(PgActivityRecorder::new(pool));

    // Create drive store from environment
    let drive_config = DriveConfig::from_env()?;
    let folders = drive_config.folders.clone();
    let drive = Arc::from(DriveServiceFactory::create(drive_config)?);

    let verifier = AuthVerifier::new(config.jwt_secret.clone());

    // Create Approvals domain state
    let approvals_state = ApprovalsState {
        service: ApprovalService::new(ledger.clone(), directory.clone(), activity.clone()),
        verifier: verifier.clone(),
    };

    // Create Assets domain state
    let assets_state = AssetsState {
        manager: AssetManager::new(drive, directory, ledger, activity, folders),
        verifier,
    };

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Orgdesk API v0.1.0" }))
        .merge(orgdesk_approvals::routes().with_state(approvals_state))
        .merge(orgdesk_assets::routes().with_state(assets_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

//! Approvals domain state and auth wiring

use axum::extract::FromRef;

use orgdesk_common::AuthVerifier;

use crate::service::ApprovalService;

/// Application state for the Approvals domain
#[derive(Clone)]
pub struct ApprovalsState {
    pub service: ApprovalService,
    pub verifier: AuthVerifier,
}

impl FromRef<ApprovalsState> for AuthVerifier {
    fn from_ref(state: &ApprovalsState) -> Self {
        state.verifier.clone()
    }
}

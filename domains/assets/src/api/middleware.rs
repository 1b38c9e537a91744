//! Assets domain state and auth wiring

use axum::extract::FromRef;

use orgdesk_common::AuthVerifier;

use crate::manager::AssetManager;

/// Application state for the Assets domain
#[derive(Clone)]
pub struct AssetsState {
    pub manager: AssetManager,
    pub verifier: AuthVerifier,
}

impl FromRef<AssetsState> for AuthVerifier {
    fn from_ref(state: &AssetsState) -> Self {
        state.verifier.clone()
    }
}

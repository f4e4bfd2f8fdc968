//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;
use crate::gateway::RecordsGateway;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the form router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
/// Wraps `CoreState` plus the client for the records service.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub gateway: Arc<RecordsGateway>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>, gateway: Arc<RecordsGateway>) -> Self {
        Self { core, gateway }
    }
}

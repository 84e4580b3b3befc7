use std::sync::Arc;

use sentra_application::{OwnershipService, UserRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ownership_service: OwnershipService,
    pub user_repository: Arc<dyn UserRepository>,
}

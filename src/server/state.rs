use crate::dashboard::RefreshController;
use std::sync::Arc;

pub struct AppState {
    pub controller: Arc<RefreshController>,
}

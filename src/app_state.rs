use std::sync::Arc;

use crate::config::Config;
use crate::db::store::RequestStore;
use crate::service::RequestService;

#[derive(Clone)]
pub struct AppState {
    pub service: RequestService,
    pub store: Arc<dyn RequestStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RequestStore>, config: &Config) -> Self {
        let service = RequestService::new(store.clone(), &config.admin_token, config.decision_policy);
        Self { service, store }
    }
}

use dohgate_application::use_cases::HandleDnsMessageUseCase;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub handle_query: Arc<HandleDnsMessageUseCase>,
}

impl AppState {
    pub fn new(handle_query: Arc<HandleDnsMessageUseCase>) -> Self {
        Self { handle_query }
    }
}

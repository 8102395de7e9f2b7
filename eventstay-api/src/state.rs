use std::sync::Arc;
use eventstay_core::repository::SessionRepository;
use eventstay_core::BookingService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub sessions: Arc<dyn SessionRepository>,
    pub auth: AuthConfig,
}

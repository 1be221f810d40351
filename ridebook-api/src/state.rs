use std::sync::Arc;
use ridebook_core::BookingRepository;
use ridebook_store::ImageStore;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingRepository>,
    pub images: Arc<ImageStore>,
    pub auth: AuthConfig,
}

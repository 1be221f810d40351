pub mod app_config;
pub mod database;
pub mod booking_repo;
pub mod memory_repo;
pub mod image_store;

pub use database::DbClient;
pub use booking_repo::PgBookingRepository;
pub use memory_repo::InMemoryBookingRepository;
pub use image_store::{ImageStore, StoredImage};

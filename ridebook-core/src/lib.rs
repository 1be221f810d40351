pub mod booking;
pub mod validation;
pub mod repository;
pub mod upload;

pub use booking::{Booking, BookingDetails, BookingForm, NewBooking};
pub use repository::BookingRepository;
pub use upload::UploadConfig;
pub use validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Upload failed: {0}")]
    UploadError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

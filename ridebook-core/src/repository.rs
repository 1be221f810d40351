use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, NewBooking};
use crate::CoreResult;

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<Booking>>;

    /// Ongoing bookings of one user, in insertion order.
    async fn list_user_ongoing(&self, user: &str) -> CoreResult<Vec<Booking>>;

    /// Ongoing bookings of every user, in insertion order.
    async fn list_ongoing(&self) -> CoreResult<Vec<Booking>>;

    /// Sets `booking_status` and `is_on_going` to `confirmed` in a single write.
    /// Returns `None` without writing anything when the id is unknown.
    async fn set_confirmation(&self, id: Uuid, confirmed: bool) -> CoreResult<Option<Booking>>;
}

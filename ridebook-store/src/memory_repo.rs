use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use ridebook_core::{Booking, BookingRepository, CoreResult, NewBooking};

/// Keeps bookings in insertion order behind a single lock.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<Booking> {
        let booking = Booking::from_new(Uuid::new_v4(), booking, Utc::now());
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_user_ongoing(&self, user: &str) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().filter(|b| b.is_on_going && b.user == user).cloned().collect())
    }

    async fn list_ongoing(&self) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().filter(|b| b.is_on_going).cloned().collect())
    }

    async fn set_confirmation(&self, id: Uuid, confirmed: bool) -> CoreResult<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.iter_mut().find(|b| b.id == id).map(|b| {
            b.set_confirmation(confirmed);
            b.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use ridebook_core::BookingDetails;

    fn new_booking(user: &str) -> NewBooking {
        NewBooking {
            details: BookingDetails {
                first: "Ada".to_string(),
                last: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                pick_loc: "A".to_string(),
                drop_loc: "B".to_string(),
                reference: String::new(),
                no_of_ppl: "1".to_string(),
            },
            user: user.to_string(),
            img: "images/imageData-1.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_unconfirmed() {
        let repo = InMemoryBookingRepository::new();
        let booking = repo.create_booking(new_booking("u1")).await.unwrap();

        assert!(!booking.is_on_going);
        assert_eq!(booking.booking_status, None);
        assert_eq!(repo.get_booking(booking.id).await.unwrap(), Some(booking));
    }

    #[tokio::test]
    async fn test_ongoing_filters() {
        let repo = InMemoryBookingRepository::new();
        let a1 = repo.create_booking(new_booking("alice")).await.unwrap();
        let a2 = repo.create_booking(new_booking("alice")).await.unwrap();
        let b1 = repo.create_booking(new_booking("bob")).await.unwrap();

        repo.set_confirmation(a1.id, true).await.unwrap();
        repo.set_confirmation(a2.id, false).await.unwrap();
        repo.set_confirmation(b1.id, true).await.unwrap();

        let alice: Vec<Uuid> = repo.list_user_ongoing("alice").await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(alice, vec![a1.id]);

        let all: Vec<Uuid> = repo.list_ongoing().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(all, vec![a1.id, b1.id]);
    }

    #[tokio::test]
    async fn test_confirm_unknown_id_changes_nothing() {
        let repo = InMemoryBookingRepository::new();
        let existing = repo.create_booking(new_booking("u1")).await.unwrap();

        let result = repo.set_confirmation(Uuid::new_v4(), true).await.unwrap();
        assert!(result.is_none());
        assert_eq!(repo.get_booking(existing.id).await.unwrap(), Some(existing));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_keep_flags_together() {
        let repo = Arc::new(InMemoryBookingRepository::new());
        let id = repo.create_booking(new_booking("u1")).await.unwrap().id;

        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.set_confirmation(id, i % 2 == 0).await.unwrap()
            }));
        }
        for handle in handles {
            let seen = handle.await.unwrap().unwrap();
            assert_eq!(seen.booking_status, Some(seen.is_on_going));
        }

        let stored = repo.get_booking(id).await.unwrap().unwrap();
        assert_eq!(stored.booking_status, Some(stored.is_on_going));
    }
}

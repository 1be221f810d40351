use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Raw booking form as submitted by the client, before sanitization.
/// Fields the client did not send stay empty.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub first: String,
    pub last: String,
    pub email: String,
    pub pick_loc: String,
    pub drop_loc: String,
    pub reference: String,
    pub no_of_ppl: String,
}

impl BookingForm {
    /// Assigns a multipart text field by its wire name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "first" => &mut self.first,
            "last" => &mut self.last,
            "email" => &mut self.email,
            "pickLoc" => &mut self.pick_loc,
            "dropLoc" => &mut self.drop_loc,
            "reference" => &mut self.reference,
            "no_of_ppl" => &mut self.no_of_ppl,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Sanitized (trimmed, HTML-escaped) text fields of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub first: String,
    pub last: String,
    pub email: String,
    #[serde(rename = "pickLoc")]
    pub pick_loc: String,
    #[serde(rename = "dropLoc")]
    pub drop_loc: String,
    pub reference: String,
    pub no_of_ppl: String,
}

/// Everything needed to persist a booking. The repository assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub details: BookingDetails,
    pub user: String,
    pub img: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub details: BookingDetails,
    pub img: String,
    pub user: String,
    #[serde(rename = "isOnGoing")]
    pub is_on_going: bool,
    /// `None` until the booking is confirmed or declined.
    #[serde(rename = "bookingStatus")]
    pub booking_status: Option<bool>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_new(id: Uuid, new: NewBooking, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            details: new.details,
            img: new.img,
            user: new.user,
            is_on_going: false,
            booking_status: None,
            created_at,
        }
    }

    /// Confirmation writes both flags together.
    pub fn set_confirmation(&mut self, confirmed: bool) {
        self.booking_status = Some(confirmed);
        self.is_on_going = confirmed;
    }
}

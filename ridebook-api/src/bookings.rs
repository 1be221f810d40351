use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use ridebook_core::validation::validate_booking;
use ridebook_core::{Booking, BookingForm, FieldError, NewBooking};

use crate::error::AppError;
use crate::middleware::{caller_auth_middleware, CallerClaims};
use crate::state::AppState;

pub const IMAGE_FIELD: &str = "imageData";
pub const BOOKING_NOT_FOUND: &str = "Booking Does Not Exist!";

/// Room for the text fields and multipart framing around the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookedResponse {
    pub booked: bool,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct OngoingResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmBookingRequest {
    /// Kept loose so a missing or non-string id reads as an unknown booking.
    #[serde(rename = "bookingId", default)]
    pub booking_id: serde_json::Value,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfirmBookingResponse {
    #[serde(rename = "bookingStatus")]
    pub booking_status: bool,
}

struct UploadedImage {
    original_name: String,
    data: Vec<u8>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let body_limit = state.images.max_file_bytes() + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/bookings", post(create_booking).layer(DefaultBodyLimit::max(body_limit)))
        .route("/bookings/history", get(booking_history))
        .route("/bookings/ongoing", get(ongoing_bookings))
        .route("/bookings/confirm", post(confirm_booking))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), caller_auth_middleware))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /bookings
/// Create a booking from a multipart form carrying the ride details and one image
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CallerClaims>,
    mut multipart: Multipart,
) -> Result<Json<BookedResponse>, AppError> {
    let max_bytes = state.images.max_file_bytes();
    let mut form = BookingForm::default();
    let mut image: Option<UploadedImage> = None;

    // 1. Read the whole form; nothing touches disk yet
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        if name == IMAGE_FIELD {
            if image.is_some() {
                return Err(AppError::ValidationError(format!("Unexpected field: {}", IMAGE_FIELD)));
            }
            let original_name = field.file_name().unwrap_or("").to_string();
            let data = read_limited(field, max_bytes).await?;
            image = Some(UploadedImage { original_name, data });
            continue;
        }

        if field.file_name().is_some() {
            warn!("Unexpected file field: {}", name);
            return Err(AppError::ValidationError(format!("Unexpected field: {}", name)));
        }

        let value = field.text().await.map_err(multipart_error)?;
        if !form.set_field(&name, value) {
            warn!("Unknown booking form field: {}", name);
        }
    }

    // 2. Validate; any failure ends the request
    let validated = validate_booking(&form);
    let mut errors = validated.as_ref().err().cloned().unwrap_or_default();
    if image.is_none() {
        errors.push(FieldError::body(IMAGE_FIELD, "", "Image is required"));
    }
    let (details, image) = match (validated, image) {
        (Ok(details), Some(image)) => (details, image),
        _ => {
            warn!("Booking rejected for {}: {} field error(s)", claims.sub, errors.len());
            return Err(AppError::BookingRejected(errors));
        }
    };

    // 3. Persist the image, then the booking
    let stored = state.images
        .save(IMAGE_FIELD, &image.original_name, &image.data)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let booking = state.bookings
        .create_booking(NewBooking {
            details,
            user: claims.sub.clone(),
            img: stored.public_path,
        })
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    info!("Booking created: {} for {}", booking.id, claims.sub);

    Ok(Json(BookedResponse { booked: true, booking }))
}

/// GET /bookings/history
/// Ongoing bookings of the caller
async fn booking_history(
    State(state): State<AppState>,
    Extension(claims): Extension<CallerClaims>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state.bookings.list_user_ongoing(&claims.sub).await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(HistoryResponse { history }))
}

/// GET /bookings/ongoing
/// Ongoing bookings across all users
async fn ongoing_bookings(
    State(state): State<AppState>,
) -> Result<Json<OngoingResponse>, AppError> {
    let bookings = state.bookings.list_ongoing().await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(OngoingResponse { bookings }))
}

/// POST /bookings/confirm
/// Confirm (`confirmed: true`) or decline a booking
async fn confirm_booking(
    State(state): State<AppState>,
    Json(req): Json<ConfirmBookingRequest>,
) -> Result<Json<ConfirmBookingResponse>, AppError> {
    // An id that cannot exist is reported like a missing one
    let booking_id = req.booking_id.as_str()
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
        .ok_or_else(|| {
            warn!("Confirm for malformed booking id: {}", req.booking_id);
            AppError::NotFoundError(BOOKING_NOT_FOUND.to_string())
        })?;

    let booking = state.bookings.set_confirmation(booking_id, req.confirmed).await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| {
            warn!("Confirm for unknown booking: {}", booking_id);
            AppError::NotFoundError(BOOKING_NOT_FOUND.to_string())
        })?;

    info!("Booking {} confirmation set to {}", booking.id, req.confirmed);

    Ok(Json(ConfirmBookingResponse {
        booking_status: booking.booking_status.unwrap_or(req.confirmed),
    }))
}

// ============================================================================
// Multipart helpers
// ============================================================================

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            warn!("Upload exceeds {} bytes", max_bytes);
            return Err(AppError::PayloadTooLarge(format!("File too large, limit is {} bytes", max_bytes)));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::ValidationError(format!("Malformed form data: {}", e.body_text()))
    }
}

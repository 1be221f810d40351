use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use ridebook_core::{Booking, BookingDetails, BookingRepository, CoreError, CoreResult, NewBooking};

const BOOKING_COLUMNS: &str = "id, first, last, email, pick_loc, drop_loc, reference, no_of_ppl, img, user_id, is_on_going, booking_status, created_at";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    first: String,
    last: String,
    email: String,
    pick_loc: String,
    drop_loc: String,
    reference: String,
    no_of_ppl: String,
    img: String,
    user_id: String,
    is_on_going: bool,
    booking_status: Option<bool>,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            details: BookingDetails {
                first: row.first,
                last: row.last,
                email: row.email,
                pick_loc: row.pick_loc,
                drop_loc: row.drop_loc,
                reference: row.reference,
                no_of_ppl: row.no_of_ppl,
            },
            img: row.img,
            user: row.user_id,
            is_on_going: row.is_on_going,
            booking_status: row.booking_status,
            created_at: row.created_at,
        }
    }
}

fn storage(e: sqlx::Error) -> CoreError {
    CoreError::StorageError(e.to_string())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<Booking> {
        let sql = format!(
            r#"
            INSERT INTO bookings (id, first, last, email, pick_loc, drop_loc, reference, no_of_ppl, img, user_id, is_on_going, booking_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, NULL, $11)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );
        let d = &booking.details;

        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&d.first)
            .bind(&d.last)
            .bind(&d.email)
            .bind(&d.pick_loc)
            .bind(&d.drop_loc)
            .bind(&d.reference)
            .bind(&d.no_of_ppl)
            .bind(&booking.img)
            .bind(&booking.user)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        Ok(row.into())
    }

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<Booking>> {
        let sql = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        Ok(row.map(Booking::from))
    }

    async fn list_user_ongoing(&self, user: &str) -> CoreResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE user_id = $1 AND is_on_going = TRUE ORDER BY created_at",
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn list_ongoing(&self) -> CoreResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE is_on_going = TRUE ORDER BY created_at",
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn set_confirmation(&self, id: Uuid, confirmed: bool) -> CoreResult<Option<Booking>> {
        // Both flags in one statement
        let sql = format!(
            "UPDATE bookings SET booking_status = $1, is_on_going = $1 WHERE id = $2 RETURNING {}",
            BOOKING_COLUMNS
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(confirmed)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        Ok(row.map(Booking::from))
    }
}

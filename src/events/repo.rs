use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
pub enum EventType {
    Virtual,
    Physical,
}

#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub event_type: EventType,
    pub description: String,
    pub location: String,
    pub ticket_price: f64,
    pub available_tickets: i32,
    pub registration_closing_date: Date,
    pub start_date: Date,
    pub end_date: Date,
    pub start_time: String,
    pub end_time: String,
    pub tags: Vec<String>,
    pub creator: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Event row joined with the display-safe creator columns.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithCreator {
    #[sqlx(flatten)]
    pub event: Event,
    pub creator_username: String,
    pub creator_email: String,
}

const EVENT_COLUMNS: &str = r#"
    e.id, e.name, e.image, e.event_type, e.description, e.location,
    e.ticket_price, e.available_tickets, e.registration_closing_date,
    e.start_date, e.end_date, e.start_time, e.end_time, e.tags, e.creator,
    e.created_at, e.updated_at,
    u.username AS creator_username, u.email AS creator_email
"#;

pub struct NewEvent<'a> {
    pub name: &'a str,
    pub image: &'a str,
    pub event_type: EventType,
    pub description: &'a str,
    pub location: &'a str,
    pub ticket_price: f64,
    pub available_tickets: i32,
    pub registration_closing_date: Date,
    pub start_date: Date,
    pub end_date: Date,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub tags: &'a [String],
    pub creator: Uuid,
}

impl Event {
    pub async fn create(db: &PgPool, new: NewEvent<'_>) -> sqlx::Result<EventWithCreator> {
        sqlx::query_as::<_, EventWithCreator>(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO events
                    (name, image, event_type, description, location, ticket_price,
                     available_tickets, registration_closing_date, start_date,
                     end_date, start_time, end_time, tags, creator)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING *
            )
            SELECT {EVENT_COLUMNS}
            FROM inserted e
            JOIN users u ON u.id = e.creator
            "#
        ))
        .bind(new.name)
        .bind(new.image)
        .bind(new.event_type)
        .bind(new.description)
        .bind(new.location)
        .bind(new.ticket_price)
        .bind(new.available_tickets)
        .bind(new.registration_closing_date)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.tags)
        .bind(new.creator)
        .fetch_one(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<EventWithCreator>> {
        sqlx::query_as::<_, EventWithCreator>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            JOIN users u ON u.id = e.creator
            ORDER BY e.start_date ASC
            "#
        ))
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<EventWithCreator>> {
        sqlx::query_as::<_, EventWithCreator>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            JOIN users u ON u.id = e.creator
            WHERE e.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_by_creator(db: &PgPool, creator: Uuid) -> sqlx::Result<Vec<EventWithCreator>> {
        sqlx::query_as::<_, EventWithCreator>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            JOIN users u ON u.id = e.creator
            WHERE e.creator = $1
            ORDER BY e.start_date ASC
            "#
        ))
        .bind(creator)
        .fetch_all(db)
        .await
    }

    /// Full-document overwrite; the handler revalidates before calling.
    /// The creator column is left untouched.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        new: NewEvent<'_>,
    ) -> sqlx::Result<Option<EventWithCreator>> {
        sqlx::query_as::<_, EventWithCreator>(&format!(
            r#"
            WITH updated AS (
                UPDATE events SET
                    name = $2, image = $3, event_type = $4, description = $5,
                    location = $6, ticket_price = $7, available_tickets = $8,
                    registration_closing_date = $9, start_date = $10,
                    end_date = $11, start_time = $12, end_time = $13,
                    tags = $14, updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT {EVENT_COLUMNS}
            FROM updated e
            JOIN users u ON u.id = e.creator
            "#
        ))
        .bind(id)
        .bind(new.name)
        .bind(new.image)
        .bind(new.event_type)
        .bind(new.description)
        .bind(new.location)
        .bind(new.ticket_price)
        .bind(new.available_tickets)
        .bind(new.registration_closing_date)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.tags)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Free-text OR over name/description, ANDed with the structured
    /// filters; every dimension is optional.
    pub async fn search_filter(
        db: &PgPool,
        search: Option<&str>,
        location: Option<&str>,
        date_from: Option<Date>,
    ) -> sqlx::Result<Vec<EventWithCreator>> {
        sqlx::query_as::<_, EventWithCreator>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            JOIN users u ON u.id = e.creator
            WHERE ($1::text IS NULL
                   OR e.name ILIKE '%' || $1 || '%'
                   OR e.description ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR e.location = $2)
              AND ($3::date IS NULL OR e.start_date >= $3)
            ORDER BY e.start_date ASC
            "#
        ))
        .bind(search)
        .bind(location)
        .bind(date_from)
        .fetch_all(db)
        .await
    }
}

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::events::repo::{EventType, EventWithCreator, NewEvent};

/// Create/update payload; updates revalidate the whole document. A
/// client-supplied creator would be ignored — the creator always comes
/// from the session identity.
#[derive(Debug, Deserialize, Validate)]
pub struct EventPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(url)]
    pub image: String,
    pub event_type: EventType,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0.0))]
    pub ticket_price: f64,
    #[validate(range(min = 0))]
    pub available_tickets: i32,
    pub registration_closing_date: Date,
    pub start_date: Date,
    pub end_date: Date,
    #[validate(length(min = 1))]
    pub start_time: String,
    #[validate(length(min = 1))]
    pub end_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EventPayload {
    pub fn as_new_event(&self, creator: Uuid) -> NewEvent<'_> {
        NewEvent {
            name: &self.name,
            image: &self.image,
            event_type: self.event_type,
            description: &self.description,
            location: &self.location,
            ticket_price: self.ticket_price,
            available_tickets: self.available_tickets,
            registration_closing_date: self.registration_closing_date,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: &self.start_time,
            end_time: &self.end_time,
            tags: &self.tags,
            creator,
        }
    }
}

/// Display-safe subset of the creator embedded in event responses.
#[derive(Debug, Serialize)]
pub struct CreatorInfo {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
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
    pub creator: CreatorInfo,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<EventWithCreator> for EventResponse {
    fn from(row: EventWithCreator) -> Self {
        let e = row.event;
        Self {
            id: e.id,
            name: e.name,
            image: e.image,
            event_type: e.event_type,
            description: e.description,
            location: e.location,
            ticket_price: e.ticket_price,
            available_tickets: e.available_tickets,
            registration_closing_date: e.registration_closing_date,
            start_date: e.start_date,
            end_date: e.end_date,
            start_time: e.start_time,
            end_time: e.end_time,
            tags: e.tags,
            creator: CreatorInfo {
                username: row.creator_username,
                email: row.creator_email,
            },
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchFilterQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    /// Lower bound on the start date.
    pub date: Option<Date>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_payload;
    use time::macros::date;

    fn payload() -> EventPayload {
        EventPayload {
            name: "Lagos Music Festival".into(),
            image: "https://cdn.example.com/festival.png".into(),
            event_type: EventType::Physical,
            description: "A day of live music".into(),
            location: "Lagos".into(),
            ticket_price: 5000.0,
            available_tickets: 250,
            registration_closing_date: date!(2026 - 10 - 01),
            start_date: date!(2026 - 10 - 10),
            end_date: date!(2026 - 10 - 11),
            start_time: "10:00".into(),
            end_time: "22:00".into(),
            tags: vec!["music".into(), "festival".into()],
        }
    }

    #[test]
    fn valid_event_passes() {
        assert!(validate_payload(&payload()).is_ok());
    }

    #[test]
    fn negative_ticket_price_rejected() {
        let mut p = payload();
        p.ticket_price = -1.0;
        let err = validate_payload(&p).unwrap_err();
        assert!(format!("{err}").contains("ticket_price"));
    }

    #[test]
    fn multiple_violations_all_reported() {
        let mut p = payload();
        p.name = String::new();
        p.image = "not-a-url".into();
        p.available_tickets = -5;
        let err = validate_payload(&p).unwrap_err();
        let detail = format!("{err}");
        assert!(detail.contains("name"));
        assert!(detail.contains("image"));
        assert!(detail.contains("available_tickets"));
    }

    #[test]
    fn iso_date_strings_deserialize() {
        let q: SearchFilterQuery = serde_json::from_value(serde_json::json!({
            "search": "music",
            "date": "2026-10-01"
        }))
        .unwrap();
        assert_eq!(q.date, Some(date!(2026 - 10 - 01)));
        assert_eq!(q.search.as_deref(), Some("music"));
        assert!(q.location.is_none());
    }

    #[test]
    fn event_type_parses_lowercase() {
        let p: EventPayload = serde_json::from_value(serde_json::json!({
            "name": "Remote meetup",
            "image": "https://cdn.example.com/meetup.png",
            "event_type": "virtual",
            "description": "Online gathering",
            "location": "Remote",
            "ticket_price": 0.0,
            "available_tickets": 100,
            "registration_closing_date": "2026-05-01",
            "start_date": "2026-05-02",
            "end_date": "2026-05-02",
            "start_time": "18:00",
            "end_time": "20:00"
        }))
        .unwrap();
        assert_eq!(p.event_type, EventType::Virtual);
        assert_eq!(p.start_date, date!(2026 - 05 - 02));
        assert!(p.tags.is_empty());
    }
}

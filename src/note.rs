use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A single user note with a manual display rank.
///
/// Notes are shown highest `sort_order` first. Column names follow the
/// persisted `Note` table layout.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Note {
    pub id: String,
    pub text: String,
    #[sqlx(rename = "sortOrder")]
    pub sort_order: i64,
    #[sqlx(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    #[sqlx(rename = "dateUpdated")]
    pub date_updated: DateTime<Utc>,
}

impl Note {
    /// Builds a fresh, not yet persisted note at the given rank.
    ///
    /// The id is a random v4 UUID, so generating it never touches the database.
    /// Both timestamps come from a single `Utc::now()` reading.
    pub fn new(text: impl Into<String>, sort_order: i64) -> Self {
        let now = Utc::now();

        Note {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sort_order,
            date_created: now,
            date_updated: now,
        }
    }
}

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// One row of the public course list, with coach and skill names resolved.
#[derive(Debug, Serialize)]
pub struct CourseListItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    pub max_participants: i32,
    pub coach_name: String,
    pub skill_name: String,
}

use serde::{Deserialize, Serialize};

use crate::{coaches::repo::Coach, courses::repo::Course};

/// Body for the coach promotion. The profile image is optional; when absent
/// the coach row stores NULL.
#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    pub experience_years: i32,
    pub description: String,
    pub profile_image_url: Option<String>,
}

/// `data` payload after promotion: the refreshed user plus the new coach row.
#[derive(Debug, Serialize)]
pub struct PromoteData {
    pub user: PromotedUser,
    pub coach: Coach,
}

#[derive(Debug, Serialize)]
pub struct PromotedUser {
    pub name: String,
    pub role: String,
}

/// Body for course create. Updates reuse the same shape minus `user_id`
/// (ownership never changes).
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub user_id: String,
    pub skill_id: String,
    pub name: String,
    pub description: String,
    pub start_at: String,
    pub end_at: String,
    pub max_participants: i32,
    pub meeting_url: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub skill_id: String,
    pub name: String,
    pub description: String,
    pub start_at: String,
    pub end_at: String,
    pub max_participants: i32,
    pub meeting_url: String,
}

#[derive(Debug, Serialize)]
pub struct CourseData {
    pub course: Course,
}

/// Update keeps the original payload key.
#[derive(Debug, Serialize)]
pub struct SavedCourseData {
    #[serde(rename = "savedCourse")]
    pub saved_course: Course,
}

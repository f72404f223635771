use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SkillItem {
    pub id: Uuid,
    pub name: String,
}

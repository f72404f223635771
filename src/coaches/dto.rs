use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::Coach;

/// Query string for the coach list. Both values are mandatory; they arrive
/// as raw strings and the handler parses them so a missing or garbled value
/// gets the usual field failure instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct CoachListQuery {
    pub per: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoachListItem {
    pub id: Uuid,
    pub name: String,
}

/// `data` payload for the coach detail view.
#[derive(Debug, Serialize)]
pub struct CoachDetailData {
    pub user: CoachOwner,
    pub coach: Coach,
}

#[derive(Debug, Serialize)]
pub struct CoachOwner {
    pub name: String,
    pub role: String,
}

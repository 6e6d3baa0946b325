//! User profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub bio: Option<String>,
    pub institution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-editable profile fields (create and replace)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

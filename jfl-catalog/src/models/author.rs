//! Author identities

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Id;

/// An author identity
///
/// Identity is the exact display name: two authors with the same name string
/// are the same author. `profile_id` links the author to a claimed profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: Id,
    pub name: String,
    pub profile_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

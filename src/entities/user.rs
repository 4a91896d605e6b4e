use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Read-only projection of the identity service's users table.
/// Only what post/comment author snapshots need.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRecord {
    pub id: Uuid,
    pub title: String,
    /// Internal role name when it differs from the advertised title.
    pub role_name: Option<String>,
    pub company_name: Option<String>,
    /// Send the qualified-candidate notification automatically.
    pub auto_notify: bool,
}

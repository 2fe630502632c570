use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload proving a logged-in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // normalized email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>, // display name
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}

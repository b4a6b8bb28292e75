use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    /// Response delay in nanoseconds.
    pub delay: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredBidder {
    pub id: String,
}

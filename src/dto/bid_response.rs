use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidResponse {
    pub bidder_id: String,
    pub amount: u32,
}

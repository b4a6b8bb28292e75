use serde::{Deserialize, Serialize};

/// Shape shared by every body exchanged with the auctioneer: a payload under
/// `data` and status information under `meta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, status: u16) -> Self {
        Self {
            data,
            meta: Meta {
                status,
                message: None,
            },
        }
    }
}

/// Error responses carry no usable `data`, only `meta`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaOnly {
    #[serde(default)]
    pub meta: Meta,
}

use std::fmt;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use tracing::{debug, info, warn};

use crate::dto::envelope::{Envelope, MetaOnly};
use crate::dto::registration::{RegisteredBidder, RegistrationRequest};
use crate::error::RegistrationError;

/// Where the auctioneer accepts bidder registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctioneerEndpoint {
    host: String,
    path: String,
}

impl AuctioneerEndpoint {
    pub fn new(host: &str, path: &str) -> Self {
        Self {
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Host and path are joined verbatim; the host carries the scheme.
    pub fn url(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

/// Identifier handed out by the auctioneer on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidderIdentity(String);

impl BidderIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BidderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The address the auctioneer should use to reach this bidder.
pub fn advertised_host(port: u16) -> String {
    format!("localhost:{port}")
}

/// Announce this bidder to the auctioneer and return the identifier it assigns.
///
/// Exactly one request is made. Anything other than `201 Created` with a
/// decodable `{data: {id}, meta}` body is an error; there is no retry.
///
/// The delay is sent as signed nanoseconds and saturates at `i64::MAX`;
/// `Args::validate` rejects delays that large before registration.
pub async fn register(
    client: &Client,
    name: &str,
    delay: Duration,
    endpoint: &AuctioneerEndpoint,
    port: u16,
) -> Result<BidderIdentity, RegistrationError> {
    let body = RegistrationRequest {
        name: name.to_string(),
        delay: i64::try_from(delay.as_nanos()).unwrap_or(i64::MAX),
    };
    let url = endpoint.url();

    debug!(%url, name, delay_ns = body.delay, "registering with auctioneer");

    let response = client
        .post(&url)
        .header(header::HOST, advertised_host(port))
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let bytes = response.bytes().await?;

    if status != StatusCode::CREATED {
        let message = rejection_message(status, &bytes);
        warn!(%status, %message, "auctioneer rejected registration");
        return Err(RegistrationError::Rejected(message));
    }

    let envelope: Envelope<RegisteredBidder> = serde_json::from_slice(&bytes)?;
    let identity = BidderIdentity::new(envelope.data.id);

    info!(bidder_id = %identity, "registered with auctioneer");
    Ok(identity)
}

/// Error statuses may explain themselves in `meta.message`; anything else
/// gets a generic description.
fn rejection_message(status: StatusCode, body: &[u8]) -> String {
    if status.as_u16() > StatusCode::CREATED.as_u16() {
        let message = serde_json::from_slice::<MetaOnly>(body)
            .ok()
            .and_then(|parsed| parsed.meta.message)
            .filter(|message| !message.is_empty());
        if let Some(message) = message {
            return message;
        }
    }
    format!("auctioneer responded with {status}")
}

use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use actix_web::{post, web, HttpResponse};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::dto::bid_response::BidResponse;
use crate::dto::envelope::Envelope;
use crate::registration::BidderIdentity;

/// Bounds of every generated bid, inclusive on both ends.
pub const BID_AMOUNT_RANGE: RangeInclusive<u32> = 100..=3000;

/// Everything the bid handler needs, built once after registration.
pub struct BidResponder {
    bidder_id: BidderIdentity,
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl BidResponder {
    /// Seeds the generator from OS entropy.
    pub fn new(bidder_id: BidderIdentity, delay: Duration) -> Self {
        Self::with_rng(bidder_id, delay, StdRng::from_entropy())
    }

    pub fn with_seed(bidder_id: BidderIdentity, delay: Duration, seed: u64) -> Self {
        Self::with_rng(bidder_id, delay, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bidder_id: BidderIdentity, delay: Duration, rng: StdRng) -> Self {
        Self {
            bidder_id,
            delay,
            rng: Mutex::new(rng),
        }
    }

    pub fn bidder_id(&self) -> &BidderIdentity {
        &self.bidder_id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn next_amount(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(BID_AMOUNT_RANGE)
    }

    /// Wait out the configured delay, then produce a fresh bid.
    pub async fn respond(&self) -> BidResponse {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        BidResponse {
            bidder_id: self.bidder_id.to_string(),
            amount: self.next_amount(),
        }
    }
}

#[post("/v1/bid")]
pub async fn submit_bid(responder: web::Data<BidResponder>) -> HttpResponse {
    let bid = responder.respond().await;
    debug!(bidder_id = %bid.bidder_id, amount = bid.amount, "bid placed");

    HttpResponse::Ok()
        .content_type("application/json")
        .json(Envelope::ok(bid, 200))
}

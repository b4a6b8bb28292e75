pub mod bidding;
pub mod bootstrap;
pub mod cli;
pub mod dto;
pub mod error;
pub mod registration;
pub mod settings;
pub mod test_support;

pub use bootstrap::{init_tracing, load_dotenv, start};

use actix_cors::Cors;
use actix_web::http::header;

use bidding::submit_bid;

/// CORS preflight results may be cached for this long, in seconds.
pub const CORS_MAX_AGE_SECS: usize = 12 * 60 * 60;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(submit_bid);
}

/// Any origin may call in, but only GET and OPTIONS are allowed. The bid route
/// is POST, so browser-originated bids fail preflight; server-to-server calls
/// from the auctioneer carry no CORS checks and are unaffected.
pub fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_header(header::ORIGIN)
        .supports_credentials()
        .max_age(CORS_MAX_AGE_SECS)
}

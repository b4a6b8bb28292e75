use std::env;
use std::sync::OnceLock;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bidding::BidResponder;
use crate::cli::Args;
use crate::error::Result;
use crate::registration::register;
use crate::settings::Settings;
use crate::{build_cors, configure_routes};

static DOTENV_INIT: OnceLock<()> = OnceLock::new();
static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Load environment variables from .env file exactly once
pub fn load_dotenv() {
    DOTENV_INIT.get_or_init(|| {
        dotenv::dotenv().ok();
    });
}

/// Initialize tracing exactly once
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,bidder=info"));

        let is_production =
            env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";

        if is_production {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    });
}

/// Validate arguments, load settings from the working directory, register,
/// then serve bids until the server stops.
///
/// Each step must succeed before the next begins, so a bad port never reaches
/// the config loader and a failed registration never binds the listener.
pub async fn start(args: Args) -> Result<()> {
    args.validate()?;
    let settings = Settings::load()?;
    let responder = register_bidder(&args, &settings).await?;

    info!(
        name = %args.name,
        port = args.port,
        delay_ms = args.delay,
        "Starting bidder"
    );
    serve(args.port, responder).await?;
    Ok(())
}

/// Perform the registration handshake and build the responder around the
/// identity it yields.
pub async fn register_bidder(args: &Args, settings: &Settings) -> Result<BidResponder> {
    let endpoint = settings.endpoint();
    let client = reqwest::Client::new();

    let identity = register(
        &client,
        &args.name,
        args.response_delay(),
        &endpoint,
        args.port,
    )
    .await?;

    Ok(BidResponder::new(identity, args.response_delay()))
}

pub async fn serve(port: u16, responder: BidResponder) -> std::io::Result<()> {
    let responder = web::Data::new(responder);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors())
            .wrap(TracingLogger::default())
            .app_data(responder.clone())
            .configure(configure_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

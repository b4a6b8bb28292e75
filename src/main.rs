use anyhow::Context;

use bidder::cli::Args;
use bidder::{init_tracing, load_dotenv, start};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    let args = Args::from_env();

    start(args).await.context("bidder stopped")
}

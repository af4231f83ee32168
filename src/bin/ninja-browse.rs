use clap::Parser;
use ninja_browse::{
    config::{Args, BrowseConfig},
    logging::init_logging,
    server::serve,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = BrowseConfig::from(Args::parse());
    serve(config).await
}

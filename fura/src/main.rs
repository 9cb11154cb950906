use clap::Parser;
use fura_lib::Cli;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = fura_lib::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

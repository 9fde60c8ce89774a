/// Crawls the whole instrument listing and writes it to disk
///
/// Produces `stock_json.txt` (the raw listing) and `stock_list.txt` (one
/// symbol per line) in the working directory. No login is needed.
///
/// To run this example:
/// ```bash
/// cargo run --bin instrument_dump
/// ```
use robinhood_client::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_logger();
    let client = Client::new(Config::new())?;

    info!("Fetching instrument listing from {}", client.endpoints().base_url());
    let instruments = client.get_all_instruments().await?;

    let written = export_instruments(&instruments, "stock_json.txt", "stock_list.txt")?;
    info!(
        "Wrote {} instruments, {} symbols to stock_list.txt",
        instruments.len(),
        written
    );
    Ok(())
}

/// Logs in, prints a few account fields and the open positions, then logs out
///
/// Credentials come from `RH_USERNAME` / `RH_PASSWORD` (and optionally
/// `RH_MFA_CODE`). When they are not set the example asks on the terminal.
///
/// To run this example:
/// ```bash
/// cargo run --bin account_summary
/// ```
use prettytable::{Cell, Row, Table, format};
use robinhood_client::prelude::*;
use serde_json::Value;
use tracing::{error, info, warn};

fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_logger();
    let config = Config::new();
    info!("Configuration loaded: {}", config);

    let mut client = Client::new(config)?;

    let env_provider = EnvCredentials;
    let authenticated = if env_provider.credentials().is_ok() {
        client.authenticate(&env_provider).await?
    } else {
        warn!("RH_USERNAME / RH_PASSWORD not set, asking on the terminal");
        client.authenticate(&PromptCredentials::stdin()).await?
    };
    if !authenticated {
        error!("Login failed");
        return Ok(());
    }

    let account_number = client.get_account_number().await?;
    let buying_power = client.get_field(AccountField::BuyingPower).await?;
    let cash = client.get_field(AccountField::Cash).await?;
    info!("Account {}", account_number);
    info!("  Buying power: {}", buying_power);
    info!("  Cash: {}", cash);

    match client.get_position_history(true).await {
        Ok(positions) if positions.is_empty() => info!("No open positions"),
        Ok(positions) => {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BOX_CHARS);
            table.add_row(Row::new(vec![
                Cell::new("INSTRUMENT"),
                Cell::new("QUANTITY"),
                Cell::new("AVERAGE BUY PRICE"),
                Cell::new("UPDATED"),
            ]));
            for position in &positions {
                table.add_row(Row::new(vec![
                    Cell::new(&text(position, "instrument")),
                    Cell::new(&text(position, "quantity")),
                    Cell::new(&text(position, "average_buy_price")),
                    Cell::new(&text(position, "updated_at")),
                ]));
            }
            info!("{} open positions", positions.len());
            table.printstd();
        }
        Err(e) => error!("Failed to fetch positions: {}", e),
    }

    client.deauthenticate().await?;
    info!("Logged out");
    Ok(())
}

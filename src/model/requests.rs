/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/
use crate::constants::DEFAULT_ORDER_PRICE;
use crate::error::AppError;
use once_cell::sync::Lazy;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static SYMBOL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9.\-]{1,12}$").expect("valid symbol pattern"));

/// Normalizes a ticker symbol to upper case and validates its characters
///
/// # Errors
/// `AppError::InvalidInput` when the symbol is empty, too long, or contains
/// characters other than letters, digits, `.` and `-`.
pub fn normalize_symbol(symbol: &str) -> Result<String, AppError> {
    let upper = symbol.trim().to_uppercase();
    if SYMBOL_PATTERN.is_match(&upper) {
        Ok(upper)
    } else {
        Err(AppError::InvalidInput(format!(
            "invalid ticker symbol: '{symbol}'"
        )))
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at the market price
    Market,
    /// Execute at the given price or better
    Limit,
}

/// How long an order stays working
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good for the day
    Gfd,
    /// Good till cancelled
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// At the opening
    Opg,
}

/// What triggers the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Submit right away
    #[default]
    Immediate,
    /// Submit once the stop price is reached
    Stop,
}

macro_rules! wire_name {
    ($($ty:ty => { $($variant:path => $name:literal),+ $(,)? }),+ $(,)?) => {
        $(
            impl $ty {
                /// Value sent on the wire
                #[must_use]
                pub fn as_str(&self) -> &'static str {
                    match self {
                        $($variant => $name),+
                    }
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

wire_name! {
    Side => { Side::Buy => "buy", Side::Sell => "sell" },
    OrderType => { OrderType::Market => "market", OrderType::Limit => "limit" },
    TimeInForce => {
        TimeInForce::Gfd => "gfd",
        TimeInForce::Gtc => "gtc",
        TimeInForce::Ioc => "ioc",
        TimeInForce::Opg => "opg",
    },
    Trigger => { Trigger::Immediate => "immediate", Trigger::Stop => "stop" },
}

/// Parameters of a buy or sell order, without the side
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Ticker symbol
    pub symbol: String,
    /// Market or limit
    pub order_type: OrderType,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Number of shares
    pub quantity: u32,
    /// Price as a decimal string
    pub price: String,
    /// Trigger
    pub trigger: Trigger,
}

impl OrderRequest {
    /// Creates an order with the default price and an immediate trigger
    pub fn new(
        symbol: impl Into<String>,
        order_type: OrderType,
        time_in_force: TimeInForce,
        quantity: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            order_type,
            time_in_force,
            quantity,
            price: DEFAULT_ORDER_PRICE.to_string(),
            trigger: Trigger::Immediate,
        }
    }

    /// Sets the price
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    /// Sets the trigger
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Checks the fields that can be checked locally
    pub fn validate(&self) -> Result<(), AppError> {
        normalize_symbol(&self.symbol)?;
        if self.quantity == 0 {
            return Err(AppError::InvalidInput(
                "quantity must be positive".to_string(),
            ));
        }
        match self.price.trim().parse::<f64>() {
            Ok(p) if p > 0.0 => Ok(()),
            _ => Err(AppError::InvalidInput(format!(
                "price must be a positive decimal: '{}'",
                self.price
            ))),
        }
    }

    /// Form body of the order submission
    ///
    /// `account_url` and `instrument_url` are the absolute addresses of the
    /// account and instrument records.
    pub fn to_form(
        &self,
        account_url: &str,
        instrument_url: &str,
        side: Side,
    ) -> Vec<(String, String)> {
        vec![
            ("account".to_string(), account_url.to_string()),
            ("instrument".to_string(), instrument_url.to_string()),
            ("symbol".to_string(), self.symbol.trim().to_uppercase()),
            ("type".to_string(), self.order_type.to_string()),
            ("time_in_force".to_string(), self.time_in_force.to_string()),
            ("price".to_string(), self.price.clone()),
            ("trigger".to_string(), self.trigger.to_string()),
            ("quantity".to_string(), self.quantity.to_string()),
            ("side".to_string(), side.to_string()),
        ]
    }
}

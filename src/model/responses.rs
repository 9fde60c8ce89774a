/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/
use crate::constants::MIN_ORDER_RESPONSE_FIELDS;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login endpoint response
///
/// Only the fields the login flow looks at; anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Issued token, present only on success
    #[serde(default)]
    pub token: Option<String>,
    /// Set when a multi-factor code must accompany the credentials
    #[serde(default)]
    pub mfa_required: bool,
    /// Kind of multi-factor challenge (`"sms"`, `"app"`)
    #[serde(default)]
    pub mfa_type: Option<String>,
    /// Error detail
    #[serde(default)]
    pub detail: Option<String>,
    /// Form validation errors
    #[serde(default)]
    pub non_field_errors: Vec<String>,
}

impl LoginResponse {
    /// Reads the interesting fields out of a decoded body
    ///
    /// Fields of an unexpected JSON type are treated as absent, so a
    /// malformed body reads as a failed login rather than an error.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        Self {
            token: text("token"),
            mfa_required: value
                .get("mfa_required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            mfa_type: text("mfa_type"),
            detail: text("detail"),
            non_field_errors: value
                .get("non_field_errors")
                .and_then(Value::as_array)
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Token, if one was issued and is not empty
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Human-readable reason for a failed login
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match (&self.detail, self.non_field_errors.is_empty()) {
            (Some(detail), _) => Some(detail.clone()),
            (None, false) => Some(self.non_field_errors.join("; ")),
            (None, true) => None,
        }
    }
}

/// Result of an order submission
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    /// The order was accepted; the confirmation payload
    Placed(Map<String, Value>),
    /// The order was refused
    Rejected {
        /// Server-provided reason, when the payload carried a `detail` field
        detail: Option<String>,
        /// The raw payload
        payload: Value,
    },
}

impl OrderOutcome {
    /// Classifies an order response.
    ///
    /// Error payloads usually carry a single `detail` field while a
    /// confirmation carries the full order record, so anything with fewer than
    /// three top-level fields counts as a rejection. This follows the payload
    /// shape only; the HTTP status is not consulted.
    #[must_use]
    pub fn from_response(payload: Value) -> Self {
        match payload {
            Value::Object(map) if map.len() >= MIN_ORDER_RESPONSE_FIELDS => {
                OrderOutcome::Placed(map)
            }
            other => OrderOutcome::Rejected {
                detail: other.get("detail").and_then(Value::as_str).map(String::from),
                payload: other,
            },
        }
    }

    /// Whether the order was accepted
    #[must_use]
    pub fn is_placed(&self) -> bool {
        matches!(self, OrderOutcome::Placed(_))
    }

    /// Order id from the confirmation
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        match self {
            OrderOutcome::Placed(map) => map.get("id").and_then(Value::as_str),
            OrderOutcome::Rejected { .. } => None,
        }
    }
}

/// One page of the instrument listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentPage {
    /// Instruments on this page
    #[serde(default)]
    pub results: Vec<Value>,
    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Session-scoped client for the Robinhood API
//!
//! One client holds one session. After [`Client::authenticate`] every
//! resource accessor sends the stored token; before it (or after
//! [`Client::deauthenticate`]) they fail with `AppError::NotAuthenticated`
//! without touching the network.
//!
//! # Example
//! ```ignore
//! use robinhood_client::prelude::*;
//!
//! let mut client = Client::new(Config::new())?;
//! if client.authenticate(&PromptCredentials::stdin()).await? {
//!     let cash = client.get_field(AccountField::Cash).await?;
//!     let active = client.get_position_history(true).await?;
//!     client.deauthenticate().await?;
//! }
//! ```

use crate::application::auth::Session;
use crate::application::config::Config;
use crate::application::credentials::{CredentialProvider, Credentials};
use crate::application::endpoints::{Endpoint, Endpoints, Resource};
use crate::error::AppError;
use crate::model::fields::{FieldSelector, ResourceField};
use crate::model::http::{ApiRequest, HttpTransport, ReqwestTransport};
use crate::model::positions::filter_active_positions;
use crate::model::requests::{OrderRequest, Side, normalize_symbol};
use crate::model::responses::{InstrumentPage, LoginResponse, OrderOutcome};
use crate::utils::logger::{MessageSink, TracingSink};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Client for the Robinhood REST API holding one authentication session
pub struct Client<T: HttpTransport = ReqwestTransport> {
    config: Arc<Config>,
    endpoints: Arc<Endpoints>,
    transport: Arc<T>,
    session: Session,
    sink: Arc<dyn MessageSink>,
}

impl Client<ReqwestTransport> {
    /// Creates an unauthenticated client using `reqwest` and reporting through `tracing`
    ///
    /// # Errors
    /// When the underlying HTTP client cannot be built
    pub fn new(config: Config) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport, Arc::new(TracingSink)))
    }
}

impl<T: HttpTransport + 'static> Client<T> {
    /// Creates an unauthenticated client over an arbitrary transport and message sink
    pub fn with_transport(config: Config, transport: T, sink: Arc<dyn MessageSink>) -> Self {
        let endpoints = Endpoints::new(&config.rest_api.base_url);
        Self {
            config: Arc::new(config),
            endpoints: Arc::new(endpoints),
            transport: Arc::new(transport),
            session: Session::new(),
            sink,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Endpoint table in use
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// True iff a token is held
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Logs in with credentials from `provider`
    ///
    /// When the server asks for a multi-factor code, the code pre-supplied with
    /// the credentials is used, otherwise the provider is asked for one, and
    /// the credentials are submitted a second time together with the code.
    /// Success means the final response carried a `token`.
    ///
    /// # Returns
    /// * `Ok(true)` - Token stored, the client is authenticated
    /// * `Ok(false)` - The server issued no token; the previous session is kept
    /// * `Err(AppError)` - Provider or transport failure; the previous session is kept
    pub async fn authenticate(
        &mut self,
        provider: &dyn CredentialProvider,
    ) -> Result<bool, AppError> {
        let credentials = provider.credentials()?;
        let previous = self.session.clone();
        self.session.begin_authentication();

        match self.login(&credentials, provider).await {
            Ok(Some(token)) => {
                self.session.establish(&credentials.username, &token);
                self.sink.info(&format!(
                    "Login for username: {} succeeded",
                    credentials.username
                ));
                Ok(true)
            }
            Ok(None) => {
                self.session = previous;
                Ok(false)
            }
            Err(e) => {
                self.session = previous;
                Err(e)
            }
        }
    }

    async fn login(
        &self,
        credentials: &Credentials,
        provider: &dyn CredentialProvider,
    ) -> Result<Option<String>, AppError> {
        let url = self.endpoints.url(Endpoint::Login);
        let mut form = vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ];

        debug!("Sending login request for {}", credentials.username);
        let body = self
            .transport
            .send(ApiRequest::post(&url).with_form(form.clone()))
            .await?;
        let mut response = LoginResponse::from_value(&body);

        if response.token().is_none() && response.mfa_required {
            let mfa_type = response.mfa_type.as_deref();
            self.sink.info(&format!(
                "Multi-factor code required ({})",
                mfa_type.unwrap_or("unspecified type")
            ));
            let code = match &credentials.mfa_code {
                Some(code) => code.clone(),
                None => provider.mfa_code(mfa_type)?,
            };
            form.push(("mfa_code".to_string(), code));

            let body = self
                .transport
                .send(ApiRequest::post(&url).with_form(form))
                .await?;
            response = LoginResponse::from_value(&body);
        }

        match response.token() {
            Some(token) => Ok(Some(token.to_string())),
            None => {
                let reason = response
                    .failure_reason()
                    .map(|r| format!(": {r}"))
                    .unwrap_or_default();
                self.sink.error(&format!(
                    "Login for username: {} failed{}",
                    credentials.username, reason
                ));
                Ok(None)
            }
        }
    }

    /// Logs out
    ///
    /// Without a session this only emits a warning. Otherwise the logout
    /// request is sent and the session is cleared whatever its outcome; a
    /// transport failure is returned after clearing.
    pub async fn deauthenticate(&mut self) -> Result<(), AppError> {
        let Some(token) = self.session.token().map(String::from) else {
            self.sink.warn("Cannot logout if you haven't logged in first");
            return Ok(());
        };

        let request = ApiRequest::post(self.endpoints.url(Endpoint::Logout)).with_token(&token);
        let result = self.transport.send(request).await;
        self.session.clear();

        match result {
            Ok(_) => {
                self.sink.info("Logged out");
                Ok(())
            }
            Err(e) => {
                self.sink
                    .warn(&format!("Logout request failed, session cleared: {e}"));
                Err(e)
            }
        }
    }

    /// Asks the server to email a password-reset link
    ///
    /// Does not need a session.
    pub async fn request_password_reset(&self, email: &str) -> Result<Value, AppError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::InvalidInput(format!("invalid email: '{email}'")));
        }
        let request = ApiRequest::post(self.endpoints.url(Endpoint::PasswordReset))
            .with_form(vec![("email".to_string(), email.to_string())]);
        self.transport.send(request).await
    }

    fn require_token(&self) -> Result<String, AppError> {
        self.session
            .token()
            .map(String::from)
            .ok_or(AppError::NotAuthenticated)
    }

    // ------------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------------

    async fn fetch(&self, resource: Resource) -> Result<Value, AppError> {
        let token = self.require_token()?;
        let url = self.endpoints.url(resource.endpoint());
        debug!("Fetching {}", resource);
        self.transport
            .send(ApiRequest::get(url).with_token(&token))
            .await
    }

    /// Fetches a resource and returns the whole mapping or one field of it
    ///
    /// # Errors
    /// * `NotAuthenticated` - No session; nothing was sent
    /// * `UnknownField` - The response has no such field
    /// * `EmptyResults` - Accounts or positions came back without entries
    pub async fn get_resource(
        &self,
        resource: Resource,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        let selector = selector.into();
        let body = self.fetch(resource).await?;
        let mapping = effective_mapping(resource, body)?;
        select_field(resource, mapping, &selector)
    }

    /// Fetches one known field and checks its JSON kind
    pub async fn get_field<F: ResourceField>(&self, field: F) -> Result<Value, AppError> {
        let value = self.get_resource(F::RESOURCE, field).await?;
        if field.kind().matches(&value) {
            Ok(value)
        } else {
            Err(AppError::FieldType {
                field: field.key().to_string(),
                expected: field.kind().to_string(),
            })
        }
    }

    /// Account data (first account)
    pub async fn get_account_data(
        &self,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        self.get_resource(Resource::Accounts, selector).await
    }

    /// User record
    pub async fn get_user_info(
        &self,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        self.get_resource(Resource::UserInfo, selector).await
    }

    /// Basic information
    pub async fn get_basic_info(
        &self,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        self.get_resource(Resource::BasicInfo, selector).await
    }

    /// Employment information
    pub async fn get_employment_info(
        &self,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        self.get_resource(Resource::EmploymentInfo, selector).await
    }

    /// Investment profile
    pub async fn get_investment_profile(
        &self,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        self.get_resource(Resource::InvestmentProfile, selector).await
    }

    /// First entry of the position history
    pub async fn get_position_data(
        &self,
        selector: impl Into<FieldSelector>,
    ) -> Result<Value, AppError> {
        self.get_resource(Resource::Positions, selector).await
    }

    /// Account number of the first account, as orders need it
    pub async fn get_account_number(&self) -> Result<String, AppError> {
        match self.get_account_data("account_number").await? {
            Value::String(number) if !number.is_empty() => Ok(number),
            other => Err(AppError::Deserialization(format!(
                "account_number is not a string: {other}"
            ))),
        }
    }

    /// Every entry of the position history
    ///
    /// With `active_only`, entries whose quantity is zero are dropped.
    pub async fn get_position_history(&self, active_only: bool) -> Result<Vec<Value>, AppError> {
        let body = self.fetch(Resource::Positions).await?;
        let results = match body {
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(results)) => results,
                _ => {
                    return Err(AppError::Deserialization(
                        "positions response has no results sequence".to_string(),
                    ));
                }
            },
            other => {
                return Err(AppError::Deserialization(format!(
                    "positions response is not a JSON object: {other}"
                )));
            }
        };

        debug!("Position history obtained: {} entries", results.len());
        if active_only {
            Ok(filter_active_positions(&results))
        } else {
            Ok(results)
        }
    }

    // ------------------------------------------------------------------------
    // Instruments
    // ------------------------------------------------------------------------

    /// Instrument id of a ticker symbol
    ///
    /// Does not need a session.
    pub async fn get_instrument_id(&self, symbol: &str) -> Result<String, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let url = self.endpoints.url(Endpoint::Instruments);
        let id = resolve_instrument_id(self.transport.as_ref(), &url, &symbol).await?;
        id.ok_or(AppError::InstrumentNotFound(symbol))
    }

    /// Resolves many symbols with a bounded number of requests in flight
    ///
    /// At most `config.instrument_lookup_concurrency` lookups run at once.
    /// Unknown symbols map to `None`; any other failure aborts the batch.
    /// The result keeps the order of `symbols`.
    pub async fn lookup_instrument_ids(
        &self,
        symbols: &[String],
    ) -> Result<Vec<(String, Option<String>)>, AppError> {
        let normalized = symbols
            .iter()
            .map(|s| normalize_symbol(s))
            .collect::<Result<Vec<_>, _>>()?;

        let semaphore = Arc::new(Semaphore::new(
            self.config.instrument_lookup_concurrency.max(1),
        ));
        let url = self.endpoints.url(Endpoint::Instruments);
        let mut tasks = JoinSet::new();

        for (index, symbol) in normalized.iter().cloned().enumerate() {
            let transport = Arc::clone(&self.transport);
            let semaphore = Arc::clone(&semaphore);
            let url = url.clone();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                let id = resolve_instrument_id(transport.as_ref(), &url, &symbol).await?;
                Ok::<_, AppError>((index, id))
            });
        }

        let mut ids: Vec<Option<String>> = vec![None; normalized.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, id) = joined.map_err(|e| AppError::Internal(e.to_string()))??;
            ids[index] = id;
        }

        debug!("Resolved {} symbols", normalized.len());
        Ok(normalized.into_iter().zip(ids).collect())
    }

    /// Every listed instrument, following `next` links until there are none
    ///
    /// Does not need a session.
    pub async fn get_all_instruments(&self) -> Result<Vec<Value>, AppError> {
        let mut instruments = Vec::new();
        let mut next = Some(self.endpoints.url(Endpoint::Instruments));
        let mut pages = 0usize;

        while let Some(url) = next {
            let body = self.transport.send(ApiRequest::get(url)).await?;
            let page: InstrumentPage = serde_json::from_value(body)?;
            pages += 1;
            instruments.extend(page.results);
            next = page.next;
        }

        debug!(
            "Instrument listing obtained: {} instruments over {} pages",
            instruments.len(),
            pages
        );
        Ok(instruments)
    }

    // ------------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------------

    /// Places a buy order
    pub async fn buy_order(&self, order: &OrderRequest) -> Result<OrderOutcome, AppError> {
        self.submit_order(order, Side::Buy).await
    }

    /// Places a sell order
    pub async fn sell_order(&self, order: &OrderRequest) -> Result<OrderOutcome, AppError> {
        self.submit_order(order, Side::Sell).await
    }

    /// Resolves the instrument and account, then submits the order
    ///
    /// A refused order is `Ok(OrderOutcome::Rejected)`, not an error.
    pub async fn submit_order(
        &self,
        order: &OrderRequest,
        side: Side,
    ) -> Result<OrderOutcome, AppError> {
        let token = match self.require_token() {
            Ok(token) => token,
            Err(e) => {
                self.sink.error(&format!(
                    "Cannot issue {side} order without being logged in"
                ));
                return Err(e);
            }
        };
        order.validate()?;

        let instrument_id = self.get_instrument_id(&order.symbol).await?;
        let account_number = self.get_account_number().await?;

        let form = order.to_form(
            &self.endpoints.account_url(&account_number),
            &self.endpoints.instrument_url(&instrument_id),
            side,
        );
        let request = ApiRequest::post(self.endpoints.url(Endpoint::Orders))
            .with_token(&token)
            .with_form(form);
        let outcome = OrderOutcome::from_response(self.transport.send(request).await?);

        match &outcome {
            OrderOutcome::Placed(_) => self.sink.info(&format!(
                "{} order placed: {} x {}",
                side, order.quantity, order.symbol
            )),
            OrderOutcome::Rejected { detail, .. } => self.sink.error(&format!(
                "{} order failed: {}",
                side,
                detail.as_deref().unwrap_or("no detail")
            )),
        }
        Ok(outcome)
    }
}

/// Mapping a field lookup runs against
///
/// Accounts and positions answer with `{"results": [...]}` and the first entry
/// is used; the other resources answer with the mapping itself.
pub fn effective_mapping(resource: Resource, body: Value) -> Result<Map<String, Value>, AppError> {
    let body = if resource.unwraps_results() {
        first_result(resource, body)?
    } else {
        body
    };

    match body {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Deserialization(format!(
            "{resource} response is not a JSON object: {other}"
        ))),
    }
}

fn first_result(resource: Resource, body: Value) -> Result<Value, AppError> {
    match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => results
                .into_iter()
                .next()
                .ok_or_else(|| AppError::EmptyResults(resource.name().to_string())),
            _ => Err(AppError::EmptyResults(resource.name().to_string())),
        },
        other => Err(AppError::Deserialization(format!(
            "{resource} response is not a JSON object: {other}"
        ))),
    }
}

/// Applies a selector to a mapping; values are returned exactly as decoded
pub fn select_field(
    resource: Resource,
    mut mapping: Map<String, Value>,
    selector: &FieldSelector,
) -> Result<Value, AppError> {
    match selector {
        FieldSelector::All => Ok(Value::Object(mapping)),
        FieldSelector::Named(field) => {
            mapping
                .remove(field)
                .ok_or_else(|| AppError::UnknownField {
                    resource: resource.name().to_string(),
                    field: field.clone(),
                })
        }
    }
}

async fn resolve_instrument_id<T: HttpTransport + ?Sized>(
    transport: &T,
    url: &str,
    symbol: &str,
) -> Result<Option<String>, AppError> {
    let body = transport
        .send(ApiRequest::get(url).with_query("symbol", symbol))
        .await?;
    let id = body
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(|first| first.get("id"))
        .and_then(Value::as_str)
        .map(String::from);
    debug!("Instrument id for {}: {:?}", symbol, id);
    Ok(id)
}

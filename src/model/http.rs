/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! HTTP transport used by the client.
//!
//! Every call is a single request whose body is decoded as JSON regardless of
//! the status code: the API reports login failures and order rejections in
//! the body, and the client inspects the body to tell them apart.

use crate::application::config::Config;
use crate::application::rate_limiter::RateLimiter;
use crate::constants::{TOKEN_SCHEME, USER_AGENT};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// One outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Token sent as `Authorization: Token <token>`
    pub token: Option<String>,
    /// Query-string pairs
    pub query: Vec<(String, String)>,
    /// Form-encoded body pairs
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            token: None,
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    /// Attaches the session token
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Adds a query-string pair
    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Sets the form body
    #[must_use]
    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }

    /// Value of a form field, if present
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends requests and decodes JSON bodies
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns the decoded body
    async fn send(&self, request: ApiRequest) -> Result<Value, AppError>;
}

/// Transport backed by `reqwest`, paced by a [`RateLimiter`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    rate_limiter: RateLimiter,
}

impl ReqwestTransport {
    /// Creates the transport from the REST and rate limiter settings
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(&config.rate_limiter),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, AppError> {
        self.rate_limiter.wait().await;

        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json");

        if let Some(token) = &request.token {
            builder = builder.header(AUTHORIZATION, format!("{TOKEN_SCHEME} {token}"));
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if request.method == Method::POST {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

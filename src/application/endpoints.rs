/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Endpoint table of the Robinhood REST API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every address the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// Token login
    Login,
    /// Token logout
    Logout,
    /// Password-reset request
    PasswordReset,
    /// Brokerage accounts
    Accounts,
    /// User record
    UserInfo,
    /// User basic information
    BasicInfo,
    /// User employment information
    EmploymentInfo,
    /// User investment profile
    InvestmentProfile,
    /// Position history
    Positions,
    /// Instrument listing and lookup
    Instruments,
    /// Order submission
    Orders,
}

impl Endpoint {
    /// Path relative to the base URL, always with a trailing slash
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Login => "api-token-auth/",
            Endpoint::Logout => "api-token-logout/",
            Endpoint::PasswordReset => "password_reset/request/",
            Endpoint::Accounts => "accounts/",
            Endpoint::UserInfo => "user/",
            Endpoint::BasicInfo => "user/basic_info/",
            Endpoint::EmploymentInfo => "user/employment/",
            Endpoint::InvestmentProfile => "user/investment_profile/",
            Endpoint::Positions => "positions/",
            Endpoint::Instruments => "instruments/",
            Endpoint::Orders => "orders/",
        }
    }
}

/// Read-only resources served through the generic field accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// `accounts`
    Accounts,
    /// `user-info`
    UserInfo,
    /// `basic-info`
    BasicInfo,
    /// `employment-info`
    EmploymentInfo,
    /// `investment-profile`
    InvestmentProfile,
    /// `positions`
    Positions,
}

impl Resource {
    /// Every resource, in endpoint-table order
    pub const ALL: [Resource; 6] = [
        Resource::Accounts,
        Resource::UserInfo,
        Resource::BasicInfo,
        Resource::EmploymentInfo,
        Resource::InvestmentProfile,
        Resource::Positions,
    ];

    /// Endpoint serving this resource
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Resource::Accounts => Endpoint::Accounts,
            Resource::UserInfo => Endpoint::UserInfo,
            Resource::BasicInfo => Endpoint::BasicInfo,
            Resource::EmploymentInfo => Endpoint::EmploymentInfo,
            Resource::InvestmentProfile => Endpoint::InvestmentProfile,
            Resource::Positions => Endpoint::Positions,
        }
    }

    /// Whether the payload comes wrapped in a `results` sequence whose first
    /// element is the effective mapping
    #[must_use]
    pub fn unwraps_results(&self) -> bool {
        matches!(self, Resource::Accounts | Resource::Positions)
    }

    /// Logical name used in messages and errors
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Accounts => "accounts",
            Resource::UserInfo => "user-info",
            Resource::BasicInfo => "basic-info",
            Resource::EmploymentInfo => "employment-info",
            Resource::InvestmentProfile => "investment-profile",
            Resource::Positions => "positions",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Absolute addresses built once from a base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Creates the table for `base_url` (a trailing slash is ignored)
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute address of an endpoint
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Address of a single account, as orders reference it
    pub fn account_url(&self, account_number: &str) -> String {
        format!("{}{}/", self.url(Endpoint::Accounts), account_number)
    }

    /// Address of a single instrument, as orders reference it
    pub fn instrument_url(&self, instrument_id: &str) -> String {
        format!("{}{}/", self.url(Endpoint::Instruments), instrument_id)
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Field selectors and the known fields of each resource.
//!
//! String selectors reach whatever the server returns; the per-resource enums
//! name the fields the client knows about together with the JSON kind their
//! values are expected to have.

use crate::application::endpoints::Resource;
use crate::constants::ALL_FIELDS;
use serde_json::Value;
use std::fmt;

/// Which part of a resource mapping to return
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    /// The whole mapping
    All,
    /// A single top-level field
    Named(String),
}

impl From<&str> for FieldSelector {
    fn from(value: &str) -> Self {
        if value == ALL_FIELDS {
            FieldSelector::All
        } else {
            FieldSelector::Named(value.to_string())
        }
    }
}

impl From<String> for FieldSelector {
    fn from(value: String) -> Self {
        FieldSelector::from(value.as_str())
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSelector::All => f.write_str(ALL_FIELDS),
            FieldSelector::Named(name) => f.write_str(name),
        }
    }
}

/// JSON kind a known field is expected to hold
///
/// Robinhood encodes money and quantities as decimal strings and references
/// other records by URL, so several kinds share the JSON string type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Decimal number encoded as a string
    Decimal,
    /// Integer number
    Integer,
    /// Boolean
    Flag,
    /// URL of another record
    Link,
    /// ISO-8601 timestamp or date string
    Timestamp,
    /// Nested mapping
    Object,
}

impl FieldKind {
    /// Whether `value` fits this kind. `null` fits every kind.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldKind::Text | FieldKind::Link | FieldKind::Timestamp, Value::String(_)) => true,
            (FieldKind::Decimal, Value::String(s)) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            (FieldKind::Decimal, Value::Number(_)) => true,
            (FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldKind::Flag, Value::Bool(_)) => true,
            (FieldKind::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Decimal => "decimal",
            FieldKind::Integer => "integer",
            FieldKind::Flag => "flag",
            FieldKind::Link => "link",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A known field of one resource
pub trait ResourceField: Copy + fmt::Debug + Send + Sync + Into<FieldSelector> + 'static {
    /// Resource the field belongs to
    const RESOURCE: Resource;

    /// Key in the JSON mapping
    fn key(&self) -> &'static str;

    /// Expected value kind
    fn kind(&self) -> FieldKind;
}

macro_rules! resource_fields {
    (
        $(#[$meta:meta])*
        $name:ident => $resource:expr,
        { $($variant:ident => ($key:literal, $kind:ident)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every known field
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl ResourceField for $name {
            const RESOURCE: Resource = $resource;

            fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            fn kind(&self) -> FieldKind {
                match self {
                    $($name::$variant => FieldKind::$kind),+
                }
            }
        }

        impl From<$name> for FieldSelector {
            fn from(field: $name) -> Self {
                FieldSelector::Named(field.key().to_string())
            }
        }
    };
}

resource_fields! {
    /// Fields of the `accounts` resource
    AccountField => Resource::Accounts,
    {
        AccountNumber => ("account_number", Text),
        BuyingPower => ("buying_power", Decimal),
        Cash => ("cash", Decimal),
        CashAvailableForWithdrawal => ("cash_available_for_withdrawal", Decimal),
        CashBalances => ("cash_balances", Object),
        CreatedAt => ("created_at", Timestamp),
        Deactivated => ("deactivated", Flag),
        DepositHalted => ("deposit_halted", Flag),
        MarginBalances => ("margin_balances", Object),
        OnlyPositionClosingTrades => ("only_position_closing_trades", Flag),
        Portfolio => ("portfolio", Link),
        Positions => ("positions", Link),
        Sma => ("sma", Decimal),
        SmaHeldForOrders => ("sma_held_for_orders", Decimal),
        SweepEnabled => ("sweep_enabled", Flag),
        AccountType => ("type", Text),
        UnclearedDeposits => ("uncleared_deposits", Decimal),
        UnsettledFunds => ("unsettled_funds", Decimal),
        UpdatedAt => ("updated_at", Timestamp),
        Url => ("url", Link),
        User => ("user", Link),
        WithdrawalHalted => ("withdrawal_halted", Flag),
    }
}

resource_fields! {
    /// Fields of the `user-info` resource
    UserField => Resource::UserInfo,
    {
        AdditionalInfo => ("additional_info", Link),
        BasicInfo => ("basic_info", Link),
        CreatedAt => ("created_at", Timestamp),
        Email => ("email", Text),
        Employment => ("employment", Link),
        FirstName => ("first_name", Text),
        Id => ("id", Text),
        IdInfo => ("id_info", Link),
        InternationalInfo => ("international_info", Link),
        InvestmentProfile => ("investment_profile", Link),
        LastName => ("last_name", Text),
        Url => ("url", Link),
        Username => ("username", Text),
    }
}

resource_fields! {
    /// Fields of the `basic-info` resource
    BasicInfoField => Resource::BasicInfo,
    {
        Address => ("address", Text),
        Citizenship => ("citizenship", Text),
        City => ("city", Text),
        CountryOfResidence => ("country_of_residence", Text),
        DateOfBirth => ("date_of_birth", Timestamp),
        MaritalStatus => ("marital_status", Text),
        NumberDependents => ("number_dependents", Integer),
        PhoneNumber => ("phone_number", Text),
        State => ("state", Text),
        TaxIdSsn => ("tax_id_ssn", Text),
        UpdatedAt => ("updated_at", Timestamp),
        User => ("user", Link),
        Zipcode => ("zipcode", Text),
    }
}

resource_fields! {
    /// Fields of the `employment-info` resource
    EmploymentField => Resource::EmploymentInfo,
    {
        EmployerAddress => ("employer_address", Text),
        EmployerCity => ("employer_city", Text),
        EmployerName => ("employer_name", Text),
        EmployerState => ("employer_state", Text),
        EmployerZipcode => ("employer_zipcode", Text),
        EmploymentStatus => ("employment_status", Text),
        Occupation => ("occupation", Text),
        UpdatedAt => ("updated_at", Timestamp),
        User => ("user", Link),
        YearsEmployed => ("years_employed", Integer),
    }
}

resource_fields! {
    /// Fields of the `investment-profile` resource
    InvestmentProfileField => Resource::InvestmentProfile,
    {
        AnnualIncome => ("annual_income", Text),
        InvestmentExperience => ("investment_experience", Text),
        InvestmentExperienceCollected => ("investment_experience_collected", Flag),
        InvestmentObjective => ("investment_objective", Text),
        LiquidNetWorth => ("liquid_net_worth", Text),
        LiquidityNeeds => ("liquidity_needs", Text),
        RiskTolerance => ("risk_tolerance", Text),
        SourceOfFunds => ("source_of_funds", Text),
        SuitabilityVerified => ("suitability_verified", Flag),
        TaxBracket => ("tax_bracket", Text),
        TimeHorizon => ("time_horizon", Text),
        TotalNetWorth => ("total_net_worth", Text),
        UnderstandOptionSpreads => ("understand_option_spreads", Flag),
        UpdatedAt => ("updated_at", Timestamp),
        User => ("user", Link),
    }
}

resource_fields! {
    /// Fields of a `positions` entry
    PositionField => Resource::Positions,
    {
        Account => ("account", Link),
        AverageBuyPrice => ("average_buy_price", Decimal),
        CreatedAt => ("created_at", Timestamp),
        Instrument => ("instrument", Link),
        IntradayAverageBuyPrice => ("intraday_average_buy_price", Decimal),
        IntradayQuantity => ("intraday_quantity", Decimal),
        Quantity => ("quantity", Decimal),
        SharesHeldForBuys => ("shares_held_for_buys", Decimal),
        SharesHeldForSells => ("shares_held_for_sells", Decimal),
        UpdatedAt => ("updated_at", Timestamp),
        Url => ("url", Link),
    }
}

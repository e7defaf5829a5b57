//! Currencies and currency pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// ISO 4217 currency codes.
///
/// Covers the G10 set plus the emerging-market currencies that carry
/// forward or non-deliverable forward markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// New Zealand Dollar
    NZD,
    /// Swedish Krona
    SEK,
    /// Norwegian Krone
    NOK,
    /// Danish Krone
    DKK,
    /// Hong Kong Dollar
    HKD,
    /// Singapore Dollar
    SGD,
    /// Offshore Chinese Yuan
    CNH,
    /// Indian Rupee
    INR,
    /// South Korean Won
    KRW,
    /// New Taiwan Dollar
    TWD,
    /// Thai Baht
    THB,
    /// Philippine Peso
    PHP,
    /// Indonesian Rupiah
    IDR,
    /// Malaysian Ringgit
    MYR,
    /// Mexican Peso
    MXN,
    /// Brazilian Real
    BRL,
    /// Chilean Peso
    CLP,
    /// Colombian Peso
    COP,
    /// Peruvian Sol
    PEN,
    /// Argentine Peso
    ARS,
    /// South African Rand
    ZAR,
    /// Turkish Lira
    TRY,
    /// Russian Ruble
    RUB,
    /// Polish Zloty
    PLN,
    /// Hungarian Forint
    HUF,
    /// Czech Koruna
    CZK,
    /// Israeli New Shekel
    ILS,
    /// UAE Dirham
    AED,
    /// Saudi Riyal
    SAR,
}

impl Currency {
    /// Every supported currency, in declaration order.
    pub const ALL: [Currency; 36] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::CAD,
        Currency::AUD,
        Currency::NZD,
        Currency::SEK,
        Currency::NOK,
        Currency::DKK,
        Currency::HKD,
        Currency::SGD,
        Currency::CNH,
        Currency::INR,
        Currency::KRW,
        Currency::TWD,
        Currency::THB,
        Currency::PHP,
        Currency::IDR,
        Currency::MYR,
        Currency::MXN,
        Currency::BRL,
        Currency::CLP,
        Currency::COP,
        Currency::PEN,
        Currency::ARS,
        Currency::ZAR,
        Currency::TRY,
        Currency::RUB,
        Currency::PLN,
        Currency::HUF,
        Currency::CZK,
        Currency::ILS,
        Currency::AED,
        Currency::SAR,
    ];

    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
            Currency::DKK => "DKK",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::CNH => "CNH",
            Currency::INR => "INR",
            Currency::KRW => "KRW",
            Currency::TWD => "TWD",
            Currency::THB => "THB",
            Currency::PHP => "PHP",
            Currency::IDR => "IDR",
            Currency::MYR => "MYR",
            Currency::MXN => "MXN",
            Currency::BRL => "BRL",
            Currency::CLP => "CLP",
            Currency::COP => "COP",
            Currency::PEN => "PEN",
            Currency::ARS => "ARS",
            Currency::ZAR => "ZAR",
            Currency::TRY => "TRY",
            Currency::RUB => "RUB",
            Currency::PLN => "PLN",
            Currency::HUF => "HUF",
            Currency::CZK => "CZK",
            Currency::ILS => "ILS",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
        }
    }

    /// Returns true if this is a G10 currency.
    #[must_use]
    pub fn is_g10(&self) -> bool {
        matches!(
            self,
            Currency::USD
                | Currency::EUR
                | Currency::GBP
                | Currency::JPY
                | Currency::CHF
                | Currency::CAD
                | Currency::AUD
                | Currency::NZD
                | Currency::SEK
                | Currency::NOK
        )
    }

    /// Returns true if this is an emerging market currency.
    #[must_use]
    pub fn is_emerging(&self) -> bool {
        !self.is_g10() && !matches!(self, Currency::DKK | Currency::HKD | Currency::SGD)
    }

    /// Parses a currency from a string code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| CoreError::InvalidCurrency {
            code: s.to_string(),
        })
    }
}

/// Pip factor for pairs quoted in Japanese yen.
pub const JPY_PIP_FACTOR: f64 = 100.0;

/// Pip factor for every other pair.
pub const STANDARD_PIP_FACTOR: f64 = 10_000.0;

/// A currency pair in market quotation order (base/quote).
///
/// Serialized as the concatenated six-letter code, e.g. `"USDJPY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    /// Base currency (the one being priced).
    pub base: Currency,
    /// Quote currency (the pricing currency).
    pub quote: Currency,
}

impl CurrencyPair {
    /// Creates a new currency pair.
    #[must_use]
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Parses a six-letter pair code such as `"EURUSD"`.
    pub fn parse(code: &str) -> CoreResult<Self> {
        let code = code.trim();
        if code.len() != 6 || !code.is_ascii() {
            return Err(CoreError::invalid_pair(code, "expected six ASCII letters"));
        }
        let base = Currency::from_code(&code[..3])
            .ok_or_else(|| CoreError::invalid_pair(code, "unknown base currency"))?;
        let quote = Currency::from_code(&code[3..])
            .ok_or_else(|| CoreError::invalid_pair(code, "unknown quote currency"))?;
        if base == quote {
            return Err(CoreError::invalid_pair(code, "base and quote are identical"));
        }
        Ok(Self { base, quote })
    }

    /// Returns the six-letter pair code.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}{}", self.base.code(), self.quote.code())
    }

    /// Number of forward points per unit of the quote currency.
    ///
    /// Yen-quoted pairs carry two decimal places of points, everything else four.
    #[must_use]
    pub fn pip_factor(&self) -> f64 {
        if self.quote == Currency::JPY {
            JPY_PIP_FACTOR
        } else {
            STANDARD_PIP_FACTOR
        }
    }

    /// Returns true if neither leg is the US dollar.
    #[must_use]
    pub fn is_cross(&self) -> bool {
        self.base != Currency::USD && self.quote != Currency::USD
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.code()
    }
}

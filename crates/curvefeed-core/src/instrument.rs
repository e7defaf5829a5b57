//! Static instrument definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::CurveId;
use crate::tenor::{years_from_days, Tenor};

/// How an instrument is quoted in the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentClass {
    /// Deposits, fixings and other money-market rates.
    MoneyMarket,
    /// FX forwards (quoted in points) and overnight index swaps.
    #[serde(alias = "forward", alias = "ois")]
    ForwardOrOis,
    /// Government bills and bonds (quoted as yields).
    GovernmentBond,
    /// Par swap rates.
    Swap,
}

impl InstrumentClass {
    /// Short display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentClass::MoneyMarket => "Money Market",
            InstrumentClass::ForwardOrOis => "Forward/OIS",
            InstrumentClass::GovernmentBond => "Government Bond",
            InstrumentClass::Swap => "Swap",
        }
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single quotable instrument on an identifier's curve.
///
/// `ticker` is either a concrete ticker or a template carrying placeholders
/// such as `{pair}` and `{tenor}`; templates are rendered by the resolver.
/// Anchors carry `tenor_days == 0`; term instruments are strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentSpec {
    /// Owning curve identifier.
    pub identifier: CurveId,
    /// Tenor in calendar days.
    pub tenor_days: u32,
    /// Display label, e.g. `"3M"`.
    pub label: String,
    /// Quotation class.
    pub instrument_class: InstrumentClass,
    /// Concrete ticker or ticker template.
    pub ticker: String,
}

impl InstrumentSpec {
    /// Creates a term instrument from a tenor, labelled with the tenor's market label.
    pub fn term(
        identifier: impl Into<CurveId>,
        tenor: Tenor,
        instrument_class: InstrumentClass,
        ticker: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            tenor_days: tenor.to_days(),
            label: tenor.label(),
            instrument_class,
            ticker: ticker.into(),
        }
    }

    /// Creates the anchor (spot or overnight) instrument.
    pub fn anchor(
        identifier: impl Into<CurveId>,
        label: impl Into<String>,
        instrument_class: InstrumentClass,
        ticker: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            tenor_days: 0,
            label: label.into(),
            instrument_class,
            ticker: ticker.into(),
        }
    }

    /// Overrides the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// True for the spot/overnight anchor.
    #[must_use]
    pub fn is_anchor(&self) -> bool {
        self.tenor_days == 0
    }

    /// Tenor as a year fraction.
    #[must_use]
    pub fn tenor_years(&self) -> f64 {
        years_from_days(self.tenor_days)
    }

    /// True when the ticker still holds unrendered placeholders.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.ticker.contains('{')
    }
}

//! Instrument catalog.
//!
//! The catalog is the static per-identifier table the resolver works from:
//! the anchor ticker, the term instruments (explicit tickers or a ticker
//! template), and an optional alternate ticker convention for currencies
//! whose forwards trade as non-deliverable forwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use curvefeed_core::{Currency, CurrencyPair, CurveId, InstrumentClass, InstrumentSpec, Tenor};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::template::{TemplateContext, TickerTemplate};

// =============================================================================
// CURVE KIND
// =============================================================================

/// What an identifier's curve is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveKind {
    /// Outright FX forwards quoted as points over spot.
    FxForward {
        /// The currency pair.
        pair: CurrencyPair,
    },
    /// Rate instruments quoted directly as yields.
    Rates {
        /// Currency of the rates.
        currency: Currency,
    },
}

impl CurveKind {
    /// The currency pair, for FX curves.
    pub fn pair(&self) -> Option<CurrencyPair> {
        match self {
            CurveKind::FxForward { pair } => Some(*pair),
            CurveKind::Rates { .. } => None,
        }
    }

    /// True for FX forward curves.
    pub fn is_fx(&self) -> bool {
        matches!(self, CurveKind::FxForward { .. })
    }
}

/// Grouping used for listings and coverage reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCategory {
    /// G10 pairs against the dollar.
    G10,
    /// Emerging Asia.
    EmAsia,
    /// Emerging Latin America.
    EmLatam,
    /// Emerging Europe, Middle East and Africa.
    EmEmea,
    /// Non-dollar crosses.
    Crosses,
    /// Interest-rate curves.
    Rates,
}

impl PairCategory {
    /// All categories in display order.
    pub const ALL: [PairCategory; 6] = [
        PairCategory::G10,
        PairCategory::EmAsia,
        PairCategory::EmLatam,
        PairCategory::EmEmea,
        PairCategory::Crosses,
        PairCategory::Rates,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            PairCategory::G10 => "G10",
            PairCategory::EmAsia => "EM Asia",
            PairCategory::EmLatam => "EM LatAm",
            PairCategory::EmEmea => "EM EMEA",
            PairCategory::Crosses => "Crosses",
            PairCategory::Rates => "Rates",
        }
    }
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// ALTERNATE CONVENTION
// =============================================================================

/// Alternate ticker convention for an identifier (typically an NDF family).
///
/// When declared, it replaces the standard convention for every term tenor,
/// and tenors beyond `max_tenor` are never requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlternateConvention {
    /// Ticker template, e.g. `"IRN{tenor} Curncy"`.
    pub format: TickerTemplate,
    /// Longest tenor the convention is quoted for.
    pub max_tenor: Tenor,
    /// Free-text note.
    #[serde(default)]
    pub description: String,
}

impl AlternateConvention {
    /// Creates an alternate convention.
    pub fn new(format: impl Into<String>, max_tenor: Tenor) -> Self {
        Self {
            format: TickerTemplate::new(format),
            max_tenor,
            description: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// An empty format means the convention is not in force.
    pub fn is_declared(&self) -> bool {
        !self.format.is_empty()
    }

    /// Maximum covered tenor in days.
    pub fn max_tenor_days(&self) -> u32 {
        self.max_tenor.to_days()
    }

    /// True if a tenor of `days` falls inside declared coverage.
    pub fn covers(&self, days: u32) -> bool {
        days <= self.max_tenor_days()
    }
}

// =============================================================================
// CATALOG ENTRY
// =============================================================================

/// One explicitly-listed term instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogInstrument {
    /// Tenor.
    pub tenor: Tenor,
    /// Concrete ticker or template.
    pub ticker: String,
    /// Quotation class; defaults to the entry's class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<InstrumentClass>,
    /// Display label; defaults to the tenor label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CatalogInstrument {
    /// Creates an instrument with the given class.
    pub fn new(tenor: Tenor, class: InstrumentClass, ticker: impl Into<String>) -> Self {
        Self {
            tenor,
            ticker: ticker.into(),
            class: Some(class),
            label: None,
        }
    }
}

/// Catalog entry for one identifier.
///
/// Table-valued fields sit last so the entry serializes cleanly to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identifier, e.g. `"USDJPY"` or `"USD_SOFR"`.
    pub identifier: CurveId,

    /// Description.
    #[serde(default)]
    pub description: String,

    /// Listing category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PairCategory>,

    /// Spot/overnight anchor ticker (may use `{pair}`).
    pub anchor_ticker: String,

    /// Anchor display label.
    #[serde(default = "default_anchor_label")]
    pub anchor_label: String,

    /// Template for tenors without an explicit instrument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_template: Option<TickerTemplate>,

    /// Ladder used when the caller does not pass one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ladder: Option<Vec<Tenor>>,

    /// Curve kind.
    pub kind: CurveKind,

    /// Alternate (NDF) convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<AlternateConvention>,

    /// Explicit term instruments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instruments: Vec<CatalogInstrument>,
}

fn default_anchor_label() -> String {
    "Spot".to_string()
}

impl CatalogEntry {
    /// Standard FX forward entry: `"{pair} Curncy"` spot, `"{pair}{tenor} Curncy"` forwards.
    pub fn fx(pair: CurrencyPair) -> Self {
        Self {
            identifier: CurveId::new(pair.code()),
            description: format!("{}/{} outright forwards", pair.base, pair.quote),
            kind: CurveKind::FxForward { pair },
            category: None,
            anchor_ticker: "{pair} Curncy".to_string(),
            anchor_label: default_anchor_label(),
            instruments: Vec::new(),
            standard_template: Some(TickerTemplate::standard_forward()),
            alternate: None,
            default_ladder: None,
        }
    }

    /// Rates entry with an overnight anchor and no instruments yet.
    pub fn rates(
        identifier: impl Into<CurveId>,
        currency: Currency,
        anchor_ticker: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            description: String::new(),
            kind: CurveKind::Rates { currency },
            category: Some(PairCategory::Rates),
            anchor_ticker: anchor_ticker.into(),
            anchor_label: "ON".to_string(),
            instruments: Vec::new(),
            standard_template: None,
            alternate: None,
            default_ladder: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: PairCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Declares an alternate convention.
    pub fn with_alternate(mut self, alternate: AlternateConvention) -> Self {
        self.alternate = Some(alternate);
        self
    }

    /// Adds an explicit term instrument.
    pub fn with_instrument(
        mut self,
        tenor: Tenor,
        class: InstrumentClass,
        ticker: impl Into<String>,
    ) -> Self {
        self.instruments
            .push(CatalogInstrument::new(tenor, class, ticker));
        self
    }

    /// Sets the default ladder.
    pub fn with_default_ladder(mut self, ladder: Vec<Tenor>) -> Self {
        self.default_ladder = Some(ladder);
        self
    }

    /// Removes every source of term tickers, leaving the anchor only.
    pub fn spot_only(mut self) -> Self {
        self.instruments.clear();
        self.standard_template = None;
        self.alternate = None;
        self
    }

    /// The currency pair, for FX entries.
    pub fn pair(&self) -> Option<CurrencyPair> {
        self.kind.pair()
    }

    /// Class used when an instrument does not name one.
    pub fn default_class(&self) -> InstrumentClass {
        InstrumentClass::ForwardOrOis
    }

    /// Class of the anchor instrument.
    pub fn anchor_class(&self) -> InstrumentClass {
        match self.kind {
            CurveKind::FxForward { .. } => InstrumentClass::ForwardOrOis,
            CurveKind::Rates { .. } => InstrumentClass::MoneyMarket,
        }
    }

    /// The alternate convention, if declared with a non-empty format.
    pub fn active_alternate(&self) -> Option<&AlternateConvention> {
        self.alternate.as_ref().filter(|alt| alt.is_declared())
    }

    /// True if the identifier has any way to produce term tickers.
    pub fn has_term_market(&self) -> bool {
        !self.instruments.is_empty()
            || self.standard_template.is_some()
            || self.active_alternate().is_some()
    }

    /// Template context for a tenor.
    pub fn template_context(&self, tenor: Option<Tenor>) -> TemplateContext {
        TemplateContext {
            pair: self.pair(),
            tenor,
        }
    }

    /// The anchor instrument with its ticker rendered.
    pub fn anchor_spec(&self) -> ConfigResult<InstrumentSpec> {
        let ticker = TickerTemplate::new(self.anchor_ticker.as_str())
            .render(&self.template_context(None))?;
        Ok(InstrumentSpec::anchor(
            self.identifier.clone(),
            self.anchor_label.clone(),
            self.anchor_class(),
            ticker,
        ))
    }

    /// Explicit instrument at a tenor (by day count), unrendered.
    pub fn instrument_at(&self, days: u32) -> Option<InstrumentSpec> {
        self.instruments
            .iter()
            .find(|i| i.tenor.to_days() == days)
            .map(|i| self.to_spec(i))
    }

    /// All explicit term instruments, unrendered, in catalog order.
    pub fn instrument_specs(&self) -> Vec<InstrumentSpec> {
        self.instruments.iter().map(|i| self.to_spec(i)).collect()
    }

    fn to_spec(&self, instrument: &CatalogInstrument) -> InstrumentSpec {
        let spec = InstrumentSpec::term(
            self.identifier.clone(),
            instrument.tenor,
            instrument.class.unwrap_or_else(|| self.default_class()),
            instrument.ticker.clone(),
        );
        match &instrument.label {
            Some(label) => spec.with_label(label.clone()),
            None => spec,
        }
    }

    /// The ladder used when none is supplied.
    ///
    /// Falls back to the explicit instruments, then to the standard forward
    /// ladder when only a template is available.
    pub fn ladder(&self) -> Vec<Tenor> {
        if let Some(ladder) = &self.default_ladder {
            return ladder.clone();
        }
        if !self.instruments.is_empty() {
            return self.instruments.iter().map(|i| i.tenor).collect();
        }
        if self.has_term_market() {
            return Tenor::standard_forward_ladder();
        }
        Vec::new()
    }
}

fn check_ladder(field: &str, tenors: &[Tenor], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for tenor in tenors {
        let days = tenor.to_days();
        if days == 0 {
            errors.push(ValidationError::with_rule(
                field,
                format!("term tenor {} has zero days", tenor),
                "positive_tenor",
            ));
        } else if !seen.insert(days) {
            errors.push(ValidationError::with_rule(
                field,
                format!("duplicate tenor {} ({} days)", tenor, days),
                "unique_tenor",
            ));
        }
    }
}

fn check_template(field: &str, template: &TickerTemplate, errors: &mut Vec<ValidationError>) {
    if let Err(e) = template.check() {
        errors.push(ValidationError::with_rule(field, e.to_string(), "template"));
    }
}

impl Validate for CatalogEntry {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.identifier.as_str().trim().is_empty() {
            errors.push(ValidationError::new("identifier", "identifier cannot be empty"));
        }
        if self.anchor_ticker.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                "anchor_ticker",
                "anchor ticker cannot be empty",
                "required",
            ));
        } else {
            let anchor = TickerTemplate::new(self.anchor_ticker.as_str());
            check_template("anchor_ticker", &anchor, &mut errors);
        }

        let tenors: Vec<Tenor> = self.instruments.iter().map(|i| i.tenor).collect();
        check_ladder("instruments", &tenors, &mut errors);
        for (idx, instrument) in self.instruments.iter().enumerate() {
            let field = format!("instruments[{}].ticker", idx);
            if instrument.ticker.trim().is_empty() {
                errors.push(ValidationError::with_rule(
                    field,
                    "ticker cannot be empty",
                    "required",
                ));
            } else {
                let template = TickerTemplate::new(instrument.ticker.as_str());
                check_template(&field, &template, &mut errors);
            }
        }

        if let Some(template) = &self.standard_template {
            check_template("standard_template", template, &mut errors);
        }

        if let Some(alt) = self.active_alternate() {
            if !self.kind.is_fx() {
                errors.push(ValidationError::with_rule(
                    "alternate",
                    "alternate conventions apply to FX identifiers only",
                    "fx_only",
                ));
            }
            check_template("alternate.format", &alt.format, &mut errors);
            if alt.max_tenor_days() == 0 {
                errors.push(ValidationError::with_rule(
                    "alternate.max_tenor",
                    "maximum coverage tenor must be positive",
                    "positive_tenor",
                ));
            }
        }

        if let Some(ladder) = &self.default_ladder {
            check_ladder("default_ladder", ladder, &mut errors);
        }

        errors
    }
}

// =============================================================================
// INSTRUMENT CATALOG
// =============================================================================

/// On-disk catalog layout: a list of `[[curves]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    curves: Vec<CatalogEntry>,
}

/// Immutable table of catalog entries keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentCatalog {
    entries: BTreeMap<CurveId, CatalogEntry>,
}

impl InstrumentCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from entries, validating each and rejecting duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> ConfigResult<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            if catalog.entries.contains_key(&entry.identifier) {
                return Err(ConfigError::Validation {
                    field: "identifier".to_string(),
                    message: format!("duplicate identifier {}", entry.identifier),
                });
            }
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Inserts or replaces an entry after validating it.
    pub fn insert(&mut self, entry: CatalogEntry) -> ConfigResult<()> {
        entry.validate_or_error().map_err(|e| match e {
            ConfigError::Validation { field, message } => ConfigError::Validation {
                field: format!("curves[{}].{}", entry.identifier, field),
                message,
            },
            other => other,
        })?;
        self.entries.insert(entry.identifier.clone(), entry);
        Ok(())
    }

    /// Overlays `other` onto this catalog; entries in `other` win.
    pub fn merge(&mut self, other: InstrumentCatalog) {
        self.entries.extend(other.entries);
    }

    /// Looks up an entry.
    pub fn get(&self, id: &CurveId) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Looks up an entry, failing with `NotFound`.
    pub fn require(&self, id: &CurveId) -> ConfigResult<&CatalogEntry> {
        self.get(id).ok_or_else(|| ConfigError::NotFound {
            key: id.to_string(),
        })
    }

    /// True if the identifier is known.
    pub fn contains(&self, id: &CurveId) -> bool {
        self.entries.contains_key(id)
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &CurveId> {
        self.entries.keys()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Entries in a category.
    pub fn by_category(&self, category: PairCategory) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .values()
            .filter(move |e| e.category == Some(category))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a TOML catalog (`[[curves]]` tables).
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_entries(file.curves)
    }

    /// Parses a JSON catalog (`{"curves": [...]}`).
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_entries(file.curves)
    }

    /// Loads a catalog file; `.json` is read as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        let file = CatalogFile {
            curves: self.entries.values().cloned().collect(),
        };
        toml::to_string_pretty(&file).map_err(|e| ConfigError::Serialization(e.to_string()))
    }
}

impl Validate for InstrumentCatalog {
    fn validate(&self) -> Vec<ValidationError> {
        self.entries
            .values()
            .flat_map(|entry| {
                entry.validate().into_iter().map(move |mut err| {
                    err.field = format!("curves[{}].{}", entry.identifier, err.field);
                    err
                })
            })
            .collect()
    }
}

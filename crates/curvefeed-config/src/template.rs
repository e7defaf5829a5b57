//! Ticker templates.
//!
//! A template is a ticker with placeholders, e.g. `"{pair}{tenor} Curncy"` or
//! `"IRN{tenor} Curncy"`. Supported placeholders:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{pair}`    | six-letter pair code (`USDINR`) |
//! | `{base}`    | base currency code |
//! | `{quote}`   | quote currency code |
//! | `{tenor}`   | market tenor label (`1M`, `18M`) |

use serde::{Deserialize, Serialize};
use std::fmt;

use curvefeed_core::{CurrencyPair, Tenor};

use crate::error::{ConfigError, ConfigResult};

/// Values substituted into a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateContext {
    /// Currency pair, for FX identifiers.
    pub pair: Option<CurrencyPair>,
    /// Tenor being resolved.
    pub tenor: Option<Tenor>,
}

impl TemplateContext {
    /// Context for an FX pair at a tenor.
    pub fn fx(pair: CurrencyPair, tenor: Tenor) -> Self {
        Self {
            pair: Some(pair),
            tenor: Some(tenor),
        }
    }

    /// Context with only a tenor.
    pub fn tenor(tenor: Tenor) -> Self {
        Self {
            pair: None,
            tenor: Some(tenor),
        }
    }
}

/// A ticker string with `{placeholder}` substitutions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerTemplate(String);

impl TickerTemplate {
    /// Standard outright forward ticker: pair code followed by tenor.
    pub const STANDARD_FORWARD: &'static str = "{pair}{tenor} Curncy";

    /// Creates a template.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The standard FX forward template.
    pub fn standard_forward() -> Self {
        Self::new(Self::STANDARD_FORWARD)
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the template text is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> ConfigResult<Vec<String>> {
        let mut names = Vec::new();
        let mut rest = self.0.as_str();
        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(self.error("unbalanced '}'"));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| self.error("unterminated '{'"))?;
            let name = &after[..close];
            if name.contains('{') {
                return Err(self.error("nested '{'"));
            }
            names.push(name.to_string());
            rest = &after[close + 1..];
        }
        Ok(names)
    }

    /// Checks that every placeholder is known and braces balance.
    pub fn check(&self) -> ConfigResult<()> {
        for name in self.placeholders()? {
            if !matches!(name.as_str(), "pair" | "base" | "quote" | "tenor") {
                return Err(self.error(format!("unknown placeholder '{{{}}}'", name)));
            }
        }
        Ok(())
    }

    /// Renders the template against a context.
    pub fn render(&self, ctx: &TemplateContext) -> ConfigResult<String> {
        let mut out = String::with_capacity(self.0.len() + 8);
        let mut rest = self.0.as_str();
        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(self.error("unbalanced '}'"));
            }
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| self.error("unterminated '{'"))?;
            out.push_str(&self.substitute(&after[..close], ctx)?);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn substitute(&self, name: &str, ctx: &TemplateContext) -> ConfigResult<String> {
        let missing = |what: &str| self.error(format!("'{{{}}}' needs a {}", name, what));
        match name {
            "pair" => ctx.pair.map(|p| p.code()).ok_or_else(|| missing("currency pair")),
            "base" => ctx
                .pair
                .map(|p| p.base.code().to_string())
                .ok_or_else(|| missing("currency pair")),
            "quote" => ctx
                .pair
                .map(|p| p.quote.code().to_string())
                .ok_or_else(|| missing("currency pair")),
            "tenor" => ctx.tenor.map(|t| t.label()).ok_or_else(|| missing("tenor")),
            other => Err(self.error(format!("unknown placeholder '{{{}}}'", other))),
        }
    }

    fn error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Template {
            template: self.0.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TickerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TickerTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdinr() -> CurrencyPair {
        CurrencyPair::parse("USDINR").unwrap()
    }

    #[test]
    fn test_render_standard() {
        let t = TickerTemplate::standard_forward();
        let ctx = TemplateContext::fx(CurrencyPair::parse("EURUSD").unwrap(), Tenor::Months(3));
        assert_eq!(t.render(&ctx).unwrap(), "EURUSD3M Curncy");
    }

    #[test]
    fn test_render_alternate() {
        let t = TickerTemplate::new("IRN{tenor} Curncy");
        let ctx = TemplateContext::fx(usdinr(), Tenor::Months(1));
        assert_eq!(t.render(&ctx).unwrap(), "IRN1M Curncy");
    }

    #[test]
    fn test_render_base_quote() {
        let t = TickerTemplate::new("{quote}{base}{tenor} Curncy");
        let ctx = TemplateContext::fx(usdinr(), Tenor::Years(1));
        assert_eq!(t.render(&ctx).unwrap(), "INRUSD1Y Curncy");
    }

    #[test]
    fn test_plain_ticker_renders_unchanged() {
        let t = TickerTemplate::new("USOSFR1 Curncy");
        assert_eq!(t.render(&TemplateContext::default()).unwrap(), "USOSFR1 Curncy");
        assert!(t.placeholders().unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        let ctx = TemplateContext::fx(usdinr(), Tenor::Months(1));
        assert!(TickerTemplate::new("{pair}{tenr} Curncy").render(&ctx).is_err());
        assert!(TickerTemplate::new("{pair{tenor} Curncy").check().is_err());
        assert!(TickerTemplate::new("{pair Curncy").render(&ctx).is_err());
        assert!(TickerTemplate::new("pair} Curncy").render(&ctx).is_err());
        assert!(TickerTemplate::new("{pair}{tenor} Curncy")
            .render(&TemplateContext::tenor(Tenor::Months(1)))
            .is_err());
    }

    #[test]
    fn test_check() {
        assert!(TickerTemplate::standard_forward().check().is_ok());
        assert!(TickerTemplate::new("{foo} Curncy").check().is_err());
        assert_eq!(
            TickerTemplate::standard_forward().placeholders().unwrap(),
            vec!["pair".to_string(), "tenor".to_string()]
        );
    }
}

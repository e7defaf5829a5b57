//! Built-in instrument catalog.
//!
//! FX pairs are grouped the same way coverage reports group them. Pairs whose
//! onshore forwards are not quoted carry an NDF alternate convention with the
//! longest tenor the NDF family has been observed to quote.

use curvefeed_core::{Currency, CurrencyPair, InstrumentClass, Tenor};

use crate::catalog::{AlternateConvention, CatalogEntry, InstrumentCatalog, PairCategory};
use crate::error::ConfigResult;

/// G10 pairs.
pub const G10_PAIRS: &[&str] = &[
    "EURUSD", "GBPUSD", "USDJPY", "USDCHF", "AUDUSD", "USDCAD", "NZDUSD", "USDSEK", "USDNOK",
    "USDDKK",
];

/// Emerging Asia pairs.
pub const EM_ASIA_PAIRS: &[&str] = &[
    "USDSGD", "USDHKD", "USDCNH", "USDINR", "USDKRW", "USDTWD", "USDTHB", "USDPHP", "USDIDR",
    "USDMYR",
];

/// Emerging Latin America pairs.
pub const EM_LATAM_PAIRS: &[&str] = &["USDMXN", "USDBRL", "USDCLP", "USDCOP", "USDPEN", "USDARS"];

/// Emerging EMEA pairs.
pub const EM_EMEA_PAIRS: &[&str] = &[
    "USDZAR", "USDTRY", "USDRUB", "USDPLN", "USDHUF", "USDCZK", "USDILS", "USDAED", "USDSAR",
];

/// Non-dollar crosses.
pub const CROSS_PAIRS: &[&str] = &[
    "EURGBP", "EURJPY", "GBPJPY", "EURCHF", "AUDJPY", "CADJPY", "EURAUD", "EURNZD", "GBPAUD",
    "GBPNZD",
];

/// NDF conventions: (pair, ticker format, longest quoted tenor).
///
/// `CLN` is the Colombian peso family; Chile trades under `CHN`.
pub const NDF_CONVENTIONS: &[(&str, &str, &str)] = &[
    ("USDINR", "IRN{tenor} Curncy", "6M"),
    ("USDTWD", "NTN{tenor} Curncy", "5Y"),
    ("USDMYR", "MRN{tenor} Curncy", "9M"),
    ("USDCOP", "CLN{tenor} Curncy", "3Y"),
    ("USDKRW", "KWN{tenor} Curncy", "5Y"),
    ("USDIDR", "IHN{tenor} Curncy", "1Y"),
    ("USDPHP", "PPN{tenor} Curncy", "1Y"),
    ("USDBRL", "BCN{tenor} Curncy", "1Y"),
    ("USDCLP", "CHN{tenor} Curncy", "1Y"),
    ("USDPEN", "PEO{tenor} Curncy", "1Y"),
    ("USDARS", "AFN{tenor} Curncy", "1Y"),
];

/// Pairs with a spot market only.
pub const SPOT_ONLY_PAIRS: &[&str] = &["USDRUB"];

fn category_pairs() -> [(PairCategory, &'static [&'static str]); 5] {
    [
        (PairCategory::G10, G10_PAIRS),
        (PairCategory::EmAsia, EM_ASIA_PAIRS),
        (PairCategory::EmLatam, EM_LATAM_PAIRS),
        (PairCategory::EmEmea, EM_EMEA_PAIRS),
        (PairCategory::Crosses, CROSS_PAIRS),
    ]
}

fn fx_entry(code: &str, category: PairCategory) -> ConfigResult<CatalogEntry> {
    let pair = CurrencyPair::parse(code)?;
    let mut entry = CatalogEntry::fx(pair).with_category(category);

    if SPOT_ONLY_PAIRS.contains(&code) {
        entry = entry
            .spot_only()
            .with_description(format!("{}/{} spot only", pair.base, pair.quote));
    } else if let Some((_, format, max)) = NDF_CONVENTIONS.iter().find(|(p, _, _)| *p == code) {
        entry = entry
            .with_alternate(
                AlternateConvention::new(*format, Tenor::parse(max)?)
                    .with_description(format!("{} non-deliverable forwards", pair.quote)),
            )
            .with_description(format!("{}/{} NDF curve", pair.base, pair.quote));
    }
    Ok(entry)
}

fn usd_sofr() -> CatalogEntry {
    use InstrumentClass::ForwardOrOis as Ois;
    CatalogEntry::rates("USD_SOFR", Currency::USD, "SOFRRATE Index")
        .with_description("USD SOFR OIS curve")
        .with_instrument(Tenor::Months(1), Ois, "USOSFRA Curncy")
        .with_instrument(Tenor::Months(2), Ois, "USOSFRB Curncy")
        .with_instrument(Tenor::Months(3), Ois, "USOSFRC Curncy")
        .with_instrument(Tenor::Months(6), Ois, "USOSFRF Curncy")
        .with_instrument(Tenor::Months(9), Ois, "USOSFRI Curncy")
        .with_instrument(Tenor::Years(1), Ois, "USOSFR1 Curncy")
        .with_instrument(Tenor::Years(2), Ois, "USOSFR2 Curncy")
        .with_instrument(Tenor::Years(3), Ois, "USOSFR3 Curncy")
        .with_instrument(Tenor::Years(5), Ois, "USOSFR5 Curncy")
        .with_instrument(Tenor::Years(7), Ois, "USOSFR7 Curncy")
        .with_instrument(Tenor::Years(10), Ois, "USOSFR10 Curncy")
        .with_instrument(Tenor::Years(30), Ois, "USOSFR30 Curncy")
}

fn usd_term_sofr() -> CatalogEntry {
    use InstrumentClass::MoneyMarket as Mm;
    CatalogEntry::rates("USD_TERM_SOFR", Currency::USD, "SOFRRATE Index")
        .with_description("CME Term SOFR fixings")
        .with_instrument(Tenor::Months(1), Mm, "TSFR1M Index")
        .with_instrument(Tenor::Months(3), Mm, "TSFR3M Index")
        .with_instrument(Tenor::Months(6), Mm, "TSFR6M Index")
        .with_instrument(Tenor::Months(12), Mm, "TSFR12M Index")
}

fn usd_treasury() -> CatalogEntry {
    use InstrumentClass::GovernmentBond as Govt;
    CatalogEntry::rates("USD_TREASURY", Currency::USD, "SOFRRATE Index")
        .with_description("US Treasury generic yields")
        .with_instrument(Tenor::Months(1), Govt, "GB1M Govt")
        .with_instrument(Tenor::Months(3), Govt, "GB3 Govt")
        .with_instrument(Tenor::Months(6), Govt, "GB6 Govt")
        .with_instrument(Tenor::Years(1), Govt, "GB12 Govt")
        .with_instrument(Tenor::Years(2), Govt, "GT2 Govt")
        .with_instrument(Tenor::Years(3), Govt, "GT3 Govt")
        .with_instrument(Tenor::Years(5), Govt, "GT5 Govt")
        .with_instrument(Tenor::Years(7), Govt, "GT7 Govt")
        .with_instrument(Tenor::Years(10), Govt, "GT10 Govt")
        .with_instrument(Tenor::Years(20), Govt, "GT20 Govt")
        .with_instrument(Tenor::Years(30), Govt, "GT30 Govt")
}

fn usd_swaps() -> CatalogEntry {
    use InstrumentClass::Swap;
    CatalogEntry::rates("USD_SWAP", Currency::USD, "SOFRRATE Index")
        .with_description("USD SOFR par swap rates")
        .with_instrument(Tenor::Years(2), Swap, "USSO2 Curncy")
        .with_instrument(Tenor::Years(5), Swap, "USSO5 Curncy")
        .with_instrument(Tenor::Years(10), Swap, "USSO10 Curncy")
        .with_instrument(Tenor::Years(30), Swap, "USSO30 Curncy")
}

fn eur_estr() -> CatalogEntry {
    use InstrumentClass::ForwardOrOis as Ois;
    CatalogEntry::rates("EUR_ESTR", Currency::EUR, "ESTRON Index")
        .with_description("EUR €STR OIS curve")
        .with_instrument(Tenor::Months(1), Ois, "EESWEA Curncy")
        .with_instrument(Tenor::Months(3), Ois, "EESWEC Curncy")
        .with_instrument(Tenor::Months(6), Ois, "EESWEF Curncy")
        .with_instrument(Tenor::Years(1), Ois, "EESWE1 Curncy")
        .with_instrument(Tenor::Years(2), Ois, "EESWE2 Curncy")
        .with_instrument(Tenor::Years(5), Ois, "EESWE5 Curncy")
        .with_instrument(Tenor::Years(10), Ois, "EESWE10 Curncy")
}

fn gbp_sonia() -> CatalogEntry {
    use InstrumentClass::ForwardOrOis as Ois;
    CatalogEntry::rates("GBP_SONIA", Currency::GBP, "SONIO/N Index")
        .with_description("GBP SONIA OIS curve")
        .with_instrument(Tenor::Months(1), Ois, "BPSWSA Curncy")
        .with_instrument(Tenor::Months(3), Ois, "BPSWSC Curncy")
        .with_instrument(Tenor::Months(6), Ois, "BPSWSF Curncy")
        .with_instrument(Tenor::Years(1), Ois, "BPSWS1 Curncy")
        .with_instrument(Tenor::Years(2), Ois, "BPSWS2 Curncy")
        .with_instrument(Tenor::Years(5), Ois, "BPSWS5 Curncy")
        .with_instrument(Tenor::Years(10), Ois, "BPSWS10 Curncy")
}

/// Every built-in entry.
pub fn standard_entries() -> ConfigResult<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    for (category, pairs) in category_pairs() {
        for code in pairs {
            entries.push(fx_entry(code, category)?);
        }
    }
    entries.extend([
        usd_sofr(),
        usd_term_sofr(),
        usd_treasury(),
        usd_swaps(),
        eur_estr(),
        gbp_sonia(),
    ]);
    Ok(entries)
}

impl InstrumentCatalog {
    /// The built-in catalog.
    pub fn standard() -> ConfigResult<Self> {
        Self::from_entries(standard_entries()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Validate;
    use curvefeed_core::CurveId;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = InstrumentCatalog::standard().unwrap();
        assert!(catalog.validate().is_empty());
        assert_eq!(catalog.len(), 45 + 6);
    }

    #[test]
    fn test_ndf_entries() {
        let catalog = InstrumentCatalog::standard().unwrap();
        let inr = catalog.get(&CurveId::new("USDINR")).unwrap();
        let alt = inr.active_alternate().unwrap();
        assert_eq!(alt.format.as_str(), "IRN{tenor} Curncy");
        assert_eq!(alt.max_tenor_days(), 180);

        let cop = catalog.get(&CurveId::new("USDCOP")).unwrap();
        assert_eq!(cop.active_alternate().unwrap().format.as_str(), "CLN{tenor} Curncy");
        let clp = catalog.get(&CurveId::new("USDCLP")).unwrap();
        assert_eq!(clp.active_alternate().unwrap().format.as_str(), "CHN{tenor} Curncy");
    }

    #[test]
    fn test_g10_has_no_alternate() {
        let catalog = InstrumentCatalog::standard().unwrap();
        for entry in catalog.by_category(PairCategory::G10) {
            assert!(entry.active_alternate().is_none(), "{}", entry.identifier);
        }
        assert_eq!(catalog.by_category(PairCategory::G10).count(), 10);
    }

    #[test]
    fn test_spot_only_pair() {
        let catalog = InstrumentCatalog::standard().unwrap();
        let rub = catalog.get(&CurveId::new("USDRUB")).unwrap();
        assert!(!rub.has_term_market());
    }

    #[test]
    fn test_rates_entries() {
        let catalog = InstrumentCatalog::standard().unwrap();
        let sofr = catalog.get(&CurveId::new("USD_SOFR")).unwrap();
        assert_eq!(sofr.anchor_spec().unwrap().ticker, "SOFRRATE Index");
        assert_eq!(sofr.ladder().len(), 12);
        let tsy = catalog.get(&CurveId::new("USD_TREASURY")).unwrap();
        assert!(tsy
            .instrument_specs()
            .iter()
            .all(|s| s.instrument_class == InstrumentClass::GovernmentBond));
    }
}

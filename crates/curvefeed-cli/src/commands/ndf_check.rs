//! NDF ticker check.
//!
//! Renders candidate ticker formats for each pair across a tenor ladder,
//! fetches every candidate ticker in one request and reports which tenors
//! each format is quoted for. The format quoting the most tenors is the
//! working one, and it is compared with the alternate convention the catalog
//! declares for the pair.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use curvefeed_config::{InstrumentCatalog, TemplateContext, TickerTemplate};
use curvefeed_core::{CurrencyPair, CurveId, Tenor, Ticker};
use curvefeed_traits::{QuoteField, QuoteRequest, QuoteSource};

use super::{parse_ladder, Context};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_output, print_success, print_warning};

/// Formats tried after the catalog's alternate when `--formats` is not given.
pub const FALLBACK_FORMATS: [&str; 2] = ["{pair}{tenor} Curncy", "NDF{pair}{tenor} Curncy"];

/// Arguments for the ndf-check command.
#[derive(Args)]
pub struct NdfCheckArgs {
    /// Pairs to check (e.g., USDINR USDKRW)
    #[arg(required = true)]
    pub pairs: Vec<String>,

    /// Comma-separated ticker formats to try instead of the defaults
    /// (placeholders: {pair}, {base}, {quote}, {tenor})
    #[arg(long)]
    pub formats: Option<String>,

    /// Tenor ladder; defaults to 1W through 5Y
    #[arg(short, long)]
    pub ladder: Option<String>,

    /// Read quotes from a JSON or CSV file instead of the gateway
    #[arg(long)]
    pub quotes: Option<PathBuf>,
}

/// One ticker format to try for a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pair: CurrencyPair,
    pub format: TickerTemplate,
    /// The catalog declares this format as the pair's alternate convention.
    pub declared: bool,
}

impl Candidate {
    /// The candidate's ticker at every ladder tenor.
    pub fn tickers(&self, ladder: &[Tenor]) -> CliResult<Vec<(Tenor, Ticker)>> {
        ladder
            .iter()
            .map(|&tenor| {
                let ticker = self
                    .format
                    .render(&TemplateContext::fx(self.pair, tenor))
                    .map_err(|e| CliError::InvalidFormat(e.to_string()))?;
                Ok((tenor, Ticker::new(ticker)))
            })
            .collect()
    }
}

/// What the quote source returned for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCheck {
    pub candidate: Candidate,
    /// Tenors requested.
    pub requested: usize,
    /// Tenors with a usable price, shortest first.
    pub quoted: Vec<Tenor>,
}

impl FormatCheck {
    /// Longest quoted tenor.
    pub fn longest(&self) -> Option<Tenor> {
        self.quoted.iter().copied().max_by_key(Tenor::to_days)
    }

    fn reach(&self) -> u32 {
        self.longest().map_or(0, |t| t.to_days())
    }
}

/// Parses `--formats`. Every format needs a `{tenor}` placeholder.
pub fn parse_formats(formats: Option<&str>) -> CliResult<Option<Vec<TickerTemplate>>> {
    let Some(s) = formats else {
        return Ok(None);
    };
    let templates: Vec<TickerTemplate> = s
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(TickerTemplate::new)
        .collect();
    if templates.is_empty() {
        return Err(CliError::InvalidFormat(s.to_string()));
    }
    for template in &templates {
        template
            .check()
            .map_err(|e| CliError::InvalidFormat(e.to_string()))?;
        let placeholders = template
            .placeholders()
            .map_err(|e| CliError::InvalidFormat(e.to_string()))?;
        if !placeholders.iter().any(|p| p == "tenor") {
            return Err(CliError::InvalidFormat(format!(
                "'{}' has no {{tenor}} placeholder",
                template
            )));
        }
    }
    Ok(Some(templates))
}

/// Candidates for a pair as typed on the command line.
///
/// Without explicit formats the catalog's alternate comes first, followed by
/// [`FALLBACK_FORMATS`]. Pairs missing from the catalog are parsed as codes.
pub fn candidates(
    catalog: &InstrumentCatalog,
    id: &str,
    formats: Option<&[TickerTemplate]>,
) -> CliResult<Vec<Candidate>> {
    let code = id.trim().to_ascii_uppercase();
    let entry = catalog.get(&CurveId::new(code.as_str()));
    let pair = match entry {
        Some(entry) => entry
            .pair()
            .ok_or_else(|| CliError::InvalidPair(format!("{} is not an FX forward", code)))?,
        None => CurrencyPair::parse(&code).map_err(|e| CliError::InvalidPair(e.to_string()))?,
    };
    let declared = entry
        .and_then(|e| e.active_alternate())
        .map(|alt| alt.format.clone());

    let mut formats: Vec<TickerTemplate> = match formats {
        Some(given) => given.to_vec(),
        None => declared
            .iter()
            .cloned()
            .chain(FALLBACK_FORMATS.iter().map(|f| TickerTemplate::new(*f)))
            .collect(),
    };
    let mut seen = HashSet::new();
    formats.retain(|f| seen.insert(f.as_str().to_string()));

    Ok(formats
        .into_iter()
        .map(|format| Candidate {
            pair,
            declared: declared.as_ref() == Some(&format),
            format,
        })
        .collect())
}

/// Fetches every candidate ticker in a single request and scores each format.
///
/// A tenor counts as quoted when its quote succeeded and carries a price.
pub async fn check(
    source: &dyn QuoteSource,
    candidates: &[Candidate],
    ladder: &[Tenor],
) -> CliResult<Vec<FormatCheck>> {
    let rendered = candidates
        .iter()
        .map(|c| c.tickers(ladder))
        .collect::<CliResult<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let tickers: Vec<Ticker> = rendered
        .iter()
        .flatten()
        .map(|(_, ticker)| ticker)
        .filter(|ticker| seen.insert(*ticker))
        .cloned()
        .collect();
    debug!(
        candidates = candidates.len(),
        tickers = tickers.len(),
        source = source.name(),
        "checking ticker formats"
    );

    let request = QuoteRequest::new(tickers, &QuoteField::defaults());
    let batch = source
        .fetch_quotes(&request)
        .await
        .map_err(|e| CliError::Source(e.to_string()))?;

    Ok(candidates
        .iter()
        .zip(rendered)
        .map(|(candidate, tickers)| {
            let mut quoted: Vec<Tenor> = tickers
                .iter()
                .filter(|(_, ticker)| {
                    batch
                        .get(ticker)
                        .is_some_and(|q| q.success && q.primary_value().is_some())
                })
                .map(|(tenor, _)| *tenor)
                .collect();
            quoted.sort_by_key(Tenor::to_days);
            quoted.dedup();
            FormatCheck {
                candidate: candidate.clone(),
                requested: tickers.len(),
                quoted,
            }
        })
        .collect())
}

/// The format quoting the most tenors for a pair. Ties go to the longer
/// reach, then to the earlier candidate.
pub fn working_format<'a>(
    checks: &'a [FormatCheck],
    pair: &CurrencyPair,
) -> Option<&'a FormatCheck> {
    checks
        .iter()
        .filter(|c| &c.candidate.pair == pair && !c.quoted.is_empty())
        .fold(None, |best: Option<&FormatCheck>, c| match best {
            Some(b) if (b.quoted.len(), b.reach()) >= (c.quoted.len(), c.reach()) => Some(b),
            _ => Some(c),
        })
}

/// Pairs in first-seen order.
fn pairs(checks: &[FormatCheck]) -> Vec<CurrencyPair> {
    let mut seen = HashSet::new();
    checks
        .iter()
        .map(|c| c.candidate.pair)
        .filter(|p| seen.insert(*p))
        .collect()
}

/// Differences between what is quoted and what the catalog declares.
pub fn findings(catalog: &InstrumentCatalog, checks: &[FormatCheck]) -> Vec<String> {
    let mut notes = Vec::new();
    for pair in pairs(checks) {
        let entry = catalog.get(&CurveId::new(pair.code()));
        let alternate = entry.and_then(|e| e.active_alternate());
        let Some(working) = working_format(checks, &pair) else {
            notes.push(format!("{}: no candidate format is quoted", pair));
            continue;
        };
        let format = &working.candidate.format;
        let longest = working.longest().map(|t| t.label()).unwrap_or_default();

        match alternate {
            Some(alt) if &alt.format != format => notes.push(format!(
                "{}: catalog declares {} but {} is quoted (to {})",
                pair, alt.format, format, longest
            )),
            Some(alt) if working.reach() != alt.max_tenor_days() => notes.push(format!(
                "{}: catalog caps {} at {}, quotes reach {}",
                pair, format, alt.max_tenor, longest
            )),
            Some(_) => {}
            None => {
                let standard = entry
                    .and_then(|e| e.standard_template.clone())
                    .unwrap_or_else(TickerTemplate::standard_forward);
                if &standard != format {
                    notes.push(format!(
                        "{}: no alternate declared, {} is quoted to {}",
                        pair, format, longest
                    ));
                }
            }
        }
    }
    notes
}

/// One candidate format's result.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct NdfCheckRow {
    #[tabled(rename = "Pair")]
    pub pair: String,
    #[tabled(rename = "Format")]
    pub format: String,
    #[tabled(rename = "Quoted")]
    pub quoted: String,
    #[tabled(rename = "Longest")]
    pub longest: String,
    #[tabled(rename = "Tenors")]
    pub tenors: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Table rows, one per candidate, in candidate order.
pub fn rows(checks: &[FormatCheck]) -> Vec<NdfCheckRow> {
    checks
        .iter()
        .map(|check| {
            let working = working_format(checks, &check.candidate.pair)
                .is_some_and(|w| std::ptr::eq(w, check));
            let mut status = Vec::new();
            if working {
                status.push("working");
            }
            if check.candidate.declared {
                status.push("catalog");
            }
            NdfCheckRow {
                pair: check.candidate.pair.to_string(),
                format: check.candidate.format.to_string(),
                quoted: format!("{}/{}", check.quoted.len(), check.requested),
                longest: check
                    .longest()
                    .map(|t| t.label())
                    .unwrap_or_else(|| "-".into()),
                tenors: check
                    .quoted
                    .iter()
                    .map(Tenor::label)
                    .collect::<Vec<_>>()
                    .join(" "),
                status: if status.is_empty() {
                    "-".into()
                } else {
                    status.join(", ")
                },
            }
        })
        .collect()
}

/// Executes the ndf-check command.
pub async fn execute(args: NdfCheckArgs, ctx: &Context) -> anyhow::Result<()> {
    let ladder = parse_ladder(args.ladder.as_deref())?
        .unwrap_or_else(Tenor::standard_forward_ladder);
    let formats = parse_formats(args.formats.as_deref())?;

    let mut seen = HashSet::new();
    let mut all = Vec::new();
    for id in &args.pairs {
        if seen.insert(id.trim().to_ascii_uppercase()) {
            all.extend(candidates(&ctx.catalog, id, formats.as_deref())?);
        }
    }

    let source = ctx.quote_source(args.quotes.as_ref())?;
    let checks = check(source.as_ref(), &all, &ladder).await?;
    let rows = rows(&checks);

    if ctx.decorate() {
        print_header(&format!(
            "NDF check ({} pairs, {} formats, {} tenors)",
            seen.len(),
            rows.len(),
            ladder.len()
        ));
    }
    print_output(&rows, ctx.format)?;

    if ctx.decorate() {
        let notes = findings(&ctx.catalog, &checks);
        if notes.is_empty() {
            print_success("catalog conventions match the quoted formats");
        }
        for note in &notes {
            print_warning(note);
        }
    }
    Ok(())
}

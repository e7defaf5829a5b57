//! Market tenors and their calendar-day equivalents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Days per year used to turn tenor days into year fractions.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Longest tenor [`Tenor::parse`] accepts, in days (100 years).
pub const MAX_TENOR_DAYS: u32 = 100 * 365;

/// Tenor representation (e.g., 1W, 3M, 18M, 5Y).
///
/// Month tenors count 30 days per month, except that whole years inside a
/// month tenor count 365 days, so `18M` is 545 days and `12M` equals `1Y`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tenor {
    /// Overnight / spot anchor
    Overnight,
    /// Days
    Days(u32),
    /// Weeks
    Weeks(u32),
    /// Months
    Months(u32),
    /// Years
    Years(u32),
}

impl Tenor {
    /// Parse tenor from string (e.g., "3M", "1Y", "ON").
    pub fn parse(s: &str) -> CoreResult<Self> {
        let s = s.trim().to_uppercase();
        if s.is_empty() {
            return Err(CoreError::invalid_tenor(s, "empty tenor string"));
        }
        if s == "ON" || s == "SPOT" {
            return Ok(Tenor::Overnight);
        }

        // Split on the last char, not the last byte: the unit may be non-ASCII.
        let Some((split, unit)) = s.char_indices().next_back() else {
            return Err(CoreError::invalid_tenor(&s, "empty tenor string"));
        };
        let num: u32 = s[..split]
            .parse()
            .map_err(|_| CoreError::invalid_tenor(&s, "invalid tenor number"))?;
        if num == 0 {
            return Err(CoreError::invalid_tenor(&s, "tenor must be positive"));
        }

        let tenor = match unit {
            'D' => Tenor::Days(num),
            'W' => Tenor::Weeks(num),
            'M' => Tenor::Months(num),
            'Y' => Tenor::Years(num),
            _ => return Err(CoreError::invalid_tenor(&s, "invalid tenor unit")),
        };
        match tenor.checked_days() {
            Some(days) if days <= MAX_TENOR_DAYS => Ok(tenor),
            _ => Err(CoreError::invalid_tenor(&s, "tenor too long")),
        }
    }

    /// Calendar days, or `None` when the count does not fit in a `u32`.
    #[must_use]
    pub fn checked_days(&self) -> Option<u32> {
        match *self {
            Tenor::Overnight => Some(0),
            Tenor::Days(d) => Some(d),
            Tenor::Weeks(w) => w.checked_mul(7),
            Tenor::Months(m) => (m / 12)
                .checked_mul(365)
                .and_then(|d| d.checked_add((m % 12) * 30)),
            Tenor::Years(y) => y.checked_mul(365),
        }
    }

    /// Convert tenor to calendar days, saturating at `u32::MAX`.
    #[must_use]
    pub fn to_days(&self) -> u32 {
        self.checked_days().unwrap_or(u32::MAX)
    }

    /// Tenor as a year fraction (days / 365).
    #[must_use]
    pub fn to_years(&self) -> f64 {
        years_from_days(self.to_days())
    }

    /// Returns true for the overnight/spot anchor tenor.
    #[must_use]
    pub fn is_anchor(&self) -> bool {
        self.to_days() == 0
    }

    /// Canonical tenor for a day count, preferring the coarsest exact unit.
    ///
    /// Month tenors beyond a year (15M, 18M) are kept as months so that
    /// `from_days(Tenor::Months(18).to_days())` reads back as `18M`.
    #[must_use]
    pub fn from_days(days: u32) -> Self {
        if days == 0 {
            return Tenor::Overnight;
        }
        if days % 365 == 0 {
            return Tenor::Years(days / 365);
        }
        let (years, rem) = (days / 365, days % 365);
        if rem % 30 == 0 && rem < 360 {
            return Tenor::Months(years * 12 + rem / 30);
        }
        if days % 7 == 0 {
            return Tenor::Weeks(days / 7);
        }
        Tenor::Days(days)
    }

    /// Market label, e.g. `"3M"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// The standard FX forward ladder, 1W through 5Y.
    #[must_use]
    pub fn standard_forward_ladder() -> Vec<Tenor> {
        vec![
            Tenor::Weeks(1),
            Tenor::Weeks(2),
            Tenor::Months(1),
            Tenor::Months(2),
            Tenor::Months(3),
            Tenor::Months(6),
            Tenor::Months(9),
            Tenor::Years(1),
            Tenor::Months(18),
            Tenor::Years(2),
            Tenor::Years(3),
            Tenor::Years(5),
        ]
    }

    /// Parses a comma-separated ladder such as `"1W,1M,3M,1Y"`.
    pub fn parse_ladder(s: &str) -> CoreResult<Vec<Tenor>> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Tenor::parse)
            .collect()
    }
}

/// Year fraction for a day count.
#[must_use]
pub fn years_from_days(days: u32) -> f64 {
    f64::from(days) / DAYS_PER_YEAR
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenor::Overnight => write!(f, "ON"),
            Tenor::Days(d) => write!(f, "{}D", d),
            Tenor::Weeks(w) => write!(f, "{}W", w),
            Tenor::Months(m) => write!(f, "{}M", m),
            Tenor::Years(y) => write!(f, "{}Y", y),
        }
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}

use serde::{Deserialize, Serialize};

/// Exchange symbol such as `TSLA` or the index `^GSPC`.
///
/// Stored upper-cased and trimmed so `tsla` and ` TSLA ` name the same series.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: &str) -> Self {
        Ticker(symbol.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name safe to use as a file stem (`^GSPC` -> `GSPC`).
    pub fn file_stem(&self) -> &str {
        self.0.trim_start_matches('^')
    }

}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Ticker {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s.trim().is_empty() {
            anyhow::bail!("Ticker symbol cannot be empty");
        }
        Ok(Ticker::new(s))
    }
}

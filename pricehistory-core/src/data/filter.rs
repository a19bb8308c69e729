//! Symbol exclusion policy.
//!
//! In stock mode, symbols carrying a digit (bonds, funds, secondary
//! listings) or ending in the rights-issue marker `ح` are skipped before any
//! request is made. Option mode turns the filter off.

use serde::{Deserialize, Serialize};

/// Which family of instruments a run targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Stock,
    Option,
}

impl RunMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Some(RunMode::Stock),
            "option" => Some(RunMode::Option),
            _ => None,
        }
    }
}

/// Compiled-once exclusion pattern: any decimal digit, or a trailing marker.
#[derive(Debug, Clone, Copy)]
pub struct SymbolFilter {
    excluded_suffix: char,
}

impl SymbolFilter {
    /// The exchange's rights-issue marker.
    pub const RIGHTS_ISSUE_MARKER: char = 'ح';

    pub const DEFAULT: SymbolFilter = SymbolFilter {
        excluded_suffix: Self::RIGHTS_ISSUE_MARKER,
    };

    /// True when `symbol` matches the exclusion pattern.
    pub fn is_excluded(&self, symbol: &str) -> bool {
        symbol.chars().any(is_decimal_digit) || symbol.ends_with(self.excluded_suffix)
    }

    /// True when `symbol` should be fetched under `mode`.
    pub fn admits(&self, symbol: &str, mode: RunMode) -> bool {
        match mode {
            RunMode::Option => true,
            RunMode::Stock => !self.is_excluded(symbol),
        }
    }
}

impl Default for SymbolFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ASCII, Arabic-Indic and Extended Arabic-Indic (Persian) digits.
fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
        || ('\u{0660}'..='\u{0669}').contains(&c)
        || ('\u{06F0}'..='\u{06F9}').contains(&c)
}

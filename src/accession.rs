//! Typed variant accession identifiers.
//!
//! The accessioning service hands out two kinds of identifiers: clustered
//! variant accessions (`rs`-prefixed, one per variant cluster) and submitted
//! variant accessions (`ss`-prefixed, one per submission). Queries against
//! the service are addressed by category plus the bare accession number.
//!
//! # Example
//!
//! ```
//! use ferro_reconcile::accession::{Accession, AccessionCategory};
//!
//! let acc: Accession = "rs121913529".parse().unwrap();
//! assert_eq!(acc.number(), 121913529);
//! assert_eq!(acc.category(), AccessionCategory::ClusteredVariants);
//! assert_eq!(acc.to_string(), "rs121913529");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ReconcileError;

/// Query category understood by the accessioning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessionCategory {
    /// Clustered variants (`rs` ids).
    ClusteredVariants,
    /// Submitted variants (`ss` ids).
    SubmittedVariants,
}

impl AccessionCategory {
    /// The category path segment used by the accessioning service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClusteredVariants => "clustered-variants",
            Self::SubmittedVariants => "submitted-variants",
        }
    }
}

impl fmt::Display for AccessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed variant accession id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accession {
    /// Clustered variant accession (`rs`).
    Clustered(u64),
    /// Submitted variant accession (`ss`).
    Submitted(u64),
}

impl Accession {
    /// The bare accession number, without its prefix.
    pub fn number(&self) -> u64 {
        match self {
            Self::Clustered(n) | Self::Submitted(n) => *n,
        }
    }

    /// The service category this accession is queried under.
    pub fn category(&self) -> AccessionCategory {
        match self {
            Self::Clustered(_) => AccessionCategory::ClusteredVariants,
            Self::Submitted(_) => AccessionCategory::SubmittedVariants,
        }
    }

    /// True for `rs`-prefixed accessions.
    pub fn is_clustered(&self) -> bool {
        matches!(self, Self::Clustered(_))
    }
}

impl FromStr for Accession {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReconcileError::InvalidAccession {
            input: s.to_string(),
        };
        if let Some(suffix) = s.strip_prefix("rs") {
            return Ok(Accession::Clustered(suffix.parse().map_err(|_| invalid())?));
        }
        if let Some(suffix) = s.strip_prefix("ss") {
            return Ok(Accession::Submitted(suffix.parse().map_err(|_| invalid())?));
        }
        Err(invalid())
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clustered(n) => write!(f, "rs{}", n),
            Self::Submitted(n) => write!(f, "ss{}", n),
        }
    }
}

/// Whether an id string carries a known accession prefix.
///
/// Position-keyed warehouse queries are distinguished from accession-keyed
/// ones by this check alone; no full parse is needed.
pub fn has_accession_prefix(id: &str) -> bool {
    id.starts_with("rs") || id.starts_with("ss")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clustered() {
        let acc: Accession = "rs123".parse().unwrap();
        assert_eq!(acc, Accession::Clustered(123));
        assert!(acc.is_clustered());
        assert_eq!(acc.category().as_str(), "clustered-variants");
    }

    #[test]
    fn test_parse_submitted() {
        let acc: Accession = "ss5000000000".parse().unwrap();
        assert_eq!(acc, Accession::Submitted(5000000000));
        assert!(!acc.is_clustered());
        assert_eq!(acc.category().as_str(), "submitted-variants");
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["rs123", "ss42"] {
            let acc: Accession = input.parse().unwrap();
            assert_eq!(acc.to_string(), input);
        }
    }

    #[test]
    fn test_rejects_unknown_prefix() {
        assert!("vcv123".parse::<Accession>().is_err());
        assert!("123456".parse::<Accession>().is_err());
    }

    #[test]
    fn test_rejects_non_numeric_suffix() {
        assert!("rsabc".parse::<Accession>().is_err());
        assert!("ss12x".parse::<Accession>().is_err());
        assert!("rs".parse::<Accession>().is_err());
    }

    #[test]
    fn test_rejects_short_input() {
        assert!("r".parse::<Accession>().is_err());
        assert!("".parse::<Accession>().is_err());
    }

    #[test]
    fn test_has_accession_prefix() {
        assert!(has_accession_prefix("rs123"));
        assert!(has_accession_prefix("ss123"));
        assert!(!has_accession_prefix("2:48000000"));
    }
}

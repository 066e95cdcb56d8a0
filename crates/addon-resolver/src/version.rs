//! Version comparison and constraint checking.
//!
//! Versions are dot-separated segments. Two versions are compared segment by
//! segment: numerically when both segments are all digits, lexically
//! otherwise. A shorter version is padded with `0` segments, so `1.2` and
//! `1.2.0` are equal.
//!
//! Supported constraint expressions:
//!
//! - `*` matches any version
//! - `1.2`, `=1.2`, `==1.2` match exactly (after padding)
//! - `>=1.2` matches `1.2` and anything newer
//! - `>1.2` matches anything strictly newer
//! - `1.0 > 2.0` matches the inclusive range `1.0..=2.0`; `1.0 > *` is the
//!   same as `>=1.0`
//!
//! # Examples
//!
//! ```
//! use addon_resolver::version::VersionConstraint;
//!
//! let constraint = VersionConstraint::parse(">=2.0").unwrap();
//! assert!(constraint.satisfied_by("2.0.0"));
//! assert!(constraint.satisfied_by("2.10"));
//! assert!(!constraint.satisfied_by("1.5.0"));
//!
//! let range = VersionConstraint::parse("1.0 > 1.9").unwrap();
//! assert!(range.satisfied_by("1.4"));
//! assert!(!range.satisfied_by("2.0"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

/// A parsed version: the text as written plus its dot-separated segments.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<String>,
}

impl Version {
    /// Parse a version string.
    ///
    /// Returns `None` for blank input, empty segments (`1..2`, `1.`) or
    /// segments containing anything other than ASCII alphanumerics, `-`,
    /// `_` or `+`.
    pub fn parse(s: &str) -> Option<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return None;
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        let valid = segments.iter().all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        });
        if !valid {
            return None;
        }

        Some(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The version text as written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compare two versions segment by segment.
    ///
    /// Not an `Ord` impl: mixed numeric and lexical segment comparison is
    /// total but not transitive across every input.
    pub fn compare(&self, other: &Version) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let left = self.segments.get(i).map_or("0", String::as_str);
            let right = other.segments.get(i).map_or("0", String::as_str);
            let ord = compare_segment(left, right);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare one segment pair. All-digit segments compare by magnitude
/// without parsing into a fixed-width integer.
fn compare_segment(left: &str, right: &str) -> Ordering {
    let numeric = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if numeric(left) && numeric(right) {
        let l = left.trim_start_matches('0');
        let r = right.trim_start_matches('0');
        l.len().cmp(&r.len()).then_with(|| l.cmp(r))
    } else {
        left.cmp(right)
    }
}

/// A parsed version constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionConstraint {
    /// `*`
    Any,
    /// `1.2`, `=1.2` or `==1.2`
    Exact(Version),
    /// `>=1.2`
    AtLeast(Version),
    /// `>1.2`
    Above(Version),
    /// `1.0 > 2.0`, both ends inclusive
    Between(Version, Version),
}

impl VersionConstraint {
    /// Parse a constraint expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstraint`] for blank expressions, reference
    /// versions that do not parse, or ranges whose lower bound exceeds the
    /// upper bound.
    pub fn parse(expression: &str) -> Result<Self> {
        let expr = expression.trim();
        if expr.is_empty() {
            return Err(invalid(expression, "empty constraint"));
        }
        if expr == "*" {
            return Ok(Self::Any);
        }

        if let Some(rest) = expr.strip_prefix(">=") {
            return Ok(Self::AtLeast(reference(expression, rest)?));
        }
        if let Some(rest) = expr.strip_prefix('>') {
            return Ok(Self::Above(reference(expression, rest)?));
        }
        if let Some(rest) = expr.strip_prefix("==").or_else(|| expr.strip_prefix('=')) {
            return Ok(Self::Exact(reference(expression, rest)?));
        }

        if let Some((low, high)) = expr.split_once('>') {
            let low = reference(expression, low)?;
            if high.trim() == "*" {
                return Ok(Self::AtLeast(low));
            }
            let high = reference(expression, high)?;
            if low.compare(&high) == Ordering::Greater {
                return Err(invalid(
                    expression,
                    format!("lower bound {low} is greater than upper bound {high}"),
                ));
            }
            return Ok(Self::Between(low, high));
        }

        Ok(Self::Exact(reference(expression, expr)?))
    }

    /// Check whether a version string satisfies this constraint.
    ///
    /// Never fails: a version that does not parse satisfies only [`Any`].
    ///
    /// [`Any`]: VersionConstraint::Any
    pub fn satisfied_by(&self, version: &str) -> bool {
        match self {
            Self::Any => true,
            _ => Version::parse(version).is_some_and(|v| self.satisfied_by_version(&v)),
        }
    }

    /// Check whether an already parsed [`Version`] satisfies this constraint.
    pub fn satisfied_by_version(&self, version: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(want) => version.compare(want) == Ordering::Equal,
            Self::AtLeast(min) => version.compare(min) != Ordering::Less,
            Self::Above(min) => version.compare(min) == Ordering::Greater,
            Self::Between(min, max) => {
                version.compare(min) != Ordering::Less && version.compare(max) != Ordering::Greater
            }
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exact(v) => write!(f, "{v}"),
            Self::AtLeast(v) => write!(f, ">={v}"),
            Self::Above(v) => write!(f, ">{v}"),
            Self::Between(min, max) => write!(f, "{min} > {max}"),
        }
    }
}

impl std::str::FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn reference(expression: &str, version: &str) -> Result<Version> {
    Version::parse(version)
        .ok_or_else(|| invalid(expression, format!("invalid version: {}", version.trim())))
}

fn invalid(expression: &str, reason: impl Into<String>) -> Error {
    Error::InvalidConstraint {
        constraint: expression.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    // --- Version ---

    #[rstest]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1.2.0.0", "1.2", Ordering::Equal)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("2", "10", Ordering::Less)]
    #[case("1.01", "1.1", Ordering::Equal)]
    #[case("1.0-beta", "1.0-alpha", Ordering::Greater)]
    #[case("1.2.a", "1.2", Ordering::Greater)]
    #[case("18446744073709551616", "18446744073709551615", Ordering::Greater)]
    fn test_compare(#[case] left: &str, #[case] right: &str, #[case] expected: Ordering) {
        assert_eq!(v(left).compare(&v(right)), expected);
        assert_eq!(v(right).compare(&v(left)), expected.reverse());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("1..2")]
    #[case("1.")]
    #[case(".1")]
    #[case("1.0 beta")]
    #[case("1.*")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(Version::parse(input).is_none(), "{input:?} should not parse");
    }

    #[test]
    fn test_version_equality_pads() {
        assert_eq!(v("3"), v("3.0.0"));
        assert_ne!(v("3.0.1"), v("3"));
    }

    #[test]
    fn test_version_display_keeps_raw() {
        assert_eq!(v(" 1.2 ").to_string(), "1.2");
    }

    // --- VersionConstraint::parse ---

    #[test]
    fn test_parse_any() {
        assert_eq!(VersionConstraint::parse("*").unwrap(), VersionConstraint::Any);
        assert_eq!(VersionConstraint::parse("  *  ").unwrap(), VersionConstraint::Any);
    }

    #[test]
    fn test_parse_variants() {
        assert!(matches!(
            VersionConstraint::parse("1.0").unwrap(),
            VersionConstraint::Exact(_)
        ));
        assert!(matches!(
            VersionConstraint::parse("==1.0").unwrap(),
            VersionConstraint::Exact(_)
        ));
        assert!(matches!(
            VersionConstraint::parse("=1.0").unwrap(),
            VersionConstraint::Exact(_)
        ));
        assert!(matches!(
            VersionConstraint::parse(">= 1.0").unwrap(),
            VersionConstraint::AtLeast(_)
        ));
        assert!(matches!(
            VersionConstraint::parse(">1.0").unwrap(),
            VersionConstraint::Above(_)
        ));
        assert!(matches!(
            VersionConstraint::parse("1.0 > 2.0").unwrap(),
            VersionConstraint::Between(_, _)
        ));
        assert!(matches!(
            VersionConstraint::parse("1.0 > *").unwrap(),
            VersionConstraint::AtLeast(_)
        ));
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case(">=")]
    #[case(">=abc def")]
    #[case("<2.0")]
    #[case("2.0 > 1.0")]
    #[case("1.0 > 2.0 > 3.0")]
    #[case("~1.2")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        let err = VersionConstraint::parse(input).unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { .. }), "{input:?}: {err}");
    }

    // --- satisfied_by ---

    #[test]
    fn test_satisfied_by_exact() {
        let c = VersionConstraint::parse("1.2").unwrap();
        assert!(c.satisfied_by("1.2"));
        assert!(c.satisfied_by("1.2.0"));
        assert!(!c.satisfied_by("1.2.1"));
    }

    #[test]
    fn test_satisfied_by_at_least() {
        let c = VersionConstraint::parse(">=2.0.0").unwrap();
        assert!(c.satisfied_by("2.0"));
        assert!(c.satisfied_by("2.0.1"));
        assert!(c.satisfied_by("10.0"));
        assert!(!c.satisfied_by("1.5.0"));
    }

    #[test]
    fn test_satisfied_by_above() {
        let c = VersionConstraint::parse(">2.0").unwrap();
        assert!(!c.satisfied_by("2.0.0"));
        assert!(c.satisfied_by("2.0.1"));
    }

    #[test]
    fn test_satisfied_by_between() {
        let c = VersionConstraint::parse("1.0 > 1.5").unwrap();
        assert!(c.satisfied_by("1.0"));
        assert!(c.satisfied_by("1.5.0"));
        assert!(!c.satisfied_by("1.5.1"));
        assert!(!c.satisfied_by("0.9"));
    }

    #[test]
    fn test_unparsable_candidate_only_matches_any() {
        assert!(VersionConstraint::Any.satisfied_by("not a version"));
        assert!(VersionConstraint::Any.satisfied_by(""));
        let c = VersionConstraint::parse(">=1.0").unwrap();
        assert!(!c.satisfied_by("not a version"));
        assert!(!c.satisfied_by(""));
    }

    // --- Display ---

    #[rstest]
    #[case("*", "*")]
    #[case("==1.2", "1.2")]
    #[case(">= 1.2", ">=1.2")]
    #[case(">1.2", ">1.2")]
    #[case("1.0>2.0", "1.0 > 2.0")]
    fn test_display_canonical(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(VersionConstraint::parse(input).unwrap().to_string(), expected);
    }
}

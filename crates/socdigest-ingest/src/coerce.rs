//! Tolerant numeric coercion for export fields.
//!
//! Exports decorate numbers with percent signs, thousands separators, and
//! stray whitespace, and use `-` or an empty cell for "no value". Both of the
//! latter read as zero. Anything else that still fails to parse also becomes
//! zero, and the caller records a [`FieldCoercionIssue`].

use std::fmt;

/// A numeric field that could not be parsed and was read as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCoercionIssue {
    pub table: &'static str,
    pub column: &'static str,
    /// 1-based line of the row in its export file.
    pub line: u64,
    pub raw: String,
}

impl fmt::Display for FieldCoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} on line {}: {:?} is not a number, using 0",
            self.table, self.column, self.line, self.raw
        )
    }
}

/// Strip decoration. Returns `None` for the "no value" spellings.
fn clean(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    Some(
        trimmed
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect(),
    )
}

/// Parse a count. Fractional input is truncated toward zero.
///
/// `Ok(0)` for empty or `-`; `Err(())` when the text is not numeric.
pub(crate) fn coerce_count(raw: &str) -> Result<i64, ()> {
    let Some(cleaned) = clean(raw) else {
        return Ok(0);
    };
    if let Ok(value) = cleaned.parse::<i64>() {
        return Ok(value);
    }
    match cleaned.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)]
        Ok(value) if value.is_finite() => Ok(value.trunc() as i64),
        _ => Err(()),
    }
}

/// Parse a rate or score.
///
/// `Ok(0.0)` for empty or `-`; `Err(())` when the text is not numeric.
pub(crate) fn coerce_decimal(raw: &str) -> Result<f64, ()> {
    let Some(cleaned) = clean(raw) else {
        return Ok(0.0);
    };
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_decorated_counts() {
        assert_eq!(coerce_count("42"), Ok(42));
        assert_eq!(coerce_count(" 1,234 "), Ok(1234));
        assert_eq!(coerce_count("-7"), Ok(-7));
        assert_eq!(coerce_count("12.9"), Ok(12));
    }

    #[test]
    fn empty_and_dash_are_zero() {
        assert_eq!(coerce_count(""), Ok(0));
        assert_eq!(coerce_count("  - "), Ok(0));
        assert_eq!(coerce_decimal("-"), Ok(0.0));
    }

    #[test]
    fn percent_suffix_is_stripped() {
        assert_eq!(coerce_decimal("5.74%"), Ok(5.74));
        assert_eq!(coerce_decimal("5.74 %"), Ok(5.74));
    }

    #[test]
    fn garbage_is_an_error() {
        assert_eq!(coerce_count("n/a"), Err(()));
        assert_eq!(coerce_decimal("abc%"), Err(()));
        assert_eq!(coerce_decimal("inf"), Err(()));
    }

    #[test]
    fn issue_display_names_the_field() {
        let issue = FieldCoercionIssue {
            table: "hashtags",
            column: "reach",
            line: 7,
            raw: "lots".to_string(),
        };
        assert_eq!(
            issue.to_string(),
            "hashtags.reach on line 7: \"lots\" is not a number, using 0"
        );
    }
}

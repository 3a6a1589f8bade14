//! Deriving batch input from a pipeline artifact
//!
//! An artifact is either a plain delimited list of compact identifiers
//! (`US1234567, EP1234567B1`) or free-form text that cites patents the way
//! office actions do (`US 4,458,876`, `US 2019/0123456 A1`).

use crate::error::{Error, Result};
use crate::types::Identifier;
use regex::Regex;
use std::collections::HashSet;

/// Country prefixes recognised in free-form text
const COUNTRIES: &str = "US|EP|WO|JP|CN|DE|GB|KR";

/// Minimum digit count (exclusive) for a citation to count as a patent reference
const MIN_DIGITS: usize = 5;

/// Number layouts a citation may use, tried in order: publication
/// (`2019/0123456`), comma-grouped (`4,458,876`), space-grouped with
/// three-digit groups (`1 234 567`), compact (`4458876`)
const NUMBER: &str = r"(?:\d{4}/\d{6,7}|\d{1,3}(?:,\d{3})+|\d{1,3}(?: \d{3})+|\d{6,})";

/// Optional kind code after a number (`B1`, `A`)
const KIND: &str = r"(?:\s?[A-Z]\d?)?";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(format!("invalid reference pattern: {}", e)))
}

/// Identifiers named in an artifact
///
/// A plain list is returned verbatim, duplicates included. Free-form text is
/// scanned for references, which are normalised to compact form (separators
/// stripped) and returned once each in first-occurrence order.
pub fn extract_identifiers(text: &str) -> Result<Vec<Identifier>> {
    let compact = compile(&format!(r"^(?:{COUNTRIES})\d{{{},}}(?:[A-Z]\d?)?$", MIN_DIGITS + 1))?;

    let entries: Vec<&str> = text
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !entries.is_empty() && entries.iter().all(|e| compact.is_match(e)) {
        tracing::debug!(count = entries.len(), "artifact is a plain identifier list");
        return entries.into_iter().map(Identifier::parse).collect();
    }

    // A country prefix followed by one number, or a list of numbers joined
    // by ", " or " and " that all share the prefix
    let reference = compile(&format!(
        r"\b({COUNTRIES})\s?({NUMBER}{KIND}\b(?:(?:,\s?|,?\s+and\s+){NUMBER}{KIND}\b)*)"
    ))?;
    let number = compile(&format!(r"\b({NUMBER})(?:\s?([A-Z]\d?))?\b"))?;

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for caps in reference.captures_iter(text) {
        let country = &caps[1];
        for item in number.captures_iter(&caps[2]) {
            let digits: String = item[1].chars().filter(char::is_ascii_digit).collect();
            if digits.len() <= MIN_DIGITS {
                continue;
            }
            let kind = item.get(2).map_or("", |m| m.as_str());
            let id = format!("{country}{digits}{kind}");
            if seen.insert(id.clone()) {
                found.push(Identifier::parse(&id)?);
            }
        }
    }

    tracing::debug!(count = found.len(), "extracted references from artifact");
    Ok(found)
}

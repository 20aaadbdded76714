// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives a "years since education" sentence from loosely-typed rows.
//!
//! Education rows come straight from the database, so year fields may be
//! numbers, bare year strings or full dates. Only field names mentioning
//! `end`/`graduation` (end years) or `start` (start years) are considered.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use serde_json::Value;
use vctr_core::Row;

pub const NOT_AVAILABLE: &str = "Education date data not available.";
pub const NO_PARSABLE_YEARS: &str = "Education date data available but no parsable years found.";

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(19|20)\d{2}").expect("year pattern is valid"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Builds the education date sentence for the prompt.
///
/// The most recent year is the largest end year, or the largest start year
/// when no end year parsed.
pub fn derive_education_context(rows: Option<&[Row]>, now: DateTime<Utc>) -> String {
    let rows = match rows {
        Some(rows) if !rows.is_empty() => rows,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let mut end_years = Vec::new();
    let mut start_years = Vec::new();

    for (key, value) in rows.iter().flat_map(|row| row.iter()) {
        let Some(year) = parse_year(value) else {
            continue;
        };
        let key = key.to_lowercase();
        if key.contains("end") || key.contains("graduation") {
            end_years.push(year);
        } else if key.contains("start") {
            start_years.push(year);
        }
    }

    let candidates = if end_years.is_empty() {
        &start_years
    } else {
        &end_years
    };

    match candidates.iter().max() {
        Some(&year) => format!(
            "Most recent education year: {year}. Years since: {}.",
            now.year() - year
        ),
        None => NO_PARSABLE_YEARS.to_string(),
    }
}

/// Extracts a calendar year from a field value.
///
/// Numbers count from 1900 upward. Strings yield their first `19xx`/`20xx`
/// run, else the year of a recognizable date.
pub fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|n| *n >= 1900.0 && n.is_finite())
            .map(|n| n.floor() as i32),
        Value::String(s) => YEAR
            .find(s)
            .and_then(|m| m.as_str().parse().ok())
            .or_else(|| parse_date_year(s.trim())),
        _ => None,
    }
}

fn parse_date_year(s: &str) -> Option<i32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).year());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.year())
}

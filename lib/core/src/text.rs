//! Canonical text for records.
//!
//! `project` turns a [`Record`] into the single line that gets embedded and
//! stored beside its vector; `parse` is its exact inverse and is what the
//! response composer uses to turn retrieved text back into typed fields.
//!
//! ```text
//! District: Ariyalur, Latitude: 11.14, Longitude: 79.08, Year: 2020, Scenario: baseline,
//! Population: 754894, Rainfall: 950.5 mm, Groundwater Level: 5.2 m
//! ```
//!
//! Inside values `\`, `,` and `:` are backslash-escaped (and line breaks are
//! written as `\n` / `\r`), so the separators `", "` and `": "` only ever
//! occur between fields.

use crate::{Error, Record, Result};

pub const FIELD_SEPARATOR: &str = ", ";
pub const KEY_SEPARATOR: &str = ": ";

pub const KEY_DISTRICT: &str = "District";
pub const KEY_LATITUDE: &str = "Latitude";
pub const KEY_LONGITUDE: &str = "Longitude";
pub const KEY_YEAR: &str = "Year";
pub const KEY_SCENARIO: &str = "Scenario";
pub const KEY_POPULATION: &str = "Population";
pub const KEY_RAINFALL: &str = "Rainfall";
pub const KEY_GROUNDWATER: &str = "Groundwater Level";

/// Keys in projection order
pub const KEYS: [&str; 8] = [
    KEY_DISTRICT,
    KEY_LATITUDE,
    KEY_LONGITUDE,
    KEY_YEAR,
    KEY_SCENARIO,
    KEY_POPULATION,
    KEY_RAINFALL,
    KEY_GROUNDWATER,
];

const RAINFALL_UNIT: &str = " mm";
const GROUNDWATER_UNIT: &str = " m";

/// Project a record into its canonical text
pub fn project(record: &Record) -> String {
    let values = [
        escape(&record.district),
        format_float(record.latitude),
        format_float(record.longitude),
        record.year.to_string(),
        escape(&record.scenario),
        record.population_estimate.to_string(),
        format!("{}{}", format_float(record.avg_annual_rainfall_mm), RAINFALL_UNIT),
        format!("{}{}", format_float(record.groundwater_level_m), GROUNDWATER_UNIT),
    ];

    KEYS.iter()
        .zip(values.iter())
        .map(|(key, value)| format!("{}{}{}", key, KEY_SEPARATOR, value))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// Parse canonical text back into a record
///
/// Fails with [`Error::GrammarViolation`] unless `text` is exactly what
/// [`project`] produces for some record.
pub fn parse(text: &str) -> Result<Record> {
    let segments = split_unescaped(text, FIELD_SEPARATOR)?;
    if segments.len() != KEYS.len() {
        return Err(violation(text, format!(
            "expected {} fields, found {}",
            KEYS.len(),
            segments.len()
        )));
    }

    let mut values: Vec<String> = Vec::with_capacity(KEYS.len());
    for (segment, expected_key) in segments.iter().zip(KEYS.iter()) {
        let parts = split_unescaped(segment, KEY_SEPARATOR)?;
        let [key, value] = parts.as_slice() else {
            return Err(violation(text, format!("malformed field '{}'", segment)));
        };
        if key != expected_key {
            return Err(violation(text, format!(
                "expected key '{}', found '{}'",
                expected_key, key
            )));
        }
        values.push(unescape(value)?);
    }

    let rainfall = strip_unit(text, KEY_RAINFALL, &values[6], RAINFALL_UNIT)?;
    let groundwater = strip_unit(text, KEY_GROUNDWATER, &values[7], GROUNDWATER_UNIT)?;

    Ok(Record {
        district: values[0].clone(),
        latitude: number(text, KEY_LATITUDE, &values[1])?,
        longitude: number(text, KEY_LONGITUDE, &values[2])?,
        year: number(text, KEY_YEAR, &values[3])?,
        scenario: values[4].clone(),
        population_estimate: number(text, KEY_POPULATION, &values[5])?,
        avg_annual_rainfall_mm: number(text, KEY_RAINFALL, rainfall)?,
        groundwater_level_m: number(text, KEY_GROUNDWATER, groundwater)?,
    })
}

/// Shortest representation that parses back to the same value, always with
/// a decimal point or exponent (`1200.0`, not `1200`).
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | ',' | ':' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(c @ ('\\' | ',' | ':')) => out.push(c),
                Some(c) => {
                    return Err(Error::GrammarViolation(format!(
                        "unknown escape '\\{}' in '{}'",
                        c, value
                    )))
                }
                None => {
                    return Err(Error::GrammarViolation(format!(
                        "dangling escape in '{}'",
                        value
                    )))
                }
            },
            ',' | ':' => {
                return Err(Error::GrammarViolation(format!(
                    "unescaped '{}' in '{}'",
                    ch, value
                )))
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}

/// Split on `sep`, skipping over backslash-escaped characters
fn split_unescaped<'a>(text: &'a str, sep: &str) -> Result<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            if chars.next().is_none() {
                return Err(Error::GrammarViolation(format!("dangling escape in '{}'", text)));
            }
            continue;
        }
        if i >= start && text[i..].starts_with(sep) {
            parts.push(&text[start..i]);
            start = i + sep.len();
        }
    }
    parts.push(&text[start..]);
    Ok(parts)
}

fn strip_unit<'a>(text: &str, key: &str, value: &'a str, unit: &str) -> Result<&'a str> {
    value
        .strip_suffix(unit)
        .ok_or_else(|| violation(text, format!("{} value '{}' lacks unit '{}'", key, value, unit.trim())))
}

fn number<T: std::str::FromStr>(text: &str, key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| violation(text, format!("{} value '{}' is not a valid number", key, value)))
}

fn violation(text: &str, detail: String) -> Error {
    Error::GrammarViolation(format!("{} in \"{}\"", detail, text))
}

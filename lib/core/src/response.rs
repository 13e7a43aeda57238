//! Display-agnostic response payload.
//!
//! Transports serialise [`Response`] as JSON; terminals use its `Display`
//! impl, which renders the rows as an aligned plain-text table.

use crate::Record;
use serde::Serialize;
use std::fmt;

pub const GREETING_REPLY: &str = "Hello! I'm a chatbot that provides district-level groundwater and rainfall data. \
Try asking something like 'District names'.";

pub const IDENTITY_REPLY: &str = "I'm a District Information Chatbot, designed to provide data on districts like \
rainfall, groundwater levels, and population. Ask me about a specific district or data point, e.g., 'District names'.";

pub const REFUSAL_REPLY: &str = "Wrong question you asked.";

pub const EMPTY_QUERY_REPLY: &str = "Please provide a query.";

pub const FAILURE_REPLY: &str = "Sorry, something went wrong while answering your query. Please try again later.";

pub fn no_match_reply(query: &str) -> String {
    format!(
        "Sorry, I couldn't find relevant data for '{}'. Please try a query like 'Ariyalur rainfall in 2020'.",
        query
    )
}

pub fn table_intro(query: &str) -> String {
    format!("Based on your query '{}', here is the relevant information:", query)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Greeting,
    Identity,
    NoMatch,
    Rejected,
    Invalid,
    Table,
    Error,
}

/// One table row, holding the six displayed fields of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub district: String,
    pub year: i32,
    pub scenario: String,
    pub rainfall_mm: f64,
    pub groundwater_level_m: f64,
    pub population: u64,
}

impl From<Record> for TableRow {
    fn from(record: Record) -> Self {
        Self {
            district: record.district,
            year: record.year,
            scenario: record.scenario,
            rainfall_mm: record.avg_annual_rainfall_mm,
            groundwater_level_m: record.groundwater_level_m,
            population: record.population_estimate,
        }
    }
}

impl TableRow {
    /// Chart label, `"{year} ({scenario})"`
    pub fn chart_label(&self) -> String {
        format!("{} ({})", self.year, self.scenario)
    }
}

/// Bar-chart descriptor: one label per value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub series_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub kind: ResponseKind,
    pub message: String,
    pub rows: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<Chart>,
}

impl Response {
    pub fn text(kind: ResponseKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            rows: Vec::new(),
            chart: None,
        }
    }

    pub fn table(message: impl Into<String>, rows: Vec<TableRow>, chart: Option<Chart>) -> Self {
        Self {
            kind: ResponseKind::Table,
            message: message.into(),
            rows,
            chart,
        }
    }

    pub fn rejected() -> Self {
        Self::text(ResponseKind::Rejected, REFUSAL_REPLY)
    }

    pub fn failure() -> Self {
        Self::text(ResponseKind::Error, FAILURE_REPLY)
    }
}

const HEADERS: [&str; 6] = [
    "District",
    "Year",
    "Scenario",
    "Rainfall (mm)",
    "Groundwater Level (m)",
    "Population",
];

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        if self.rows.is_empty() {
            return Ok(());
        }

        let cells: Vec<[String; 6]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.district.clone(),
                    row.year.to_string(),
                    row.scenario.clone(),
                    row.rainfall_mm.to_string(),
                    row.groundwater_level_m.to_string(),
                    row.population.to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = HEADERS.iter().zip(widths).map(|(h, w)| format!("{:<w$}", h)).collect();
        writeln!(f, "{}", header.join(" | ").trim_end())?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &cells {
            let line: Vec<String> = row.iter().zip(widths).map(|(c, w)| format!("{:<w$}", c)).collect();
            writeln!(f, "{}", line.join(" | ").trim_end())?;
        }

        if let Some(chart) = &self.chart {
            writeln!(f)?;
            writeln!(f, "{} [{}]", chart.title, chart.series_label)?;
            for (label, value) in chart.labels.iter().zip(&chart.values) {
                writeln!(f, "  {}: {}", label, value)?;
            }
        }
        Ok(())
    }
}

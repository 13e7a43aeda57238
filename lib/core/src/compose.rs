use crate::response::{self, Chart, Response, ResponseKind, TableRow};
use crate::{text, Result, RetrievedDocument};

pub const GREETINGS: &[&str] = &["hi", "hello", "hey"];
pub const IDENTITY_QUESTIONS: &[&str] = &["who are you"];

const CHART_SERIES_LABEL: &str = "Rainfall (mm)";

/// Trimmed, lower-cased form used for all query matching
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Turns retrieved canonical texts into a [`Response`].
///
/// Knows the dataset's district names so it can tell when a query is about
/// one district and a rainfall chart makes sense.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    /// (lower-cased, as stored) pairs
    districts: Vec<(String, String)>,
}

impl Composer {
    pub fn new<I, S>(districts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let districts = districts
            .into_iter()
            .map(|d| (d.as_ref().to_lowercase(), d.as_ref().to_string()))
            .collect();
        Self { districts }
    }

    /// Build the reply for `query` from its retrieved documents.
    ///
    /// Greetings and identity questions win over retrieval results; an empty
    /// document set yields the no-match reply. A document that does not parse
    /// is an error, never skipped.
    pub fn compose(&self, query: &str, documents: &[RetrievedDocument]) -> Result<Response> {
        let normalized = normalize(query);

        if GREETINGS.contains(&normalized.as_str()) {
            return Ok(Response::text(ResponseKind::Greeting, response::GREETING_REPLY));
        }
        if IDENTITY_QUESTIONS.contains(&normalized.as_str()) {
            return Ok(Response::text(ResponseKind::Identity, response::IDENTITY_REPLY));
        }
        if documents.is_empty() {
            return Ok(Response::text(ResponseKind::NoMatch, response::no_match_reply(query)));
        }

        let rows = documents
            .iter()
            .map(|doc| text::parse(&doc.text).map(TableRow::from))
            .collect::<Result<Vec<_>>>()?;

        let chart = self
            .mentioned_district(&normalized)
            .and_then(|(lower, display)| rainfall_chart(lower, display, &rows));

        Ok(Response::table(response::table_intro(query), rows, chart))
    }

    /// Longest known district name appearing as whole words in the
    /// normalized query
    fn mentioned_district(&self, normalized: &str) -> Option<(&str, &str)> {
        let query_words = words(normalized);
        self.districts
            .iter()
            .filter(|(lower, _)| {
                let district_words = words(lower);
                !district_words.is_empty()
                    && query_words
                        .windows(district_words.len())
                        .any(|window| window == district_words.as_slice())
            })
            .max_by_key(|(lower, _)| lower.len())
            .map(|(lower, display)| (lower.as_str(), display.as_str()))
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn rainfall_chart(district_lower: &str, display: &str, rows: &[TableRow]) -> Option<Chart> {
    let (labels, values): (Vec<String>, Vec<f64>) = rows
        .iter()
        .filter(|row| row.district.to_lowercase() == district_lower)
        .map(|row| (row.chart_label(), row.rainfall_mm))
        .unzip();

    if labels.is_empty() {
        return None;
    }

    Some(Chart {
        title: format!("{} Rainfall Comparison", display),
        series_label: CHART_SERIES_LABEL.to_string(),
        labels,
        values,
    })
}

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::ReconciliationError;

/// One raw score-sheet row. Numeric fields arrive as text and are parsed
/// separately so a bad value can be reported with its row index.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRow {
    pub(crate) name: String,
    pub(crate) total_score: String,
    pub(crate) priority: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) program: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) date_submitted: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<RawRow>() {
        rows.push(row?);
    }

    Ok(rows)
}

/// Parse a total score: a finite, non-negative real number. Anything else
/// would silently corrupt rankings, so it aborts the batch.
pub(crate) fn parse_score(index: usize, raw: &str) -> Result<f64, ReconciliationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite() && *score >= 0.0)
        .ok_or_else(|| ReconciliationError::MalformedRow {
            index,
            reason: format!("total_score '{raw}' is not a non-negative number"),
        })
}

/// Parse a priority: a positive integer, lower meaning higher preference.
pub(crate) fn parse_priority(index: usize, raw: &str) -> Result<u32, ReconciliationError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|priority| *priority >= 1)
        .ok_or_else(|| ReconciliationError::MalformedRow {
            index,
            reason: format!("priority '{raw}' is not a positive integer"),
        })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};

/// Arb score as published by the feed. Rendered verbatim; never used in arithmetic.
///
/// Numbers keep their source text (`87.50` stays `87.50`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ArbScore {
    Number(Number),
    Text(String),
}

impl TryFrom<Value> for ArbScore {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => Ok(ArbScore::Number(n)),
            Value::String(s) => Ok(ArbScore::Text(s)),
            other => Err(format!(
                "arb_score must be a number or string, got {}",
                value_kind(&other)
            )),
        }
    }
}

impl fmt::Display for ArbScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbScore::Number(n) => write!(f, "{n}"),
            ArbScore::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Confidence(pub String);

impl Confidence {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Style class for the confidence line: the lower-cased label ("High" -> "high").
    pub fn style_class(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One card of a flat league feed (`data/{league}.json`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchCard {
    #[serde(deserialize_with = "deserialize_rank")]
    pub rank: u32,
    #[serde(rename = "match")]
    pub match_label: String,
    pub arb_score: ArbScore,
    pub confidence: Confidence,
    pub best_edge: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupedMatch {
    #[serde(deserialize_with = "deserialize_rank")]
    pub rank: u32,
    #[serde(rename = "match")]
    pub match_label: String,
    pub arb_score: ArbScore,
    pub confidence: Confidence,
    pub best_edge: String,
    /// Missing or null means free tier.
    #[serde(default, deserialize_with = "deserialize_premium")]
    pub premium: bool,
}

/// Built record by record in `feed_parse`, never deserialized whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub name: String,
    pub matches: Vec<GroupedMatch>,
}

/// The grouped soccer document (`data/sports/soccer.json`).
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentFeed {
    pub updated_at: String,
    pub tournaments: Vec<Tournament>,
}

impl TournamentFeed {
    pub fn match_count(&self) -> usize {
        self.tournaments.iter().map(|t| t.matches.len()).sum()
    }
}

/// A record that was skipped while validating a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    pub location: String,
    pub reason: String,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// Validated feed content plus whatever had to be skipped to get it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub issues: Vec<RecordIssue>,
}

/// Positive integer, given as a JSON number or a numeric string.
fn deserialize_rank<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let rank = match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    rank.filter(|r| *r > 0)
        .and_then(|r| u32::try_from(r).ok())
        .ok_or_else(|| de::Error::custom("rank must be a positive integer"))
}

fn deserialize_premium<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

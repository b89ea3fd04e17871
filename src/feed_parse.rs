use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cards::{
    GroupedMatch, MatchCard, Parsed, RecordIssue, Tournament, TournamentFeed, value_kind,
};

/// Parses a flat league feed: a JSON array of cards, or an object with a `rows` array.
///
/// Malformed cards are skipped and reported; only a wrong top-level shape is an error.
pub fn parse_flat_feed_json(raw: &str) -> Result<Parsed<Vec<MatchCard>>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid flat feed json")?;
    let rows = match root {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("rows") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(anyhow!("flat feed object has no `rows` array")),
        },
        other => {
            return Err(anyhow!("flat feed must be an array, got {}", value_kind(&other)));
        }
    };

    let mut cards = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();
    for (idx, row) in rows.into_iter().enumerate() {
        match decode_record::<MatchCard>(row) {
            Ok(card) => cards.push(card),
            Err(reason) => issues.push(RecordIssue {
                location: format!("cards[{idx}]"),
                reason,
            }),
        }
    }

    Ok(Parsed {
        value: cards,
        issues,
    })
}

/// Parses the grouped soccer document. A missing or non-array `tournaments`
/// fails the whole document.
pub fn parse_grouped_feed_json(raw: &str) -> Result<Parsed<TournamentFeed>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid grouped feed json")?;
    let mut root = match root {
        Value::Object(map) => map,
        other => {
            return Err(anyhow!(
                "grouped feed must be an object, got {}",
                value_kind(&other)
            ));
        }
    };

    let tournaments_raw = match root.remove("tournaments") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(anyhow!(
                "`tournaments` must be an array, got {}",
                value_kind(&other)
            ));
        }
        None => return Err(anyhow!("grouped feed has no `tournaments`")),
    };

    let mut issues = Vec::new();
    let updated_at = match root.remove("updated_at") {
        Some(Value::String(s)) => s,
        _ => {
            issues.push(RecordIssue {
                location: "updated_at".to_string(),
                reason: "missing or not a string".to_string(),
            });
            String::new()
        }
    };

    let mut tournaments = Vec::with_capacity(tournaments_raw.len());
    for (t_idx, raw_tournament) in tournaments_raw.into_iter().enumerate() {
        let name = raw_tournament
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        let (Some(name), Value::Object(mut fields)) = (name, raw_tournament) else {
            issues.push(RecordIssue {
                location: format!("tournaments[{t_idx}]"),
                reason: "tournament name missing or not a string".to_string(),
            });
            continue;
        };

        let matches_raw = match fields.remove("matches") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                issues.push(RecordIssue {
                    location: format!("tournaments[{t_idx}].matches"),
                    reason: format!("expected an array, got {}", value_kind(&other)),
                });
                Vec::new()
            }
        };

        let mut matches = Vec::with_capacity(matches_raw.len());
        for (m_idx, raw_match) in matches_raw.into_iter().enumerate() {
            match decode_record::<GroupedMatch>(raw_match) {
                Ok(m) => matches.push(m),
                Err(reason) => issues.push(RecordIssue {
                    location: format!("tournaments[{t_idx}].matches[{m_idx}]"),
                    reason,
                }),
            }
        }

        tournaments.push(Tournament { name, matches });
    }

    Ok(Parsed {
        value: TournamentFeed {
            updated_at,
            tournaments,
        },
        issues,
    })
}

fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    if !value.is_object() {
        return Err(format!("expected an object, got {}", value_kind(&value)));
    }
    serde_json::from_value(value).map_err(|err| err.to_string())
}

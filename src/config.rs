use std::env;
use std::path::PathBuf;

use chrono::FixedOffset;

use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::loader::DisplayZone;
use crate::page::LeagueSlot;

const DEFAULT_FEED_ROOT: &str = ".";
const DEFAULT_OUTPUT: &str = "index.html";
const DEFAULT_TITLE: &str = "Arb Cards";
const DEFAULT_LEAGUES: &str = "afcon:afcon-cards,epl:epl-cards";

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_root: String,
    pub output: PathBuf,
    pub title: String,
    pub leagues: Vec<LeagueSlot>,
    pub timeout_secs: u64,
    pub fetch_parallelism: usize,
    pub display_zone: DisplayZone,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(opt_env)
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let leagues = lookup("ARB_FLAT_LEAGUES")
            .map(|raw| parse_league_slots(&raw))
            .filter(|slots| !slots.is_empty())
            .unwrap_or_else(|| parse_league_slots(DEFAULT_LEAGUES));
        let display_zone = match lookup("ARB_LABEL_UTC_OFFSET") {
            Some(raw) => match parse_utc_offset(&raw) {
                Some(offset) => DisplayZone::Fixed(offset),
                None => {
                    tracing::warn!(value = %raw, "ignoring invalid ARB_LABEL_UTC_OFFSET");
                    DisplayZone::Local
                }
            },
            None => DisplayZone::Local,
        };

        Self {
            feed_root: lookup("ARB_FEED_ROOT").unwrap_or_else(|| DEFAULT_FEED_ROOT.to_string()),
            output: lookup("ARB_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            title: lookup("ARB_PAGE_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            leagues,
            timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
                .max(1),
            fetch_parallelism: lookup("FETCH_PARALLELISM")
                .and_then(|val| val.trim().parse::<usize>().ok())
                .unwrap_or(4)
                .clamp(1, 16),
            display_zone,
        }
    }

    /// `--feeds <root>` / `--feeds=<root>` and `--out <path>` / `--out=<path>`.
    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(root) = arg_value(args, "--feeds") {
            self.feed_root = root;
        }
        if let Some(out) = arg_value(args, "--out") {
            self.output = PathBuf::from(out);
        }
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}

/// `afcon:afcon-cards,epl` -> afcon into `afcon-cards`, epl into `epl-cards`.
pub fn parse_league_slots(raw: &str) -> Vec<LeagueSlot> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let (league, container) = match entry.split_once(':') {
                Some((league, container)) => (league.trim(), container.trim()),
                None => (entry, ""),
            };
            if league.is_empty() {
                return None;
            }
            let container_id = if container.is_empty() {
                format!("{league}-cards")
            } else {
                container.to_string()
            };
            Some(LeagueSlot {
                league: league.to_string(),
                container_id,
            })
        })
        .collect()
}

/// Accepts `Z`, `UTC`, `+01:00`, `-0530` and `+3`.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

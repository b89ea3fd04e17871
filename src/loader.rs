use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::cards::{MatchCard, Parsed, RecordIssue, TournamentFeed};
use crate::feed_parse::{parse_flat_feed_json, parse_grouped_feed_json};
use crate::feed_source::{FeedSource, GROUPED_FEED_PATH, flat_feed_path};
use crate::page::Element;
use crate::render::{flat_cards, tournament_sections};

pub const SOCCER_LOADING_TEXT: &str = "Loading soccer cards...";
pub const SOCCER_FAILED_TEXT: &str = "Failed to load soccer data.";

pub fn flat_failed_text(league: &str) -> String {
    format!("Failed to load {league} data.")
}

#[derive(Debug)]
pub enum LoadError {
    /// Transport, HTTP status or IO failure.
    Fetch { path: String, source: anyhow::Error },
    /// Body is not JSON or has the wrong top-level shape.
    Decode { path: String, source: anyhow::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch { path, source } => write!(f, "fetch {path} failed: {source:#}"),
            LoadError::Decode { path, source } => write!(f, "decode {path} failed: {source:#}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch { source, .. } | LoadError::Decode { source, .. } => {
                let inner: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(inner)
            }
        }
    }
}

/// `Loading` is what a container shows between the placeholder and `apply`;
/// reports always end in `Rendered` or `Failed`. An untouched container is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Rendered,
    Failed,
}

/// What one loader invocation did to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub feed: String,
    pub state: LoadState,
    pub sections: usize,
    pub cards: usize,
    pub issues: Vec<RecordIssue>,
    pub error: Option<String>,
}

impl LoadReport {
    fn rendered(feed: &str, sections: usize, cards: usize, issues: Vec<RecordIssue>) -> Self {
        Self {
            feed: feed.to_string(),
            state: LoadState::Rendered,
            sections,
            cards,
            issues,
            error: None,
        }
    }

    fn failed(feed: &str, err: &LoadError) -> Self {
        Self {
            feed: feed.to_string(),
            state: LoadState::Failed,
            sections: 0,
            cards: 0,
            issues: Vec::new(),
            error: Some(err.to_string()),
        }
    }
}

pub trait Clock: Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Time zone used for the grouped feed's freshness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

/// `Mon, 15 Jan 2024 10:00:00 GMT`
pub fn format_render_time(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

impl DisplayZone {
    fn localize(self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            DisplayZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            DisplayZone::Fixed(offset) => offset.from_local_datetime(&naive).single(),
        }
    }
}

/// ISO-8601 forms seen in feeds. Timestamps without an offset are wall-clock
/// time in the display zone; a bare date is midnight UTC.
fn parse_feed_timestamp(raw: &str, zone: DisplayZone) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return zone.localize(naive);
        }
    }
    let midnight = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).fixed_offset())
}

/// `Updated: 1/15/2024, 10:00:00 AM` for the feed's own timestamp.
///
/// Unparsable values are shown verbatim.
pub fn format_updated_label(updated_at: &str, zone: DisplayZone) -> String {
    const PATTERN: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

    let raw = updated_at.trim();
    if raw.is_empty() {
        return "Updated: unknown".to_string();
    }
    let Some(parsed) = parse_feed_timestamp(raw, zone) else {
        tracing::warn!(updated_at = raw, "feed timestamp is not ISO 8601");
        return format!("Updated: {raw}");
    };
    let shown = match zone {
        DisplayZone::Local => parsed.with_timezone(&Local).format(PATTERN).to_string(),
        DisplayZone::Fixed(offset) => parsed.with_timezone(&offset).format(PATTERN).to_string(),
    };
    format!("Updated: {shown}")
}

pub type FlatFetch = Result<Parsed<Vec<MatchCard>>, LoadError>;
pub type GroupedFetch = Result<Parsed<TournamentFeed>, LoadError>;

/// Renders a flat league feed into its container and stamps the shared label.
pub struct FlatLoader<'a> {
    source: &'a dyn FeedSource,
    clock: &'a dyn Clock,
}

impl<'a> FlatLoader<'a> {
    pub fn new(source: &'a dyn FeedSource, clock: &'a dyn Clock) -> Self {
        Self { source, clock }
    }

    pub fn load(&self, league: &str, container: &mut Element, label: &mut Element) -> LoadReport {
        let fetched = self.fetch(league);
        self.apply(league, fetched, container, label)
    }

    pub fn fetch(&self, league: &str) -> FlatFetch {
        let path = flat_feed_path(league).map_err(|source| LoadError::Fetch {
            path: league.to_string(),
            source,
        })?;
        let body = self
            .source
            .fetch_text(&path)
            .map_err(|source| LoadError::Fetch {
                path: path.clone(),
                source,
            })?;
        parse_flat_feed_json(&body).map_err(|source| LoadError::Decode { path, source })
    }

    /// Appends cards (earlier content is kept) or replaces the container with
    /// the failure message.
    pub fn apply(
        &self,
        league: &str,
        fetched: FlatFetch,
        container: &mut Element,
        label: &mut Element,
    ) -> LoadReport {
        let parsed = match fetched {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::error!(league, error = %err, "flat feed load failed");
                container.set_text(flat_failed_text(league));
                return LoadReport::failed(league, &err);
            }
        };

        for issue in &parsed.issues {
            tracing::warn!(league, %issue, "skipped malformed card");
        }
        let cards = flat_cards(&parsed.value);
        let count = cards.len();
        for card in cards {
            container.append(card);
        }
        label.set_text(format_render_time(self.clock.now()));
        tracing::info!(league, cards = count, "flat feed rendered");

        LoadReport::rendered(league, 0, count, parsed.issues)
    }
}

/// Renders the grouped soccer feed as tournament sections.
pub struct GroupedLoader<'a> {
    source: &'a dyn FeedSource,
    zone: DisplayZone,
}

impl<'a> GroupedLoader<'a> {
    pub fn new(source: &'a dyn FeedSource, zone: DisplayZone) -> Self {
        Self { source, zone }
    }

    pub fn load(&self, container: &mut Element, label: &mut Element) -> LoadReport {
        Self::show_placeholder(container);
        let fetched = self.fetch();
        self.apply(fetched, container, label)
    }

    pub fn show_placeholder(container: &mut Element) -> LoadState {
        container.set_text(SOCCER_LOADING_TEXT);
        LoadState::Loading
    }

    pub fn fetch(&self) -> GroupedFetch {
        let path = GROUPED_FEED_PATH.to_string();
        let body = self
            .source
            .fetch_text(&path)
            .map_err(|source| LoadError::Fetch {
                path: path.clone(),
                source,
            })?;
        parse_grouped_feed_json(&body).map_err(|source| LoadError::Decode { path, source })
    }

    /// Replaces the container content with the sections, or with the failure
    /// message. Sections are built off-page, so a failure never leaves a
    /// partial tree behind.
    pub fn apply(
        &self,
        fetched: GroupedFetch,
        container: &mut Element,
        label: &mut Element,
    ) -> LoadReport {
        let parsed = match fetched {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::error!(error = %err, "soccer feed load failed");
                container.set_text(SOCCER_FAILED_TEXT);
                return LoadReport::failed(GROUPED_FEED_PATH, &err);
            }
        };

        for issue in &parsed.issues {
            tracing::warn!(%issue, "skipped malformed soccer record");
        }
        let feed = parsed.value;
        label.set_text(format_updated_label(&feed.updated_at, self.zone));

        let sections = tournament_sections(&feed.tournaments);
        container.clear();
        for section in sections {
            container.append(section);
        }

        let cards = feed.match_count();
        tracing::info!(
            tournaments = feed.tournaments.len(),
            cards,
            "soccer feed rendered"
        );
        LoadReport::rendered(GROUPED_FEED_PATH, feed.tournaments.len(), cards, parsed.issues)
    }
}

use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use arb_cards::config::Config;
use arb_cards::feed_source::DirFeedSource;
use arb_cards::loader::{FixedClock, LoadState};
use arb_cards::page_build::{build_page, write_page};

fn site_root() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("site");
    path
}

fn config(leagues: &str) -> Config {
    let leagues = leagues.to_string();
    Config::from_lookup(move |key| match key {
        "ARB_FLAT_LEAGUES" => Some(leagues.clone()),
        "ARB_LABEL_UTC_OFFSET" => Some("Z".to_string()),
        "FETCH_PARALLELISM" => Some("2".to_string()),
        _ => None,
    })
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, 7, 5, 9).unwrap())
}

#[test]
fn builds_page_from_fixture_site() {
    let source = DirFeedSource::new(site_root());
    let (page, reports) = build_page(&config("afcon,epl"), &source, &clock());

    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.state == LoadState::Rendered));
    assert_eq!(reports[0].sections, 2);
    assert_eq!(reports[0].cards, 4);
    assert_eq!(reports[0].issues.len(), 1);
    assert_eq!(reports[1].cards, 3);
    assert_eq!(reports[2].cards, 1);
    assert_eq!(reports[2].issues.len(), 1);

    assert_eq!(
        page.soccer_updated.text_content(),
        "Updated: 1/15/2024, 10:00:00 AM"
    );
    assert_eq!(page.flat_updated.text_content(), "Tue, 16 Jan 2024 07:05:09 GMT");
    assert_eq!(page.soccer_container.find_by_class("arb-locked").len(), 2);
    assert_eq!(page.soccer_container.find_by_class("arb-free").len(), 2);
    assert_eq!(page.league("afcon").unwrap().find_by_class("card").len(), 3);
    assert_eq!(page.league("epl").unwrap().find_by_class("card").len(), 1);
}

#[test]
fn missing_league_feed_fails_alone() {
    let source = DirFeedSource::new(site_root());
    let (page, reports) = build_page(&config("afcon,laliga"), &source, &clock());

    assert_eq!(reports[0].state, LoadState::Rendered);
    assert_eq!(reports[1].state, LoadState::Rendered);
    assert_eq!(reports[2].state, LoadState::Failed);
    assert_eq!(
        page.league("laliga").unwrap().text_content(),
        "Failed to load laliga data."
    );
    assert_eq!(page.league("afcon").unwrap().find_by_class("card").len(), 3);
}

#[test]
fn missing_feed_root_fails_every_loader() {
    let source = DirFeedSource::new(site_root().join("does-not-exist"));
    let (page, reports) = build_page(&config("afcon"), &source, &clock());

    assert!(reports.iter().all(|r| r.state == LoadState::Failed));
    assert_eq!(
        page.soccer_container.text_content(),
        "Failed to load soccer data."
    );
    assert_eq!(page.flat_updated.text_content(), "");
}

#[test]
fn written_page_contains_rendered_cards() {
    let source = DirFeedSource::new(site_root());
    let (page, _) = build_page(&config("afcon"), &source, &clock());

    let out_dir = std::env::temp_dir().join(format!("arb_cards_test_{}", std::process::id()));
    let out = out_dir.join("index.html");
    write_page(&out, &page).expect("page should be written");
    let html = fs::read_to_string(&out).expect("page should be readable");
    let _ = fs::remove_dir_all(&out_dir);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<div id=\"soccer-container\">"));
    assert!(html.contains("<h3>AFCON 2025</h3>"));
    assert!(html.contains("<p class=\"high\">Confidence: High</p>"));
    assert!(html.contains("🔒 ArbGraph &amp; ArbStats (Premium)"));
    assert!(html.contains("<div class=\"arb-free\">Free insight</div>"));
}

#[test]
fn failed_swap_leaves_no_temp_file() {
    let source = DirFeedSource::new(site_root());
    let (page, _) = build_page(&config("afcon"), &source, &clock());

    let out_dir =
        std::env::temp_dir().join(format!("arb_cards_swap_test_{}", std::process::id()));
    let out = out_dir.join("index.html");
    // A non-empty directory where the page should go makes the rename fail.
    fs::create_dir_all(&out).expect("create blocking dir");
    fs::write(out.join("keep"), "x").expect("fill blocking dir");

    let result = write_page(&out, &page);
    let tmp_left = out_dir.join("index.html.tmp").exists();
    let _ = fs::remove_dir_all(&out_dir);

    assert!(result.is_err());
    assert!(!tmp_left);
}

use std::fs;
use std::path::PathBuf;

use arb_cards::cards::ArbScore;
use arb_cards::feed_parse::{parse_flat_feed_json, parse_grouped_feed_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_flat_array_fixture() {
    let raw = read_fixture("site/data/afcon.json");
    let parsed = parse_flat_feed_json(&raw).expect("fixture should parse");
    assert!(parsed.issues.is_empty());
    assert_eq!(parsed.value.len(), 3);
    assert_eq!(parsed.value[0].match_label, "Morocco vs Egypt");
    assert_eq!(parsed.value[1].arb_score, ArbScore::Text("78.5".to_string()));
    assert_eq!(parsed.value[2].arb_score.to_string(), "61.25");
    assert_eq!(parsed.value[2].confidence.style_class(), "low");
}

#[test]
fn parses_flat_rows_envelope_and_skips_bad_card() {
    let raw = read_fixture("site/data/epl.json");
    let parsed = parse_flat_feed_json(&raw).expect("fixture should parse");
    assert_eq!(parsed.value.len(), 1);
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].location, "cards[1]");
    assert_eq!(parsed.issues[0].reason, "missing field `arb_score`");
}

#[test]
fn flat_feed_rejects_wrong_top_level_shape() {
    assert!(parse_flat_feed_json(r#"{"cards": []}"#).is_err());
    assert!(parse_flat_feed_json("42").is_err());
    assert!(parse_flat_feed_json("<html>").is_err());
    assert!(parse_flat_feed_json("").is_err());
}

#[test]
fn empty_flat_feed_is_empty() {
    let parsed = parse_flat_feed_json("[]").expect("empty array should parse");
    assert!(parsed.value.is_empty());
    assert!(parsed.issues.is_empty());
}

#[test]
fn parses_grouped_fixture_in_feed_order() {
    let raw = read_fixture("site/data/sports/soccer.json");
    let parsed = parse_grouped_feed_json(&raw).expect("fixture should parse");
    let feed = parsed.value;
    assert_eq!(feed.updated_at, "2024-01-15T10:00:00Z");
    let names: Vec<_> = feed.tournaments.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["AFCON 2025", "Premier League"]);
    assert_eq!(feed.tournaments[0].matches.len(), 2);
    assert!(feed.tournaments[0].matches[0].premium);
    assert!(!feed.tournaments[0].matches[1].premium);

    // "premium": "yes" is not a boolean, so that match is skipped.
    assert_eq!(feed.tournaments[1].matches.len(), 2);
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].location, "tournaments[1].matches[2]");
    assert_eq!(feed.match_count(), 4);
}

#[test]
fn grouped_malformed_records_are_reported_not_fatal() {
    let raw = read_fixture("soccer_malformed.json");
    let parsed = parse_grouped_feed_json(&raw).expect("fixture should parse");
    let feed = parsed.value;

    let names: Vec<_> = feed.tournaments.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Serie A", "Ligue 1"]);
    assert_eq!(feed.tournaments[0].matches.len(), 1);
    assert_eq!(feed.tournaments[0].matches[0].match_label, "Inter vs Milan");
    assert!(!feed.tournaments[0].matches[0].premium);
    assert!(feed.tournaments[1].matches.is_empty());

    let locations: Vec<_> = parsed.issues.iter().map(|i| i.location.as_str()).collect();
    assert_eq!(
        locations,
        [
            "tournaments[0]",
            "tournaments[1].matches[0]",
            "tournaments[1].matches[1]"
        ]
    );
}

#[test]
fn grouped_feed_rejects_wrong_top_level_shape() {
    assert!(parse_grouped_feed_json("[]").is_err());
    assert!(parse_grouped_feed_json("null").is_err());
    assert!(parse_grouped_feed_json(r#"{"updated_at": "x", "tournaments": {}}"#).is_err());
}

#[test]
fn grouped_feed_without_tournaments_is_an_error() {
    for raw in [
        "{}",
        r#"{"updated_at": "2024-01-15T10:00:00Z"}"#,
        r#"{"updated_at": "2024-01-15T10:00:00Z", "tournaments": null}"#,
        r#"{"error": "feed not generated"}"#,
    ] {
        assert!(parse_grouped_feed_json(raw).is_err(), "{raw} should fail");
    }
}

#[test]
fn arb_score_numbers_keep_their_source_text() {
    let raw = r#"[
        {"rank": 1, "match": "A vs B", "arb_score": 85.0, "confidence": "High", "best_edge": "x"},
        {"rank": 2, "match": "C vs D", "arb_score": 87.50, "confidence": "High", "best_edge": "x"},
        {"rank": 3, "match": "E vs F", "arb_score": 1e2, "confidence": "High", "best_edge": "x"},
        {"rank": 4, "match": "G vs H", "arb_score": 91, "confidence": "High", "best_edge": "x"}
    ]"#;
    let parsed = parse_flat_feed_json(raw).expect("feed should parse");
    let scores: Vec<_> = parsed.value.iter().map(|c| c.arb_score.to_string()).collect();
    assert_eq!(scores, ["85.0", "87.50", "1e2", "91"]);
}

#[test]
fn grouped_feed_without_timestamp_still_parses() {
    let parsed = parse_grouped_feed_json(r#"{"tournaments": []}"#).expect("should parse");
    assert_eq!(parsed.value.updated_at, "");
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].location, "updated_at");
}

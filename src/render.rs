//! Pure projection from validated feed records to element trees.

use crate::cards::{GroupedMatch, MatchCard, Tournament};
use crate::page::Element;

pub const LOCKED_TEXT: &str = "🔒 ArbGraph & ArbStats (Premium)";
pub const FREE_TEXT: &str = "Free insight";

/// Card for a flat league feed.
pub fn flat_card(card: &MatchCard) -> Element {
    Element::new("div")
        .with_class("card")
        .with_child(
            Element::new("div")
                .with_class("rank")
                .with_text(format!("Rank #{}", card.rank)),
        )
        .with_child(
            Element::new("div")
                .with_class("score")
                .with_text(card.match_label.clone()),
        )
        .with_child(
            Element::new("p")
                .with_text("Arb Score: ")
                .with_child(Element::new("strong").with_text(card.arb_score.to_string())),
        )
        .with_child(
            Element::new("p")
                .with_class(card.confidence.style_class())
                .with_text(format!("Confidence: {}", card.confidence)),
        )
        .with_child(Element::new("p").with_text(format!("Best Edge: {}", card.best_edge)))
}

pub fn flat_cards(cards: &[MatchCard]) -> Vec<Element> {
    cards.iter().map(flat_card).collect()
}

/// Locked block for premium matches, free-tier block otherwise.
pub fn premium_block(premium: bool) -> Element {
    if premium {
        Element::new("div").with_class("arb-locked").with_text(LOCKED_TEXT)
    } else {
        Element::new("div").with_class("arb-free").with_text(FREE_TEXT)
    }
}

pub fn grouped_card(m: &GroupedMatch) -> Element {
    Element::new("div")
        .with_class("arb-card")
        .with_child(
            Element::new("div")
                .with_class("arb-rank")
                .with_text(format!("#{}", m.rank)),
        )
        .with_child(
            Element::new("div")
                .with_class("arb-match")
                .with_text(m.match_label.clone()),
        )
        .with_child(
            Element::new("div")
                .with_class("arb-score")
                .with_text(format!("ArbScore: {}", m.arb_score)),
        )
        .with_child(
            Element::new("div")
                .with_class("arb-edge")
                .with_text(m.best_edge.clone()),
        )
        .with_child(
            Element::new("div")
                .with_class("arb-confidence")
                .with_text(m.confidence.to_string()),
        )
        .with_child(premium_block(m.premium))
}

pub fn tournament_section(tournament: &Tournament) -> Element {
    let mut cards = Element::new("div").with_class("cards");
    for m in &tournament.matches {
        cards.append(grouped_card(m));
    }
    Element::new("div")
        .with_class("tournament-section")
        .with_child(Element::new("h3").with_text(tournament.name.clone()))
        .with_child(cards)
}

pub fn tournament_sections(tournaments: &[Tournament]) -> Vec<Element> {
    tournaments.iter().map(tournament_section).collect()
}

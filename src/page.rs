//! Minimal element tree standing in for the host page.
//!
//! Loaders never look anything up by id: they receive `&mut Element` handles
//! for the container and label they write to. `Page` owns those handles as
//! separate fields so several can be borrowed at once.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub class: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            class: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn append(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::Text(text.into()));
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class
            .as_deref()
            .is_some_and(|c| c.split_whitespace().any(|part| part == class))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Descendants carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_by_class(self, class, &mut found);
        found
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape_attr(id));
        }
        if let Some(class) = &self.class {
            let _ = write!(out, " class=\"{}\"", escape_attr(class));
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_html(out),
                Node::Text(text) => out.push_str(&escape_text(text)),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

fn collect_by_class<'a>(el: &'a Element, class: &str, found: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.has_class(class) {
            found.push(child);
        }
        collect_by_class(child, class, found);
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Element(inner) => collect_text(inner, out),
            Node::Text(text) => out.push_str(text),
        }
    }
}

pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}

pub const SOCCER_CONTAINER_ID: &str = "soccer-container";
pub const SOCCER_UPDATED_ID: &str = "last-updated";
pub const FLAT_UPDATED_ID: &str = "lastUpdated";

/// A flat-feed league and the container its cards land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSlot {
    pub league: String,
    pub container_id: String,
}

#[derive(Debug, Clone)]
pub struct LeagueSection {
    pub league: String,
    pub container: Element,
}

/// The host page: every anchor point the loaders write to.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub soccer_container: Element,
    pub soccer_updated: Element,
    pub leagues: Vec<LeagueSection>,
    pub flat_updated: Element,
}

impl Page {
    pub fn new(title: impl Into<String>, slots: &[LeagueSlot]) -> Self {
        let leagues = slots
            .iter()
            .map(|slot| LeagueSection {
                league: slot.league.clone(),
                container: Element::new("div")
                    .with_id(slot.container_id.clone())
                    .with_class("cards"),
            })
            .collect();
        Self {
            title: title.into(),
            soccer_container: Element::new("div").with_id(SOCCER_CONTAINER_ID),
            soccer_updated: Element::new("p").with_id(SOCCER_UPDATED_ID),
            leagues,
            flat_updated: Element::new("span").with_id(FLAT_UPDATED_ID),
        }
    }

    pub fn league_mut(&mut self, league: &str) -> Option<&mut Element> {
        self.leagues
            .iter_mut()
            .find(|section| section.league == league)
            .map(|section| &mut section.container)
    }

    pub fn league(&self, league: &str) -> Option<&Element> {
        self.leagues
            .iter()
            .find(|section| section.league == league)
            .map(|section| &section.container)
    }

    pub fn to_html(&self) -> String {
        let mut body = Element::new("body")
            .with_child(Element::new("h1").with_text(self.title.clone()))
            .with_child(
                Element::new("section")
                    .with_class("soccer")
                    .with_child(Element::new("h2").with_text("Soccer"))
                    .with_child(self.soccer_updated.clone())
                    .with_child(self.soccer_container.clone()),
            );
        for section in &self.leagues {
            body.append(
                Element::new("section")
                    .with_class("league")
                    .with_child(Element::new("h2").with_text(section.league.to_uppercase()))
                    .with_child(section.container.clone()),
            );
        }
        body.append(
            Element::new("footer")
                .with_text("Last updated: ")
                .with_child(self.flat_updated.clone()),
        );

        let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape_text(&self.title));
        out.push_str("<link rel=\"stylesheet\" href=\"style.css\">\n</head>\n");
        body.write_html(&mut out);
        out.push_str("\n</html>\n");
        out
    }
}

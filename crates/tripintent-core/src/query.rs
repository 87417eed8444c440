// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::alias::AliasRecord;
use crate::catalog::CatalogItem;
use crate::category::{detect_category, Category};
use crate::index::IntentIndex;
use crate::location::{LocationLevel, MyLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phrases that ask for results around the user rather than a named place.
pub const NEAR_ME_PHRASES: &[&str] = &["near me", "around me", "close by", "nearby"];

/// The word splitting "what" from "where" in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    In,
    Near,
    Around,
    At,
}

impl Connector {
    pub const ALL: [Connector; 4] = [
        Connector::In,
        Connector::Near,
        Connector::Around,
        Connector::At,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Connector::In => "in",
            Connector::Near => "near",
            Connector::Around => "around",
            Connector::At => "at",
        }
    }

    fn needle(self) -> &'static str {
        match self {
            Connector::In => " in ",
            Connector::Near => " near ",
            Connector::Around => " around ",
            Connector::At => " at ",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub category: Option<Category>,
    pub location: LocationLevel,
    pub used_connector: Option<Connector>,
}

impl ParsedIntent {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.location.is_none()
    }
}

/// Inputs for a one-shot parse.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub catalog: &'a [CatalogItem],
    pub my_location: Option<&'a MyLocation>,
    pub enable_aliases: bool,
    pub custom_aliases: &'a [AliasRecord],
}

impl<'a> SearchContext<'a> {
    /// Smart aliases on, no custom aliases, no "my location".
    pub fn new(catalog: &'a [CatalogItem]) -> Self {
        Self {
            catalog,
            my_location: None,
            enable_aliases: true,
            custom_aliases: &[],
        }
    }

    pub fn with_my_location(mut self, my_location: &'a MyLocation) -> Self {
        self.my_location = Some(my_location);
        self
    }

    pub fn with_aliases(mut self, enabled: bool) -> Self {
        self.enable_aliases = enabled;
        self
    }

    pub fn with_custom_aliases(mut self, custom: &'a [AliasRecord]) -> Self {
        self.custom_aliases = custom;
        self
    }
}

/// A query split at its last connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments<'t> {
    pub left: &'t str,
    pub right: &'t str,
    pub connector: Option<Connector>,
}

/// Splits at the last " in " / " near " / " around " / " at ".
///
/// Without a connector both halves are the whole text, so the location goes
/// through token resolution first: its alias scan takes the first key in table
/// order, not the longest. The longest-match scan only runs when that finds nothing.
pub fn split_on_connector(text: &str) -> Segments<'_> {
    // ASCII folding keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let last = Connector::ALL
        .into_iter()
        .filter_map(|c| lower.rfind(c.needle()).map(|pos| (pos, c)))
        .max_by_key(|(pos, _)| *pos);

    match last {
        Some((pos, connector)) if pos > 0 => Segments {
            left: text[..pos].trim(),
            right: text[pos + connector.needle().len()..].trim(),
            connector: Some(connector),
        },
        _ => Segments {
            left: text,
            right: text,
            connector: None,
        },
    }
}

pub fn is_near_me(text: &str) -> bool {
    let t = text.to_lowercase();
    NEAR_ME_PHRASES.iter().any(|p| t.contains(p))
}

impl IntentIndex<'_> {
    /// Category from the text before the connector, location from the text after it.
    pub fn parse(&self, text: &str, my_location: Option<&MyLocation>) -> ParsedIntent {
        let text = text.trim();
        if text.is_empty() {
            return ParsedIntent::default();
        }

        let segments = split_on_connector(text);
        let category = detect_category(if segments.left.is_empty() {
            text
        } else {
            segments.left
        });

        if is_near_me(text) {
            let mine = my_location.map(MyLocation::preferred).unwrap_or_default();
            if mine.is_resolved() {
                log::debug!("[Intent] {:?} -> near me ({})", text, mine);
                return ParsedIntent {
                    category,
                    location: mine,
                    used_connector: Some(segments.connector.unwrap_or(Connector::Near)),
                };
            }
        }

        let mut location = self.resolve(segments.right);
        if location.is_none() {
            location = self.longest_match(text);
        }

        ParsedIntent {
            category,
            location,
            used_connector: segments.connector,
        }
    }
}

/// One-shot parse. Rebuilds the gazetteer and alias table; hold an
/// [`IntentIndex`] instead when parsing on every keystroke.
pub fn parse_query(text: &str, ctx: &SearchContext<'_>) -> ParsedIntent {
    if text.trim().is_empty() {
        return ParsedIntent::default();
    }
    IntentIndex::from_context(ctx).parse(text, ctx.my_location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("Lodging").in_place("Durban", "KwaZulu-Natal", "South Africa", "Africa"),
            CatalogItem::new("Dining").in_place("Umhlanga", "KwaZulu-Natal", "South Africa", "Africa"),
        ]
    }

    #[test]
    fn test_split_last_connector_wins() {
        let s = split_on_connector("Tours in Durban near the beach");
        assert_eq!(s.connector, Some(Connector::Near));
        assert_eq!(s.left, "Tours in Durban");
        assert_eq!(s.right, "the beach");

        let s = split_on_connector("Dining AT Umhlanga");
        assert_eq!(s.connector, Some(Connector::At));
        assert_eq!(s.right, "Umhlanga");
    }

    #[test]
    fn test_split_without_connector() {
        let s = split_on_connector("Hotels Durban");
        assert_eq!(s.connector, None);
        assert_eq!(s.left, "Hotels Durban");
        assert_eq!(s.right, "Hotels Durban");
        // Needs surrounding spaces: "inn" and "Margate" are not connectors.
        assert_eq!(split_on_connector("inn Margate").connector, None);
    }

    #[test]
    fn test_no_connector_takes_first_alias_hit() {
        let catalog = vec![CatalogItem::new("Lodging").with_area("Klein Karoo")];
        let ctx = SearchContext::new(&catalog);
        // "karoo" is listed before "klein karoo", and the whole text is scanned.
        assert_eq!(
            parse_query("Hotels Klein Karoo", &ctx).location,
            LocationLevel::Area("Karoo".to_string())
        );
        assert_eq!(
            parse_query("Hotels in Klein Karoo", &ctx).location,
            LocationLevel::Area("Klein Karoo".to_string())
        );
    }

    #[test]
    fn test_near_me_phrases() {
        assert!(is_near_me("Coffee NEARBY"));
        assert!(is_near_me("food close by"));
        assert!(!is_near_me("near Durban"));
    }

    #[test]
    fn test_blank_query() {
        let catalog = catalog();
        let parsed = parse_query("   ", &SearchContext::new(&catalog));
        assert!(parsed.is_empty());
        assert_eq!(parsed.used_connector, None);
    }

    #[test]
    fn test_parse_with_connector() {
        let catalog = catalog();
        let parsed = parse_query("Dining in Umhlanga", &SearchContext::new(&catalog));
        assert_eq!(parsed.category, Some(Category::Dining));
        assert_eq!(parsed.location, LocationLevel::City("Umhlanga".to_string()));
        assert_eq!(parsed.used_connector, Some(Connector::In));
    }

    #[test]
    fn test_near_me_without_location_falls_through() {
        let catalog = catalog();
        let parsed = parse_query("hotels near me", &SearchContext::new(&catalog));
        assert_eq!(parsed.category, Some(Category::Lodging));
        assert!(parsed.location.is_none());
        assert_eq!(parsed.used_connector, Some(Connector::Near));
    }

    #[test]
    fn test_near_me_uses_preferred_level() {
        let catalog = catalog();
        let mine = MyLocation {
            province: Some("Gauteng".to_string()),
            country: Some("South Africa".to_string()),
            ..MyLocation::default()
        };
        let parsed = parse_query(
            "coffee nearby",
            &SearchContext::new(&catalog).with_my_location(&mine),
        );
        assert_eq!(parsed.category, Some(Category::Dining));
        assert_eq!(parsed.location, LocationLevel::Province("Gauteng".to_string()));
        assert_eq!(parsed.used_connector, Some(Connector::Near));
    }

    #[test]
    fn test_serialized_shape() {
        let parsed = ParsedIntent {
            category: Some(Category::Tour),
            location: LocationLevel::Area("Bo-Kaap".to_string()),
            used_connector: Some(Connector::Around),
        };
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": "Tour",
                "location": {"area": "Bo-Kaap"},
                "used_connector": "around"
            })
        );
    }
}

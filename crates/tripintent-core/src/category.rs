use crate::IntentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Lodging,
    Dining,
    Activity,
    Tour,
    Transport,
    Experience,
}

/// Keyword table in match order. The first category with any keyword inside
/// the text wins, so earlier rows take ambiguous queries ("guided hike" is an
/// Activity, not a Tour).
pub const CATEGORY_SYNONYMS: &[(Category, &[&str])] = &[
    (
        Category::Lodging,
        &[
            "hotel",
            "hotels",
            "lodging",
            "stay",
            "accommodation",
            "accomodation",
            "guesthouse",
            "guest house",
            "bnb",
            "b&b",
            "b and b",
            "b-and-b",
            "resort",
            "lodge",
            "lodges",
            "hostel",
            "hostels",
            "inn",
            "self-catering",
            "apartment",
            "villa",
        ],
    ),
    (
        Category::Dining,
        &[
            "food",
            "restaurant",
            "restaurants",
            "eat",
            "dining",
            "cafe",
            "cafes",
            "bar",
            "bars",
            "breakfast",
            "brunch",
            "lunch",
            "dinner",
            "eatery",
            "coffee",
        ],
    ),
    (
        Category::Activity,
        &[
            "things to do",
            "activities",
            "activity",
            "adventure",
            "attraction",
            "attractions",
            "what to do",
            "sightseeing",
            "hike",
            "hiking",
            "walk",
            "walking",
        ],
    ),
    (
        Category::Tour,
        &[
            "tour",
            "tours",
            "safari",
            "safaris",
            "guided tour",
            "day tour",
            "multi-day tour",
            "day trip",
            "daytrip",
            "trip",
            "guided",
        ],
    ),
    (
        Category::Transport,
        &[
            "transport",
            "transfer",
            "transfers",
            "shuttle",
            "car hire",
            "car rental",
            "taxi",
            "bus",
            "ride",
            "pickup",
            "dropoff",
            "airport transfer",
            "airport shuttle",
        ],
    ),
    (
        Category::Experience,
        &[
            "experience",
            "experiences",
            "workshop",
            "workshops",
            "class",
            "classes",
            "lesson",
            "lessons",
            "course",
            "courses",
        ],
    ),
];

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Lodging,
        Category::Dining,
        Category::Activity,
        Category::Tour,
        Category::Transport,
        Category::Experience,
    ];

    /// The tag stored in `CatalogItem::category`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Lodging => "Lodging",
            Category::Dining => "Dining",
            Category::Activity => "Activity",
            Category::Tour => "Tour",
            Category::Transport => "Transport",
            Category::Experience => "Experience",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        CATEGORY_SYNONYMS
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IntentError::UnknownCategory(s.to_string()))
    }
}

/// Substring match against the synonym table; `None` when nothing hits.
pub fn detect_category(text: &str) -> Option<Category> {
    let t = text.to_lowercase();
    CATEGORY_SYNONYMS
        .iter()
        .find(|(_, keys)| keys.iter().any(|k| t.contains(k)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_basic() {
        assert_eq!(detect_category("Hotels"), Some(Category::Lodging));
        assert_eq!(detect_category("BREAKFAST spots"), Some(Category::Dining));
        assert_eq!(detect_category("Safari"), Some(Category::Tour));
        assert_eq!(detect_category("airport shuttle"), Some(Category::Transport));
        assert_eq!(detect_category("pottery workshop"), Some(Category::Experience));
        assert_eq!(detect_category("Durban"), None);
        assert_eq!(detect_category(""), None);
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        // Both Activity ("hike") and Tour ("guided") keywords present.
        assert_eq!(detect_category("guided hike"), Some(Category::Activity));
        // "hotel" and "tour" both present; Lodging is declared first.
        assert_eq!(detect_category("hotel tour"), Some(Category::Lodging));
    }

    #[test]
    fn test_substring_semantics() {
        // "inn" hides inside "dinner"; Lodging is checked first.
        assert_eq!(detect_category("dinner"), Some(Category::Lodging));
        assert_eq!(detect_category("brunch"), Some(Category::Dining));
    }

    #[test]
    fn test_round_trip_tag() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
            assert!(!c.keywords().is_empty());
        }
        assert_eq!("dining".parse::<Category>().unwrap(), Category::Dining);
        assert!("Spa".parse::<Category>().is_err());
    }
}

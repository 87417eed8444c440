use crate::catalog::CatalogItem;
use crate::category::Category;
use crate::index::IntentIndex;
use crate::location::{LocationLevel, MyLocation};
use crate::query::{is_near_me, SearchContext};
use indexmap::IndexMap;
use serde::Serialize;
use url::form_urlencoded;

/// How many cities `quick_actions` offers by default.
pub const DEFAULT_QUICK_ACTIONS: usize = 4;

/// Catalog filter: `{category?} ∪ location`, flat on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(flatten)]
    pub location: LocationLevel,
}

impl SuggestionParams {
    pub fn new(category: Option<Category>, location: LocationLevel) -> Self {
        Self { category, location }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.location.is_none()
    }

    /// Category tag equality AND exact field equality at the location's level.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.category.map_or(true, |c| item.category == c.as_str()) && self.location.matches(item)
    }

    pub fn count_in(&self, catalog: &[CatalogItem]) -> usize {
        catalog.iter().filter(|item| self.matches(item)).count()
    }

    /// Key/value pairs in wire order: category first, then the location level.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str()));
        }
        if let (Some(level), Some(value)) = (self.location.level(), self.location.value()) {
            pairs.push((level.as_str(), value));
        }
        pairs
    }

    /// `category=Dining&city=Umhlanga`
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub count: usize,
    pub params: SuggestionParams,
}

impl Suggestion {
    fn for_params(params: SuggestionParams, catalog: &[CatalogItem]) -> Self {
        let count = params.count_in(catalog);
        let mut label = String::from("Show");
        if let Some(category) = params.category {
            label.push(' ');
            label.push_str(category.as_str());
        }
        if let Some(value) = params.location.value() {
            label.push_str(" in ");
            label.push_str(value);
        }
        label.push_str(&format!(" ({count})"));
        Self {
            label,
            count,
            params,
        }
    }

    pub fn meta(&self) -> String {
        if self.count == 1 {
            "1 result".to_string()
        } else {
            format!("{} results", self.count)
        }
    }
}

impl IntentIndex<'_> {
    pub fn suggest(&self, text: &str, my_location: Option<&MyLocation>) -> Option<Suggestion> {
        let parsed = self.parse(text, my_location);
        if parsed.is_empty() {
            return None;
        }
        let params = SuggestionParams::new(parsed.category, parsed.location);
        let suggestion = Suggestion::for_params(params, self.catalog());
        log::debug!("[Intent] Suggestion for {:?}: {}", text.trim(), suggestion.label);
        Some(suggestion)
    }
}

/// One-shot suggestion; `None` when neither a category nor a location was found.
pub fn get_suggestion(text: &str, ctx: &SearchContext<'_>) -> Option<Suggestion> {
    if text.trim().is_empty() {
        return None;
    }
    IntentIndex::from_context(ctx).suggest(text, ctx.my_location)
}

/// The "near me" row shown next to a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NearMeRow {
    /// A saved location exists.
    UseMyLocation {
        label: String,
        params: SuggestionParams,
    },
    /// The query asks for "near me" but nothing is saved yet.
    SetLocation,
}

impl NearMeRow {
    pub fn label(&self) -> &str {
        match self {
            NearMeRow::UseMyLocation { label, .. } => label,
            NearMeRow::SetLocation => "Set my location…",
        }
    }

    pub fn meta(&self) -> &'static str {
        match self {
            NearMeRow::UseMyLocation { .. } => "Use my location",
            NearMeRow::SetLocation => "Enable Near me",
        }
    }
}

/// `None` for a blank query; the row accompanies a search term.
pub fn near_me_row(text: &str, my_location: Option<&MyLocation>) -> Option<NearMeRow> {
    if text.trim().is_empty() {
        return None;
    }
    let location = my_location.map(MyLocation::preferred).unwrap_or_default();
    if let Some(value) = location.value() {
        return Some(NearMeRow::UseMyLocation {
            label: format!("Near me • {value}"),
            params: SuggestionParams::new(None, location.clone()),
        });
    }
    is_near_me(text.trim()).then_some(NearMeRow::SetLocation)
}

/// "Hotels in <city>" shortcuts for the busiest cities.
///
/// Cities are ranked by item count; equal counts keep first-appearance order.
pub fn quick_actions(catalog: &[CatalogItem], limit: usize) -> Vec<Suggestion> {
    let mut by_city: IndexMap<&str, usize> = IndexMap::new();
    for item in catalog {
        let city = item.city.trim();
        if !city.is_empty() {
            *by_city.entry(city).or_insert(0) += 1;
        }
    }
    // Stable sort keeps insertion order among ties.
    by_city.sort_by(|_, a, _, b| b.cmp(a));

    by_city
        .keys()
        .take(limit)
        .map(|city| {
            let params = SuggestionParams::new(
                Some(Category::Lodging),
                LocationLevel::City(city.to_string()),
            );
            // Grouping trims city labels, so counting must too.
            let count = catalog
                .iter()
                .filter(|item| {
                    item.category == Category::Lodging.as_str() && item.city.trim() == *city
                })
                .count();
            Suggestion {
                label: format!("Hotels in {city} ({count})"),
                count,
                params,
            }
        })
        .collect()
}

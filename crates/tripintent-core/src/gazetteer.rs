use crate::catalog::CatalogItem;
use crate::location::{Level, LocationLevel};
use indexmap::{IndexMap, IndexSet};

/// Lower-cased label -> label as it appears in the catalog, in first-seen order.
pub type LabelMap = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub key: String,
    pub label: String,
}

/// Per-level label sets derived from a catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    pub continents: LabelMap,
    pub countries: LabelMap,
    pub provinces: LabelMap,
    pub cities: LabelMap,
    pub areas: LabelMap,
    /// Union of every level (areas first), used by the longest-match scan.
    pub all_labels: Vec<LabelEntry>,
}

impl Gazetteer {
    pub fn labels(&self, level: Level) -> &LabelMap {
        match level {
            Level::Area => &self.areas,
            Level::City => &self.cities,
            Level::Province => &self.provinces,
            Level::Country => &self.countries,
            Level::Continent => &self.continents,
        }
    }

    /// Finest level whose map knows this label.
    pub fn level_of(&self, label: &str) -> LocationLevel {
        let key = label.to_lowercase();
        Level::PRECEDENCE
            .into_iter()
            .find(|&level| self.labels(level).contains_key(&key))
            .map(|level| LocationLevel::new(level, label))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.all_labels.is_empty()
    }
}

fn distinct_values(catalog: &[CatalogItem], level: Level) -> IndexSet<&str> {
    catalog
        .iter()
        .map(|item| level.field(item))
        .filter(|v| !v.is_empty())
        .collect()
}

fn make_map(values: &IndexSet<&str>) -> LabelMap {
    let mut map = LabelMap::with_capacity(values.len());
    for v in values {
        // Case variants collapse onto one key; the later spelling wins, position is kept.
        map.insert(v.to_lowercase(), v.to_string());
    }
    map
}

pub fn build_location_maps(catalog: &[CatalogItem]) -> Gazetteer {
    let per_level: Vec<(Level, IndexSet<&str>)> = Level::PRECEDENCE
        .into_iter()
        .map(|level| (level, distinct_values(catalog, level)))
        .collect();

    let mut gazetteer = Gazetteer::default();
    let mut union: IndexSet<&str> = IndexSet::new();
    for (level, values) in &per_level {
        let map = make_map(values);
        match level {
            Level::Area => gazetteer.areas = map,
            Level::City => gazetteer.cities = map,
            Level::Province => gazetteer.provinces = map,
            Level::Country => gazetteer.countries = map,
            Level::Continent => gazetteer.continents = map,
        }
        union.extend(values.iter().copied());
    }

    gazetteer.all_labels = union
        .into_iter()
        .map(|label| LabelEntry {
            key: label.to_lowercase(),
            label: label.to_string(),
        })
        .collect();

    log::debug!(
        "[Intent] Gazetteer built from {} items: {} labels",
        catalog.len(),
        gazetteer.all_labels.len()
    );
    gazetteer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(city: &str, province: &str) -> CatalogItem {
        CatalogItem::new("Lodging").in_place(city, province, "South Africa", "Africa")
    }

    #[test]
    fn test_empty_catalog() {
        let g = build_location_maps(&[]);
        assert!(g.is_empty());
        assert!(g.cities.is_empty());
        assert_eq!(g.level_of("Durban"), LocationLevel::None);
    }

    #[test]
    fn test_dedup_and_case_fold() {
        let catalog = vec![
            item("Durban", "KwaZulu-Natal"),
            item("Margate", "KwaZulu-Natal"),
            item("Durban", "KwaZulu-Natal"),
        ];
        let g = build_location_maps(&catalog);

        assert_eq!(g.cities.len(), 2);
        assert_eq!(g.cities.get("durban").map(String::as_str), Some("Durban"));
        assert_eq!(g.provinces.len(), 1);
        assert!(g.areas.is_empty(), "empty fields are skipped");

        let keys: Vec<&str> = g.all_labels.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["durban", "margate", "kwazulu-natal", "south africa", "africa"]
        );
    }

    #[test]
    fn test_level_of_prefers_finest() {
        // "Gauteng" appears both as a city-ish label and a province; the finer level wins.
        let catalog = vec![
            item("Gauteng", "Gauteng"),
            CatalogItem::new("Tour").with_area("Camps Bay"),
        ];
        let g = build_location_maps(&catalog);
        assert_eq!(g.level_of("Gauteng"), LocationLevel::City("Gauteng".to_string()));
        assert_eq!(g.level_of("Camps Bay"), LocationLevel::Area("Camps Bay".to_string()));
        assert_eq!(g.level_of("Africa"), LocationLevel::Continent("Africa".to_string()));
    }
}

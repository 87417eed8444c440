use crate::{IntentError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// A bookable travel item, as far as search-intent resolution cares.
///
/// Location fields are free-form labels; any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub continent: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub province: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub area: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogItem {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn in_place(
        mut self,
        city: &str,
        province: &str,
        country: &str,
        continent: &str,
    ) -> Self {
        self.city = city.to_string();
        self.province = province.to_string();
        self.country = country.to_string();
        self.continent = continent.to_string();
        self
    }

    pub fn with_area(mut self, area: &str) -> Self {
        self.area = area.to_string();
        self
    }
}

/// Reads a JSON array of catalog items.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>> {
    let content = fs::read_to_string(path)?;
    let items: Vec<CatalogItem> =
        serde_json::from_str(&content).map_err(|e| IntentError::Catalog {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    log::debug!(
        "[Intent] Loaded {} catalog items from {:?}",
        items.len(),
        path
    );
    Ok(items)
}

/// Small South African catalog bundled for demos and the CLI default.
pub fn sample_catalog() -> Result<Vec<CatalogItem>> {
    Ok(serde_json::from_str(include_str!("sample_catalog.json"))?)
}

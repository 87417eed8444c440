use crate::catalog::CatalogItem;
use crate::IntentError;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One rung of the location hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Area,
    City,
    Province,
    Country,
    Continent,
}

impl Level {
    /// Finest first. Every "which level wins" decision walks this order.
    pub const PRECEDENCE: [Level; 5] = [
        Level::Area,
        Level::City,
        Level::Province,
        Level::Country,
        Level::Continent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Area => "area",
            Level::City => "city",
            Level::Province => "province",
            Level::Country => "country",
            Level::Continent => "continent",
        }
    }

    /// The catalog field that carries this level.
    pub fn field(self, item: &CatalogItem) -> &str {
        match self {
            Level::Area => &item.area,
            Level::City => &item.city,
            Level::Province => &item.province,
            Level::Country => &item.country,
            Level::Continent => &item.continent,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "area" => Ok(Level::Area),
            "city" => Ok(Level::City),
            "province" => Ok(Level::Province),
            "country" => Ok(Level::Country),
            "continent" => Ok(Level::Continent),
            _ => Err(IntentError::UnknownLevel(s.to_string())),
        }
    }
}

/// A resolved location: exactly one level, or `None` when nothing matched.
///
/// On the wire this is the object shape used for catalog filters: `{}` when
/// unresolved, `{"city":"Durban"}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LocationLevel {
    Area(String),
    City(String),
    Province(String),
    Country(String),
    Continent(String),
    #[default]
    None,
}

impl LocationLevel {
    pub fn new(level: Level, value: impl Into<String>) -> Self {
        let value = value.into();
        match level {
            Level::Area => LocationLevel::Area(value),
            Level::City => LocationLevel::City(value),
            Level::Province => LocationLevel::Province(value),
            Level::Country => LocationLevel::Country(value),
            Level::Continent => LocationLevel::Continent(value),
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            LocationLevel::Area(_) => Some(Level::Area),
            LocationLevel::City(_) => Some(Level::City),
            LocationLevel::Province(_) => Some(Level::Province),
            LocationLevel::Country(_) => Some(Level::Country),
            LocationLevel::Continent(_) => Some(Level::Continent),
            LocationLevel::None => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            LocationLevel::Area(v)
            | LocationLevel::City(v)
            | LocationLevel::Province(v)
            | LocationLevel::Country(v)
            | LocationLevel::Continent(v) => Some(v),
            LocationLevel::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, LocationLevel::None)
    }

    pub fn is_resolved(&self) -> bool {
        !self.is_none()
    }

    /// Exact equality between the item's field at this level and the value.
    /// An unresolved location matches every item.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        match (self.level(), self.value()) {
            (Some(level), Some(value)) => level.field(item) == value,
            _ => true,
        }
    }
}

impl Serialize for LocationLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.level(), self.value()) {
            (Some(level), Some(value)) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(level.as_str(), value)?;
                map.end()
            }
            _ => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Loose field bag used to read the one-of object; empty strings count as absent.
#[derive(Debug, Default, Deserialize)]
struct LevelFields {
    #[serde(default)]
    area: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    continent: Option<String>,
}

impl LevelFields {
    fn populated(self) -> Vec<LocationLevel> {
        [
            (Level::Area, self.area),
            (Level::City, self.city),
            (Level::Province, self.province),
            (Level::Country, self.country),
            (Level::Continent, self.continent),
        ]
        .into_iter()
        .filter_map(|(level, v)| v.filter(|s| !s.is_empty()).map(|s| LocationLevel::new(level, s)))
        .collect()
    }
}

impl<'de> Deserialize<'de> for LocationLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut levels = LevelFields::deserialize(deserializer)?.populated();
        match levels.len() {
            0 => Ok(LocationLevel::None),
            1 => Ok(levels.remove(0)),
            n => Err(D::Error::custom(format!(
                "location must carry a single level, found {n}"
            ))),
        }
    }
}

impl fmt::Display for LocationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.level(), self.value()) {
            (Some(level), Some(value)) => write!(f, "{level}: {value}"),
            _ => f.write_str("(none)"),
        }
    }
}

/// The user's "near me" preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl MyLocation {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    /// City, else province, else country.
    pub fn preferred(&self) -> LocationLevel {
        fn pick(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        if let Some(city) = pick(&self.city) {
            LocationLevel::City(city.to_string())
        } else if let Some(province) = pick(&self.province) {
            LocationLevel::Province(province.to_string())
        } else if let Some(country) = pick(&self.country) {
            LocationLevel::Country(country.to_string())
        } else {
            LocationLevel::None
        }
    }

    pub fn is_set(&self) -> bool {
        self.preferred().is_resolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_single_key_object() {
        let loc = LocationLevel::City("Durban".to_string());
        assert_eq!(serde_json::to_string(&loc).unwrap(), r#"{"city":"Durban"}"#);
        assert_eq!(serde_json::to_string(&LocationLevel::None).unwrap(), "{}");
    }

    #[test]
    fn test_deserialize_rejects_two_levels() {
        let ok: LocationLevel = serde_json::from_str(r#"{"province":"Gauteng"}"#).unwrap();
        assert_eq!(ok, LocationLevel::Province("Gauteng".to_string()));

        let empty: LocationLevel = serde_json::from_str(r#"{"city":""}"#).unwrap();
        assert!(empty.is_none());

        let bad = serde_json::from_str::<LocationLevel>(r#"{"city":"Durban","country":"ZA"}"#);
        assert!(bad.is_err(), "two populated levels must not deserialize");
    }

    #[test]
    fn test_level_parse_and_field() {
        assert_eq!("City".parse::<Level>().unwrap(), Level::City);
        assert!("suburb".parse::<Level>().is_err());

        let item = CatalogItem {
            city: "Durban".to_string(),
            country: "South Africa".to_string(),
            ..CatalogItem::default()
        };
        assert_eq!(Level::City.field(&item), "Durban");
        assert_eq!(Level::Area.field(&item), "");
        assert!(LocationLevel::Country("South Africa".to_string()).matches(&item));
        assert!(!LocationLevel::Country("south africa".to_string()).matches(&item));
        assert!(LocationLevel::None.matches(&item));
    }

    #[test]
    fn test_my_location_preference_order() {
        let loc = MyLocation {
            city: Some("".to_string()),
            province: Some("Gauteng".to_string()),
            country: Some("South Africa".to_string()),
        };
        assert_eq!(loc.preferred(), LocationLevel::Province("Gauteng".to_string()));
        assert!(!MyLocation::default().is_set());
        let blank = MyLocation {
            city: Some("  ".to_string()),
            ..MyLocation::default()
        };
        assert!(blank.preferred().is_none());
        assert_eq!(
            MyLocation::city("Durban").preferred(),
            LocationLevel::City("Durban".to_string())
        );
    }
}

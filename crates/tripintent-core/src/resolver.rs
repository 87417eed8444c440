use crate::alias::{key_len, AliasTable};
use crate::gazetteer::{Gazetteer, LabelMap};
use crate::location::{Level, LocationLevel};

/// Exact key first, otherwise the first label (map order) containing `t`.
fn exact_or_containing<'a>(map: &'a LabelMap, t: &str) -> Option<&'a str> {
    map.get(t)
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.contains(t))
                .map(|(_, label)| label)
        })
        .map(String::as_str)
}

/// Resolves a location hint (typically the text after a connector).
///
/// Order: alias exact, alias word-boundary scan, then each gazetteer level
/// from area to continent (exact, then substring). Passing `None` for
/// `aliases` restricts resolution to the catalog.
pub fn resolve_location_token(
    token: &str,
    gazetteer: &Gazetteer,
    aliases: Option<&AliasTable>,
) -> LocationLevel {
    let t = token.trim().to_lowercase();
    if t.is_empty() {
        return LocationLevel::None;
    }

    if let Some(table) = aliases {
        if let Some(location) = table.get(&t) {
            log::debug!("[Intent] {:?} -> alias exact {}", t, location);
            return location.clone();
        }
        if let Some((key, location)) = table.first_match_in(&t) {
            log::debug!("[Intent] {:?} -> alias {:?} {}", t, key, location);
            return location.clone();
        }
    }

    for level in Level::PRECEDENCE {
        if let Some(label) = exact_or_containing(gazetteer.labels(level), &t) {
            log::debug!("[Intent] {:?} -> catalog {} {:?}", t, level, label);
            return LocationLevel::new(level, label);
        }
    }
    LocationLevel::None
}

/// Scans the whole query for the longest known place name.
///
/// Catalog labels match as plain substrings; alias keys of three or more
/// chars match on word boundaries. The alias wins only when its key is
/// strictly longer than the best catalog label.
pub fn longest_location_match(
    text: &str,
    gazetteer: &Gazetteer,
    aliases: Option<&AliasTable>,
) -> LocationLevel {
    let t = text.to_lowercase();

    let mut best: Option<(&str, usize)> = None;
    for entry in &gazetteer.all_labels {
        if entry.key.is_empty() || !t.contains(entry.key.as_str()) {
            continue;
        }
        let len = key_len(&entry.key);
        if best.map_or(true, |(_, b)| len > b) {
            best = Some((entry.label.as_str(), len));
        }
    }

    let best_alias = aliases.and_then(|table| table.longest_match_in(&t));
    let catalog_len = best.map_or(0, |(_, len)| len);
    if let Some((key, location)) = best_alias {
        if key_len(key) > catalog_len {
            log::debug!("[Intent] Longest match in {:?}: alias {:?}", t, key);
            return location.clone();
        }
    }

    match best {
        Some((label, _)) => {
            log::debug!("[Intent] Longest match in {:?}: catalog {:?}", t, label);
            gazetteer.level_of(label)
        }
        None => LocationLevel::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasRecord;
    use crate::catalog::CatalogItem;
    use crate::gazetteer::build_location_maps;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("Lodging").in_place("Durban", "KwaZulu-Natal", "South Africa", "Africa"),
            CatalogItem::new("Lodging")
                .in_place("Cape Town", "Western Cape", "South Africa", "Africa")
                .with_area("Sea Point"),
            CatalogItem::new("Tour").in_place("Nairobi", "Nairobi County", "Kenya", "Africa"),
        ]
    }

    #[test]
    fn test_empty_token() {
        let g = build_location_maps(&catalog());
        assert!(resolve_location_token("   ", &g, Some(AliasTable::builtin())).is_none());
    }

    #[test]
    fn test_hierarchy_exact_then_contains() {
        let g = build_location_maps(&catalog());
        assert_eq!(
            resolve_location_token("DURBAN", &g, None),
            LocationLevel::City("Durban".to_string())
        );
        // Prefix typed so far: "cape t" is contained in the city label.
        assert_eq!(
            resolve_location_token("cape t", &g, None),
            LocationLevel::City("Cape Town".to_string())
        );
        assert_eq!(
            resolve_location_token("western", &g, None),
            LocationLevel::Province("Western Cape".to_string())
        );
        assert_eq!(
            resolve_location_token("keny", &g, None),
            LocationLevel::Country("Kenya".to_string())
        );
        assert_eq!(
            resolve_location_token("sea point", &g, None),
            LocationLevel::Area("Sea Point".to_string())
        );
    }

    #[test]
    fn test_area_precedes_city_on_substring() {
        // "point" is inside the area label and nowhere else.
        let g = build_location_maps(&catalog());
        assert_eq!(
            resolve_location_token("point", &g, None),
            LocationLevel::Area("Sea Point".to_string())
        );
    }

    #[test]
    fn test_alias_first_and_disabled() {
        let g = build_location_maps(&catalog());
        let aliases = AliasTable::builtin();
        assert_eq!(
            resolve_location_token("jnb", &g, Some(aliases)),
            LocationLevel::City("Johannesburg".to_string())
        );
        assert!(resolve_location_token("jnb", &g, None).is_none());
        assert_eq!(
            resolve_location_token("sa", &g, Some(aliases)),
            LocationLevel::Country("South Africa".to_string())
        );
    }

    #[test]
    fn test_longest_catalog_label() {
        let g = build_location_maps(&catalog());
        assert_eq!(
            longest_location_match("hotels durban", &g, None),
            LocationLevel::City("Durban".to_string())
        );
        // "africa" and "south africa" both occur; the longer one wins.
        assert_eq!(
            longest_location_match("tours south africa", &g, None),
            LocationLevel::Country("South Africa".to_string())
        );
        assert!(longest_location_match("visa", &g, Some(AliasTable::builtin())).is_none());
    }

    #[test]
    fn test_longest_alias_vs_catalog() {
        let g = build_location_maps(&catalog());
        let aliases = AliasTable::builtin();
        // alias "sea point" (9) ties with catalog "sea point" (9): catalog wins.
        assert_eq!(
            longest_location_match("dinner sea point", &g, Some(aliases)),
            LocationLevel::Area("Sea Point".to_string())
        );
        // alias "kruger national park" is longer than anything in the catalog.
        assert_eq!(
            longest_location_match("lodges kruger national park durban", &g, Some(aliases)),
            LocationLevel::Area("Kruger National Park".to_string())
        );
    }

    #[test]
    fn test_equal_length_tie_goes_to_catalog() {
        let catalog = vec![CatalogItem::new("Tour").in_place("Zedburg", "", "", "")];
        let g = build_location_maps(&catalog);
        let aliases = AliasTable::with_custom(&[AliasRecord::new(
            "zedtown",
            &LocationLevel::Province("Zed Province".to_string()),
        )]);
        assert_eq!(
            longest_location_match("zedburg zedtown", &g, Some(&aliases)),
            LocationLevel::City("Zedburg".to_string())
        );
    }
}

use crate::alias::{AliasRecord, AliasTable};
use crate::catalog::CatalogItem;
use crate::gazetteer::{build_location_maps, Gazetteer};
use crate::location::LocationLevel;
use crate::query::SearchContext;
use crate::resolver::{longest_location_match, resolve_location_token};

/// A prepared snapshot of everything resolution derives from its inputs.
///
/// Rebuild whenever the catalog, the smart-alias flag or the custom aliases
/// change. Results match the free functions called with the same inputs.
#[derive(Debug, Clone)]
pub struct IntentIndex<'a> {
    catalog: &'a [CatalogItem],
    gazetteer: Gazetteer,
    aliases: Option<AliasTable>,
}

impl<'a> IntentIndex<'a> {
    pub fn build(
        catalog: &'a [CatalogItem],
        enable_aliases: bool,
        custom_aliases: &[AliasRecord],
    ) -> Self {
        let gazetteer = build_location_maps(catalog);
        let aliases = AliasTable::for_settings(enable_aliases, custom_aliases);
        log::debug!(
            "[Intent] Index ready: {} items, {} aliases",
            catalog.len(),
            aliases.as_ref().map_or(0, AliasTable::len)
        );
        Self {
            catalog,
            gazetteer,
            aliases,
        }
    }

    pub fn from_context(ctx: &SearchContext<'a>) -> Self {
        Self::build(ctx.catalog, ctx.enable_aliases, ctx.custom_aliases)
    }

    pub fn catalog(&self) -> &'a [CatalogItem] {
        self.catalog
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// `None` when smart aliases are off.
    pub fn aliases(&self) -> Option<&AliasTable> {
        self.aliases.as_ref()
    }

    pub fn resolve(&self, token: &str) -> LocationLevel {
        resolve_location_token(token, &self.gazetteer, self.aliases())
    }

    pub fn longest_match(&self, text: &str) -> LocationLevel {
        longest_location_match(text, &self.gazetteer, self.aliases())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Level;

    #[test]
    fn test_index_respects_alias_flag() {
        let catalog = vec![CatalogItem::new("Lodging").in_place("Durban", "KwaZulu-Natal", "South Africa", "Africa")];

        let on = IntentIndex::build(&catalog, true, &[]);
        assert_eq!(on.resolve("kzn"), LocationLevel::Province("KwaZulu-Natal".to_string()));

        let off = IntentIndex::build(&catalog, false, &[]);
        assert!(off.aliases().is_none());
        assert!(off.resolve("kzn").is_none());
        assert_eq!(off.resolve("durb"), LocationLevel::City("Durban".to_string()));
    }

    #[test]
    fn test_index_uses_custom_aliases() {
        let catalog = vec![CatalogItem::new("Tour").in_place("Hazyview", "Mpumalanga", "South Africa", "Africa")];
        let custom = [AliasRecord::new("the bush", &LocationLevel::new(Level::City, "Hazyview"))];
        let index = IntentIndex::build(&catalog, true, &custom);
        assert_eq!(index.longest_match("safari in the bush"), LocationLevel::City("Hazyview".to_string()));
        assert_eq!(index.catalog().len(), 1);
    }
}

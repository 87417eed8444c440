// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::location::{Level, LocationLevel};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Keys shorter than this only ever match a whole token exactly. Scanning
/// free text for them would turn "visa" into South Africa.
pub const MIN_SCAN_KEY_LEN: usize = 3;

/// Shorthand -> canonical location. Order matters: the word-boundary scan
/// returns the first row that matches.
static BUILTIN_ALIASES: &[(&str, Level, &str)] = &[
    // Provinces
    ("kzn", Level::Province, "KwaZulu-Natal"),
    ("kwazulu natal", Level::Province, "KwaZulu-Natal"),
    ("western cape", Level::Province, "Western Cape"),
    ("wc", Level::Province, "Western Cape"),
    ("eastern cape", Level::Province, "Eastern Cape"),
    ("ec", Level::Province, "Eastern Cape"),
    ("gauteng", Level::Province, "Gauteng"),
    ("gp", Level::Province, "Gauteng"),
    ("mpumalanga", Level::Province, "Mpumalanga"),
    ("mp", Level::Province, "Mpumalanga"),
    ("limpopo", Level::Province, "Limpopo"),
    ("lp", Level::Province, "Limpopo"),
    ("free state", Level::Province, "Free State"),
    ("fs", Level::Province, "Free State"),
    ("northern cape", Level::Province, "Northern Cape"),
    ("nc", Level::Province, "Northern Cape"),
    ("north west", Level::Province, "North West"),
    ("nw", Level::Province, "North West"),
    // City nicknames and codes
    ("durbs", Level::City, "Durban"),
    ("dbn", Level::City, "Durban"),
    ("dur", Level::City, "Durban"),
    ("ct", Level::City, "Cape Town"),
    ("cpt", Level::City, "Cape Town"),
    ("mother city", Level::City, "Cape Town"),
    ("joburg", Level::City, "Johannesburg"),
    ("jozi", Level::City, "Johannesburg"),
    ("jhb", Level::City, "Johannesburg"),
    ("jnb", Level::City, "Johannesburg"),
    ("umhlanga rocks", Level::City, "Umhlanga"),
    ("umhlanga", Level::City, "Umhlanga"),
    // KZN coastal belts and inland regions
    ("south coast", Level::Province, "KwaZulu-Natal"),
    ("north coast", Level::Province, "KwaZulu-Natal"),
    ("midlands", Level::Province, "KwaZulu-Natal"),
    ("midlands meander", Level::Province, "KwaZulu-Natal"),
    ("drakensberg", Level::Province, "KwaZulu-Natal"),
    ("zululand", Level::Area, "Zululand"),
    ("isimangaliso", Level::Area, "iSimangaliso Wetland Park"),
    ("hluhluwe", Level::City, "Hluhluwe"),
    ("dolphin coast", Level::Area, "Dolphin Coast"),
    ("sapphire coast", Level::Area, "Sapphire Coast"),
    ("ballito", Level::City, "Ballito"),
    ("st lucia", Level::City, "St Lucia"),
    ("port shepstone", Level::City, "Port Shepstone"),
    ("margate", Level::City, "Margate"),
    ("scottburgh", Level::City, "Scottburgh"),
    ("amanzimtoti", Level::City, "Amanzimtoti"),
    ("pietermaritzburg", Level::City, "Pietermaritzburg"),
    ("pmb", Level::City, "Pietermaritzburg"),
    // Garden Route and Eastern Cape
    ("garden route", Level::Area, "Garden Route"),
    ("plettenberg bay", Level::City, "Plettenberg Bay"),
    ("plett", Level::City, "Plettenberg Bay"),
    ("knysna", Level::City, "Knysna"),
    ("mossel bay", Level::City, "Mossel Bay"),
    ("tsitsikamma", Level::Area, "Tsitsikamma"),
    ("port elizabeth", Level::City, "Port Elizabeth"),
    ("gqeberha", Level::City, "Port Elizabeth"),
    ("pe", Level::City, "Port Elizabeth"),
    ("summerstrand", Level::Area, "Summerstrand"),
    ("east london", Level::City, "East London"),
    ("el", Level::City, "East London"),
    ("jeffreys bay", Level::City, "Jeffreys Bay"),
    ("jbay", Level::City, "Jeffreys Bay"),
    ("hogsback", Level::City, "Hogsback"),
    ("coffee bay", Level::City, "Coffee Bay"),
    ("mthatha", Level::City, "Mthatha"),
    ("umtata", Level::City, "Mthatha"),
    ("wild coast", Level::Area, "Wild Coast"),
    // Western Cape regions
    ("cape winelands", Level::Area, "Cape Winelands"),
    ("winelands", Level::Area, "Cape Winelands"),
    ("whale coast", Level::Area, "Whale Coast"),
    ("overberg", Level::Area, "Overberg"),
    ("overstrand", Level::Area, "Overstrand"),
    ("cederberg", Level::Area, "Cederberg"),
    ("west coast", Level::Area, "West Coast"),
    ("karoo", Level::Area, "Karoo"),
    ("klein karoo", Level::Area, "Klein Karoo"),
    ("route 62", Level::Area, "Route 62"),
    ("breede river valley", Level::Area, "Breede River Valley"),
    ("breede valley", Level::Area, "Breede River Valley"),
    ("cape peninsula", Level::Area, "Cape Peninsula"),
    ("false bay", Level::Area, "False Bay"),
    ("helderberg", Level::Area, "Helderberg"),
    ("stellenbosch", Level::City, "Stellenbosch"),
    ("franschhoek", Level::City, "Franschhoek"),
    ("paarl", Level::City, "Paarl"),
    ("hermanus", Level::City, "Hermanus"),
    ("paternoster", Level::City, "Paternoster"),
    ("langebaan", Level::City, "Langebaan"),
    // City Bowl and Atlantic Seaboard
    ("bo-kaap", Level::Area, "Bo-Kaap"),
    ("bokaap", Level::Area, "Bo-Kaap"),
    ("de waterkant", Level::Area, "De Waterkant"),
    ("gardens", Level::Area, "Gardens"),
    ("tamboerskloof", Level::Area, "Tamboerskloof"),
    ("oranjezicht", Level::Area, "Oranjezicht"),
    ("vredehoek", Level::Area, "Vredehoek"),
    ("fresnaye", Level::Area, "Fresnaye"),
    ("bantry bay", Level::Area, "Bantry Bay"),
    ("clifton", Level::Area, "Clifton"),
    // Southern and northern suburbs
    ("camps bay", Level::Area, "Camps Bay"),
    ("sea point", Level::Area, "Sea Point"),
    ("hout bay", Level::Area, "Hout Bay"),
    ("constantia", Level::Area, "Constantia"),
    ("newlands", Level::Area, "Newlands"),
    ("rondebosch", Level::Area, "Rondebosch"),
    ("green point", Level::Area, "Green Point"),
    ("somerset west", Level::City, "Somerset West"),
    ("strand", Level::City, "Strand"),
    ("gordon's bay", Level::City, "Gordon's Bay"),
    ("gordons bay", Level::City, "Gordon's Bay"),
    ("bloubergstrand", Level::Area, "Bloubergstrand"),
    ("table view", Level::Area, "Table View"),
    ("melkbosstrand", Level::Area, "Melkbosstrand"),
    ("durbanville", Level::City, "Durbanville"),
    ("muizenberg", Level::Area, "Muizenberg"),
    ("kalk bay", Level::Area, "Kalk Bay"),
    ("fish hoek", Level::Area, "Fish Hoek"),
    ("kommetjie", Level::Area, "Kommetjie"),
    ("noordhoek", Level::Area, "Noordhoek"),
    ("simon's town", Level::Area, "Simon's Town"),
    ("simons town", Level::Area, "Simon's Town"),
    ("llandudno", Level::Area, "Llandudno"),
    // Overberg
    ("betty's bay", Level::City, "Betty's Bay"),
    ("bettys bay", Level::City, "Betty's Bay"),
    ("pringle bay", Level::City, "Pringle Bay"),
    ("rooiels", Level::City, "Rooiels"),
    ("gansbaai", Level::City, "Gansbaai"),
    ("de kelders", Level::City, "De Kelders"),
    ("stanford", Level::City, "Stanford"),
    ("cape agulhas", Level::City, "Agulhas"),
    ("agulhas", Level::City, "Agulhas"),
    ("arniston", Level::City, "Arniston"),
    ("waenhuiskrans", Level::City, "Arniston"),
    ("de hoop", Level::Area, "De Hoop Nature Reserve"),
    // Garden Route towns
    ("wilderness", Level::City, "Wilderness"),
    ("george", Level::City, "George"),
    ("storms river", Level::City, "Storms River"),
    ("nature's valley", Level::City, "Nature's Valley"),
    ("natures valley", Level::City, "Nature's Valley"),
    ("oudtshoorn", Level::City, "Oudtshoorn"),
    ("prince albert", Level::City, "Prince Albert"),
    // Eastern Cape coast
    ("st francis bay", Level::City, "St Francis Bay"),
    ("cape st francis", Level::City, "Cape St Francis"),
    ("port alfred", Level::City, "Port Alfred"),
    ("kenton-on-sea", Level::City, "Kenton-on-Sea"),
    ("kenton on sea", Level::City, "Kenton-on-Sea"),
    ("grahamstown", Level::City, "Makhanda"),
    ("makhanda", Level::City, "Makhanda"),
    // KZN coast towns
    ("richards bay", Level::City, "Richards Bay"),
    ("empangeni", Level::City, "Empangeni"),
    ("eshowe", Level::City, "Eshowe"),
    ("umdloti", Level::City, "Umdloti"),
    ("la lucia", Level::Area, "La Lucia"),
    ("salt rock", Level::City, "Salt Rock"),
    ("sheffield beach", Level::City, "Sheffield Beach"),
    ("zinkwazi", Level::City, "Zinkwazi"),
    ("blythedale", Level::City, "Blythedale"),
    ("mtunzini", Level::City, "Mtunzini"),
    ("uvongo", Level::City, "Uvongo"),
    ("ramsgate", Level::City, "Ramsgate"),
    ("umtentweni", Level::City, "Umtentweni"),
    ("pennington", Level::City, "Pennington"),
    ("hibberdene", Level::City, "Hibberdene"),
    ("shelly beach", Level::City, "Shelly Beach"),
    // Drakensberg
    ("underberg", Level::City, "Underberg"),
    ("himeville", Level::City, "Himeville"),
    ("bergville", Level::City, "Bergville"),
    ("winterton", Level::City, "Winterton"),
    ("cathedral peak", Level::Area, "Cathedral Peak"),
    ("champagne valley", Level::Area, "Champagne Valley"),
    ("giants castle", Level::Area, "Giants Castle"),
    ("royal natal", Level::Area, "Royal Natal National Park"),
    // Midlands
    ("howick", Level::City, "Howick"),
    ("nottingham road", Level::City, "Nottingham Road"),
    ("mooi river", Level::City, "Mooi River"),
    ("balgowan", Level::City, "Balgowan"),
    ("curry's post", Level::City, "Curry's Post"),
    ("currys post", Level::City, "Curry's Post"),
    // Lowveld
    ("hazyview", Level::City, "Hazyview"),
    ("sabie", Level::City, "Sabie"),
    ("graskop", Level::City, "Graskop"),
    ("nelspruit", Level::City, "Nelspruit"),
    ("mbombela", Level::City, "Nelspruit"),
    ("malelane", Level::City, "Malelane"),
    ("komatipoort", Level::City, "Komatipoort"),
    ("dullstroom", Level::City, "Dullstroom"),
    ("barberton", Level::City, "Barberton"),
    ("white river", Level::City, "White River"),
    ("hoedspruit", Level::City, "Hoedspruit"),
    ("phalaborwa", Level::City, "Phalaborwa"),
    ("tzaneen", Level::City, "Tzaneen"),
    ("polokwane", Level::City, "Polokwane"),
    // Bushveld
    ("bela-bela", Level::City, "Bela-Bela"),
    ("belabela", Level::City, "Bela-Bela"),
    ("warmbaths", Level::City, "Bela-Bela"),
    ("modimolle", Level::City, "Modimolle"),
    ("nylstroom", Level::City, "Modimolle"),
    ("mokopane", Level::City, "Mokopane"),
    ("thabazimbi", Level::City, "Thabazimbi"),
    // North West towns
    ("rustenburg", Level::City, "Rustenburg"),
    ("brits", Level::City, "Brits"),
    // Free State and Northern Cape
    ("clarens", Level::City, "Clarens"),
    ("golden gate", Level::Area, "Golden Gate Highlands National Park"),
    ("parys", Level::City, "Parys"),
    ("upington", Level::City, "Upington"),
    ("springbok", Level::City, "Springbok"),
    ("pofadder", Level::City, "Pofadder"),
    ("kimberley", Level::City, "Kimberley"),
    ("sutherland", Level::City, "Sutherland"),
    // Johannesburg suburbs
    ("centurion", Level::City, "Centurion"),
    ("fourways", Level::Area, "Fourways"),
    ("randburg", Level::City, "Randburg"),
    ("melrose", Level::Area, "Melrose"),
    ("sandhurst", Level::Area, "Sandhurst"),
    ("hyde park", Level::Area, "Hyde Park"),
    ("morningside", Level::Area, "Morningside"),
    ("bryanston", Level::Area, "Bryanston"),
    ("illovo", Level::Area, "Illovo"),
    ("parkhurst", Level::Area, "Parkhurst"),
    ("parktown", Level::Area, "Parktown"),
    ("parkview", Level::Area, "Parkview"),
    ("greenside", Level::Area, "Greenside"),
    ("emmarentia", Level::Area, "Emmarentia"),
    ("melville", Level::Area, "Melville"),
    ("sunninghill", Level::Area, "Sunninghill"),
    ("bedfordview", Level::City, "Bedfordview"),
    // Gauteng cities
    ("pretoria", Level::City, "Pretoria"),
    ("pta", Level::City, "Pretoria"),
    ("tshwane", Level::City, "Pretoria"),
    ("sandton", Level::City, "Sandton"),
    ("rosebank", Level::City, "Rosebank"),
    ("soweto", Level::City, "Soweto"),
    ("midrand", Level::City, "Midrand"),
    // Safari regions
    ("madikwe", Level::Area, "Madikwe Game Reserve"),
    ("pilanesberg", Level::Area, "Pilanesberg"),
    ("sun city", Level::City, "Sun City"),
    ("hartbeespoort", Level::City, "Hartbeespoort"),
    ("waterberg", Level::Area, "Waterberg"),
    ("kruger", Level::Area, "Kruger National Park"),
    ("kruger national park", Level::Area, "Kruger National Park"),
    ("sabi sand", Level::Area, "Sabi Sand"),
    ("sabi sands", Level::Area, "Sabi Sand"),
    ("timbavati", Level::Area, "Timbavati"),
    ("panorama route", Level::Area, "Panorama Route"),
    ("addo elephant park", Level::Area, "Addo Elephant National Park"),
    ("addo", Level::Area, "Addo Elephant National Park"),
    // Arid parks
    ("namaqualand", Level::Area, "Namaqualand"),
    ("richtersveld", Level::Area, "Richtersveld"),
    ("kgalagadi", Level::Area, "Kgalagadi Transfrontier Park"),
    ("augrabies", Level::Area, "Augrabies Falls National Park"),
    ("elephant coast", Level::Area, "Elephant Coast"),
    // Countries
    ("za", Level::Country, "South Africa"),
    ("sa", Level::Country, "South Africa"),
    ("rsa", Level::Country, "South Africa"),
    ("uk", Level::Country, "United Kingdom"),
    ("gb", Level::Country, "United Kingdom"),
    ("uae", Level::Country, "United Arab Emirates"),
    ("ksa", Level::Country, "Saudi Arabia"),
    ("saudi", Level::Country, "Saudi Arabia"),
    ("us", Level::Country, "United States"),
    ("usa", Level::Country, "United States"),
    ("america", Level::Country, "United States"),
    ("tz", Level::Country, "Tanzania"),
    ("au", Level::Country, "Australia"),
    ("aus", Level::Country, "Australia"),
    ("nz", Level::Country, "New Zealand"),
    ("de", Level::Country, "Germany"),
    ("fr", Level::Country, "France"),
    ("it", Level::Country, "Italy"),
    ("es", Level::Country, "Spain"),
    ("jp", Level::Country, "Japan"),
    ("nl", Level::Country, "Netherlands"),
    ("pt", Level::Country, "Portugal"),
    ("gr", Level::Country, "Greece"),
    ("ae", Level::Country, "United Arab Emirates"),
    ("qa", Level::Country, "Qatar"),
    ("ke", Level::Country, "Kenya"),
    ("zm", Level::Country, "Zambia"),
    ("bw", Level::Country, "Botswana"),
    ("na", Level::Country, "Namibia"),
    ("mz", Level::Country, "Mozambique"),
    ("mu", Level::Country, "Mauritius"),
    ("sc", Level::Country, "Seychelles"),
    // Airport and city codes
    ("ams", Level::City, "Amsterdam"),
    ("lhr", Level::City, "London"),
    ("dxb", Level::City, "Dubai"),
    ("lon", Level::City, "London"),
    ("nyc", Level::City, "New York"),
    ("fra", Level::City, "Frankfurt"),
    ("muc", Level::City, "Munich"),
    ("cdg", Level::City, "Paris"),
    ("lgw", Level::City, "London"),
    ("stn", Level::City, "London"),
    ("man", Level::City, "Manchester"),
    ("edi", Level::City, "Edinburgh"),
    ("gla", Level::City, "Glasgow"),
    ("doh", Level::City, "Doha"),
    ("auh", Level::City, "Abu Dhabi"),
    ("hkg", Level::City, "Hong Kong"),
    ("sin", Level::City, "Singapore"),
    ("bkk", Level::City, "Bangkok"),
    ("nbo", Level::City, "Nairobi"),
    // Islands
    ("zanzibar", Level::Province, "Zanzibar North"),
];

#[derive(Debug, Clone)]
struct AliasEntry {
    location: LocationLevel,
    /// `None` for short keys, which are exact-match only.
    boundary: Option<Regex>,
}

/// Insertion-ordered alias lookup: built-ins first, custom records after.
///
/// Re-inserting an existing key replaces its location but keeps its slot, so
/// a custom alias overriding a built-in is still scanned where the built-in was.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: IndexMap<String, AliasEntry>,
}

impl AliasTable {
    /// The shipped table, compiled once per process.
    pub fn builtin() -> &'static AliasTable {
        static BUILTIN: OnceLock<AliasTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut table = AliasTable::default();
            for (key, level, value) in BUILTIN_ALIASES {
                table.insert(key, LocationLevel::new(*level, *value));
            }
            log::debug!("[Intent] Compiled {} built-in aliases", table.len());
            table
        })
    }

    /// Built-ins merged with user records; later records win on key collision.
    pub fn with_custom(custom: &[AliasRecord]) -> AliasTable {
        let mut table = Self::builtin().clone();
        for record in custom {
            let key = record.normalized_key();
            let location = record.location();
            if key.is_empty() || location.is_none() {
                log::debug!("[Intent] Skipping unusable custom alias {:?}", record);
                continue;
            }
            table.insert(&key, location);
        }
        table
    }

    /// `None` when smart aliases are switched off.
    pub fn for_settings(enabled: bool, custom: &[AliasRecord]) -> Option<AliasTable> {
        enabled.then(|| Self::with_custom(custom))
    }

    pub fn insert(&mut self, key: &str, location: LocationLevel) {
        let key = normalize_key(key);
        if key.is_empty() || location.is_none() {
            return;
        }
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.location = location;
            return;
        }
        let boundary = boundary_regex(&key);
        self.entries.insert(key, AliasEntry { location, boundary });
    }

    /// Exact lookup of a whole token (trimmed, case-insensitive).
    pub fn get(&self, token: &str) -> Option<&LocationLevel> {
        self.entries.get(&normalize_key(token)).map(|e| &e.location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocationLevel)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), &e.location))
    }

    /// Keys of at least [`MIN_SCAN_KEY_LEN`] chars appearing as whole words in `text`, in table order.
    pub fn scan(&self, text: &str) -> Vec<(&str, &LocationLevel)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.hits(text))
            .map(|(key, entry)| (key.as_str(), &entry.location))
            .collect()
    }

    pub fn first_match_in(&self, text: &str) -> Option<(&str, &LocationLevel)> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.hits(text))
            .map(|(key, entry)| (key.as_str(), &entry.location))
    }

    /// Longest matching key; the earliest one wins a length tie.
    pub fn longest_match_in(&self, text: &str) -> Option<(&str, &LocationLevel)> {
        let mut best: Option<(&str, &LocationLevel)> = None;
        for (key, location) in self.scan(text) {
            if best.map_or(true, |(b, _)| key_len(key) > key_len(b)) {
                best = Some((key, location));
            }
        }
        best
    }
}

impl AliasEntry {
    fn hits(&self, text: &str) -> bool {
        self.boundary.as_ref().is_some_and(|re| re.is_match(text))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

pub(crate) fn key_len(key: &str) -> usize {
    key.chars().count()
}

fn boundary_regex(key: &str) -> Option<Regex> {
    if key_len(key) < MIN_SCAN_KEY_LEN {
        return None;
    }
    let pattern = format!(r"(?i)(?:^|\b){}(?:\b|$)", regex::escape(key));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("[Intent] Alias {:?} is exact-match only: {}", key, e);
            None
        }
    }
}

/// A user-defined alias as persisted: the key plus exactly one level field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

impl AliasRecord {
    pub fn new(key: &str, location: &LocationLevel) -> Self {
        let mut record = Self {
            key: key.to_string(),
            ..Self::default()
        };
        let value = location.value().map(str::to_string);
        match location.level() {
            Some(Level::Area) => record.area = value,
            Some(Level::City) => record.city = value,
            Some(Level::Province) => record.province = value,
            Some(Level::Country) => record.country = value,
            Some(Level::Continent) => record.continent = value,
            None => {}
        }
        record
    }

    pub fn normalized_key(&self) -> String {
        normalize_key(&self.key)
    }

    /// First populated field in precedence order.
    pub fn location(&self) -> LocationLevel {
        [
            (Level::Area, &self.area),
            (Level::City, &self.city),
            (Level::Province, &self.province),
            (Level::Country, &self.country),
            (Level::Continent, &self.continent),
        ]
        .into_iter()
        .find_map(|(level, v)| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| LocationLevel::new(level, s))
        })
        .unwrap_or_default()
    }
}

//! Niche catalog: competitor seeds, keyword seeds and niche matching.

use std::collections::HashSet;

/// Known competitor stores per niche
const COMPETITOR_STORES: &[(&str, &[&str])] = &[
    ("backyard", &[
        "bbqguys.com", "firepitsdirect.com", "firepitsurplus.com",
        "theporchswingcompany.com", "allthingsbarbecue.com",
    ]),
    ("fireplace", &[
        "fireplacesdirect.com", "electricfireplacesdirect.com", "starfiredirect.com",
        "usfireplacestore.com", "electricfireplacesdepot.com",
    ]),
    ("wellness", &[
        "recoveryforathletes.com", "mysaunaworld.com", "northernsaunas.com",
        "secretsaunas.com", "thesaunaheater.com",
    ]),
    ("golf", &[
        "shopindoorgolf.com", "rainorshinegolf.com", "carlsgolfland.com",
        "topshelfgolf.com", "golfsimulatorsforhome.com",
    ]),
    ("fitness", &[
        "strengthwarehouseusa.com", "fitnessfactory.com", "fitnesszone.com",
        "marcypro.com", "globalfitness.com",
    ]),
    ("home theater", &[
        "projectorpeople.com", "4seating.com", "htmarket.com",
        "theaterseatstore.com", "upscaleaudio.com",
    ]),
    ("kitchen", &[
        "ajmadison.com", "therangehoodstore.com", "premiumhomesource.com",
        "seattlecoffeegear.com", "majestycoffee.com",
    ]),
    ("hvac", &[
        "heatandcool.com", "alpinehomeair.com", "totalhomesupply.com",
        "acwholesalers.com", "hvacquick.com",
    ]),
    ("safes", &[
        "deansafe.com", "thesafekeeper.com", "nwsafe.com",
        "safeandvaultstore.com", "libertysafe.com",
    ]),
    ("solar", &[
        "shopsolarkits.com", "gogreensolar.com", "wholesalesolar.com",
        "mrsolar.com", "solarpowersupply.com",
    ]),
    ("drones", &[
        "dronefly.com", "advexure.com", "maverickdrone.com",
        "dronenerds.com", "buydronesonline.com",
    ]),
    ("generators", &[
        "generatormart.com", "electricgeneratorsdirect.com", "generatorsupercenter.com",
        "norwall.com", "apelectric.com",
    ]),
    ("horse riding", &[
        "doversaddlery.com", "smartpakequine.com", "chicksaddlery.com",
        "horseloverz.com", "statelinetack.com",
    ]),
    ("sauna", &[
        "saunaplace.com", "theblissfulplace.com", "saunaking.com",
        "almostheaven.com", "finnleo.com",
    ]),
    ("pizza oven", &[
        "pizzaovens.com", "patioandpizza.com", "thepizzaovenshop.com",
        "wppo.com", "pizzaequipmentpros.com",
    ]),
    ("exercise equipment", &[
        "globalfitness.com", "fitnessfactory.com", "gymsource.com",
        "marcypro.com", "ironcompany.com",
    ]),
];

/// Spelling variants that map onto a catalog key
const NICHE_ALIASES: &[(&str, &str)] = &[
    ("horseriding", "horse riding"),
    ("hometheater", "home theater"),
    ("pizzaoven", "pizza oven"),
    ("exerciseequipment", "exercise equipment"),
    ("smarthome", "smart home"),
    ("homegym", "home gym"),
];

/// Seed keywords that mark a token as niche-relevant
const NICHE_KEYWORDS: &[(&str, &[&str])] = &[
    ("horse riding", &[
        "horse", "equine", "saddle", "saddlery", "tack", "riding", "equestrian",
        "bridle", "stable", "ranch", "cowboy", "western",
    ]),
    ("backyard", &[
        "yard", "lawn", "patio", "garden", "outdoor", "deck", "bbq", "barbecue",
        "grill", "fire", "porch", "flame",
    ]),
    ("fireplace", &[
        "fire", "flame", "hearth", "chimney", "electric", "stove", "warm", "heat",
        "cozy", "pit", "pits",
    ]),
    ("wellness", &[
        "health", "wellness", "vital", "life", "care", "pure", "recovery", "sauna",
        "therapy", "fitness",
    ]),
    ("golf", &["golf", "club", "simulator", "indoor", "swing", "putt", "tee"]),
    ("fitness", &[
        "fitness", "gym", "strength", "warehouse", "zone", "factory", "global", "pro",
        "equipment",
    ]),
    ("kitchen", &["kitchen", "appliance", "coffee", "gear", "premium", "range"]),
    ("sauna", &["sauna", "spa", "steam", "heat", "finnish", "infrared", "heaven"]),
    ("pizza oven", &["pizza", "oven", "wood", "fire", "patio", "outdoor"]),
    ("drones", &["drone", "fly", "maverick", "nerds", "uav", "aviation"]),
];

/// Marketplaces that never count as niche competitors
const EXCLUDED_RETAILERS: &[&str] = &[
    "amazon.com", "ebay.com", "walmart.com", "target.com", "wayfair.com",
    "homedepot.com", "lowes.com", "costco.com", "alibaba.com", "aliexpress.com",
    "etsy.com", "wish.com", "overstock.com", "ikea.com", "bestbuy.com", "macys.com",
];

/// How a free-form niche resolved against a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicheMatch {
    /// Resolved to this table key
    Matched(String),
    Unmatched,
}

impl NicheMatch {
    pub fn key(&self) -> Option<&str> {
        match self {
            NicheMatch::Matched(key) => Some(key),
            NicheMatch::Unmatched => None,
        }
    }
}

/// Keyword seed for a niche, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSeed {
    pub source: NicheMatch,
    pub keywords: Vec<String>,
}

impl KeywordSeed {
    pub fn contains(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }
}

/// Lookup tables keyed by niche
#[derive(Debug, Clone)]
pub struct NicheCatalog {
    stores: Vec<(String, Vec<String>)>,
    keywords: Vec<(String, Vec<String>)>,
    aliases: Vec<(String, String)>,
    excluded: HashSet<String>,
}

fn owned_table(table: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
    table
        .iter()
        .map(|(key, values)| (key.to_string(), values.iter().map(|v| v.to_string()).collect()))
        .collect()
}

/// Lowercase, trim, and collapse inner whitespace
pub fn normalize_niche(niche: &str) -> String {
    niche
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl NicheCatalog {
    pub fn new() -> Self {
        Self {
            stores: owned_table(COMPETITOR_STORES),
            keywords: owned_table(NICHE_KEYWORDS),
            aliases: NICHE_ALIASES
                .iter()
                .map(|(alias, key)| (alias.to_string(), key.to_string()))
                .collect(),
            excluded: EXCLUDED_RETAILERS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Match `niche` against `keys` in priority order:
    /// exact key, alias, containment either way, then `Unmatched`.
    fn match_keys<'a>(&self, niche: &str, keys: impl Iterator<Item = &'a str> + Clone) -> NicheMatch {
        let niche = normalize_niche(niche);
        if niche.is_empty() {
            return NicheMatch::Unmatched;
        }

        if let Some(key) = keys.clone().find(|k| *k == niche) {
            return NicheMatch::Matched(key.to_string());
        }

        if let Some((_, target)) = self.aliases.iter().find(|(alias, _)| *alias == niche) {
            if let Some(key) = keys.clone().find(|k| *k == target.as_str()) {
                return NicheMatch::Matched(key.to_string());
            }
        }

        keys.into_iter()
            .find(|k| k.contains(niche.as_str()) || niche.contains(*k))
            .map(|k| NicheMatch::Matched(k.to_string()))
            .unwrap_or(NicheMatch::Unmatched)
    }

    /// Resolve a niche against the competitor table
    pub fn match_niche(&self, niche: &str) -> NicheMatch {
        self.match_keys(niche, self.stores.iter().map(|(k, _)| k.as_str()))
    }

    /// Competitor domains for a niche, or `None` when the catalog has no entry
    pub fn competitors(&self, niche: &str) -> Option<(String, Vec<String>)> {
        let key = match self.match_niche(niche) {
            NicheMatch::Matched(key) => key,
            NicheMatch::Unmatched => return None,
        };
        self.stores
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(k, domains)| (k.clone(), self.without_excluded(domains.clone())))
    }

    /// Keyword seed for a niche; unknown niches seed from their own words
    pub fn keyword_seed(&self, niche: &str) -> KeywordSeed {
        let source = self.match_keys(niche, self.keywords.iter().map(|(k, _)| k.as_str()));
        let keywords = match &source {
            NicheMatch::Matched(key) => self
                .keywords
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, words)| words.clone())
                .unwrap_or_default(),
            NicheMatch::Unmatched => normalize_niche(niche)
                .split(' ')
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        };
        KeywordSeed { source, keywords }
    }

    pub fn is_excluded_retailer(&self, domain: &str) -> bool {
        self.excluded.contains(&domain.trim().to_lowercase())
    }

    /// Drop marketplaces from a competitor list
    pub fn without_excluded(&self, domains: Vec<String>) -> Vec<String> {
        domains
            .into_iter()
            .filter(|d| !self.is_excluded_retailer(d))
            .collect()
    }

    /// All catalog niches, in table order
    pub fn niches(&self) -> Vec<&str> {
        self.stores.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl Default for NicheCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_wins() {
        let catalog = NicheCatalog::new();
        assert_eq!(catalog.match_niche("  Golf "), NicheMatch::Matched("golf".to_string()));
    }

    #[test]
    fn test_alias_match() {
        let catalog = NicheCatalog::new();
        assert_eq!(
            catalog.match_niche("horseriding"),
            NicheMatch::Matched("horse riding".to_string())
        );
        assert_eq!(
            catalog.match_niche("HomeTheater"),
            NicheMatch::Matched("home theater".to_string())
        );
    }

    #[test]
    fn test_containment_both_ways() {
        let catalog = NicheCatalog::new();
        assert_eq!(
            catalog.match_niche("luxury backyard furniture"),
            NicheMatch::Matched("backyard".to_string())
        );
        assert_eq!(catalog.match_niche("drone"), NicheMatch::Matched("drones".to_string()));
    }

    #[test]
    fn test_unmatched_instead_of_default() {
        let catalog = NicheCatalog::new();
        assert_eq!(catalog.match_niche("aquarium supplies"), NicheMatch::Unmatched);
        assert_eq!(catalog.match_niche("   "), NicheMatch::Unmatched);
        assert!(catalog.competitors("aquarium supplies").is_none());
    }

    #[test]
    fn test_keyword_seed_known_and_derived() {
        let catalog = NicheCatalog::new();
        let seed = catalog.keyword_seed("backyard");
        assert_eq!(seed.source, NicheMatch::Matched("backyard".to_string()));
        assert!(seed.contains("fire"));

        let seed = catalog.keyword_seed("Aquarium  Supplies");
        assert_eq!(seed.source, NicheMatch::Unmatched);
        assert_eq!(seed.keywords, vec!["aquarium", "supplies"]);

        assert!(catalog.keyword_seed("").keywords.is_empty());
    }

    #[test]
    fn test_excluded_retailers_filtered() {
        let catalog = NicheCatalog::new();
        let filtered = catalog.without_excluded(vec![
            "Amazon.com".to_string(),
            "bbqguys.com".to_string(),
        ]);
        assert_eq!(filtered, vec!["bbqguys.com"]);
    }

    #[test]
    fn test_competitors_for_known_niche() {
        let catalog = NicheCatalog::new();
        let (key, domains) = catalog.competitors("backyard").unwrap();
        assert_eq!(key, "backyard");
        assert_eq!(domains.len(), 5);
        assert!(domains.contains(&"firepitsdirect.com".to_string()));
    }
}

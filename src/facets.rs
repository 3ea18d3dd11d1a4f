//! Facet extraction: each extractor scans the raw query for one filter dimension.

use once_cell::sync::Lazy;
use regex::Regex;

/// Demonym / country keywords mapped to the substrings used against the `Nation` column.
const NATIONALITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("french", &["france", "fra"]),
    ("france", &["france", "fra"]),
    ("brazilian", &["brazil", "bra"]),
    ("brazil", &["brazil", "bra"]),
    ("argentinian", &["argentina", "arg"]),
    ("argentina", &["argentina", "arg"]),
    ("spanish", &["spain", "esp"]),
    ("spain", &["spain", "esp"]),
    ("english", &["england", "eng"]),
    ("england", &["england", "eng"]),
    ("german", &["germany", "ger"]),
    ("germany", &["germany", "ger"]),
    ("italian", &["italy", "ita"]),
    ("italy", &["italy", "ita"]),
    ("portuguese", &["portugal", "por"]),
    ("portugal", &["portugal", "por"]),
    ("dutch", &["netherlands", "ned"]),
    ("netherlands", &["netherlands", "ned"]),
];

const LEAGUE_KEYWORDS: &[(&str, &str)] = &[
    ("premier league", "Premier League"),
    ("premier", "Premier League"),
    ("la liga", "La Liga"),
    ("laliga", "La Liga"),
    ("serie a", "Serie A"),
    ("bundesliga", "Bundesliga"),
    ("ligue 1", "Ligue 1"),
];

/// Canonical player key followed by the spellings that identify them in a query.
pub const PLAYER_ALIASES: &[(&str, &[&str])] = &[
    ("mbappe", &["mbappe", "mbappé", "kylian"]),
    ("salah", &["salah", "mohamed salah", "mo salah"]),
    ("haaland", &["haaland", "erling", "erling haaland"]),
    ("messi", &["messi", "lionel", "lionel messi"]),
    ("ronaldo", &["ronaldo", "cristiano"]),
    ("neymar", &["neymar", "neymar jr"]),
    ("benzema", &["benzema", "karim"]),
    ("kane", &["kane", "harry kane"]),
    ("lewandowski", &["lewandowski", "robert"]),
    ("mbeumo", &["mbeumo", "bryan mbeumo", "meumo"]),
    ("luis diaz", &["luis diaz", "diaz", "luis díaz"]),
    ("son", &["son", "heung-min", "son heung-min"]),
    ("sterling", &["sterling", "raheem"]),
    ("saka", &["saka", "bukayo"]),
    ("foden", &["foden", "phil"]),
    ("isak", &["isak", "alexander isak"]),
];

static PRICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"under\s*€?(\d+(?:\.\d+)?)",
        r"below\s*€?(\d+(?:\.\d+)?)",
        r"less than\s*€?(\d+(?:\.\d+)?)",
        r"up to\s*€?(\d+(?:\.\d+)?)",
        r"maximum\s*€?(\d+(?:\.\d+)?)",
        r"max\s*€?(\d+(?:\.\d+)?)",
    ])
});

static AGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"under\s*(\d+)",
        r"below\s*(\d+)",
        r"young.*under\s*(\d+)",
        r"(\d+)\s*and under",
    ])
});

pub const MIN_AGE_CEILING: u32 = 18;
pub const MAX_AGE_CEILING: u32 = 35;
pub const YOUNG_TALENT_AGE_CEILING: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionClass {
    Winger,
    Striker,
    Forward,
    Finisher,
}

impl PositionClass {
    /// Checked in this order; the first keyword present wins.
    pub const ORDER: [PositionClass; 4] = [
        PositionClass::Winger,
        PositionClass::Striker,
        PositionClass::Forward,
        PositionClass::Finisher,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PositionClass::Winger => "winger",
            PositionClass::Striker => "striker",
            PositionClass::Forward => "forward",
            PositionClass::Finisher => "finisher",
        }
    }

    pub fn position_codes(self) -> &'static [&'static str] {
        match self {
            PositionClass::Winger => &["LW", "RW"],
            PositionClass::Striker => &["ST", "CF"],
            PositionClass::Forward | PositionClass::Finisher => &["ST", "CF", "LW", "RW"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortAttribute {
    Pace,
    Physical,
    Shooting,
    #[default]
    Overall,
    MarketValue,
}

impl SortAttribute {
    /// Cheapest-first is the only ascending ranking.
    pub fn ascending(self) -> bool {
        matches!(self, SortAttribute::MarketValue)
    }

    pub fn column(self) -> &'static str {
        match self {
            SortAttribute::Pace => "PACE",
            SortAttribute::Physical => "PHYSICAL",
            SortAttribute::Shooting => "SHOOTING",
            SortAttribute::Overall => "OVR",
            SortAttribute::MarketValue => "market_value",
        }
    }
}

/// Every filter dimension pulled out of one query. Built fresh per query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryFacets {
    pub nationality_codes: Option<&'static [&'static str]>,
    pub price_ceiling: Option<f64>,
    pub age_ceiling: Option<u32>,
    pub league_name: Option<&'static str>,
    pub position_class: Option<PositionClass>,
    pub comparison_players: Vec<&'static str>,
    pub sort_attribute: SortAttribute,
}

impl QueryFacets {
    pub fn extract(query: &str) -> Self {
        Self {
            nationality_codes: extract_nationality(query),
            price_ceiling: extract_price_ceiling(query),
            age_ceiling: extract_age_ceiling(query),
            league_name: extract_league(query),
            position_class: extract_position_class(query),
            comparison_players: extract_comparison_players(query),
            sort_attribute: extract_sort_attribute(query),
        }
    }
}

pub fn extract_nationality(query: &str) -> Option<&'static [&'static str]> {
    let q = query.to_lowercase();
    NATIONALITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| q.contains(keyword))
        .map(|(_, codes)| *codes)
}

/// Budget ceiling in €M.
pub fn extract_price_ceiling(query: &str) -> Option<f64> {
    let q = query.to_lowercase();
    PRICE_PATTERNS
        .iter()
        .find_map(|re| re.captures(&q))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn extract_age_ceiling(query: &str) -> Option<u32> {
    let q = query.to_lowercase();
    for re in AGE_PATTERNS.iter() {
        let Some(caps) = re.captures(&q) else {
            continue;
        };
        let Some(age) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };
        if (MIN_AGE_CEILING..=MAX_AGE_CEILING).contains(&age) {
            return Some(age);
        }
    }
    if q.contains("young") && q.contains("talent") {
        return Some(YOUNG_TALENT_AGE_CEILING);
    }
    None
}

pub fn extract_league(query: &str) -> Option<&'static str> {
    let q = query.to_lowercase();
    LEAGUE_KEYWORDS
        .iter()
        .find(|(keyword, _)| q.contains(keyword))
        .map(|(_, league)| *league)
}

pub fn extract_position_class(query: &str) -> Option<PositionClass> {
    let q = query.to_lowercase();
    PositionClass::ORDER
        .into_iter()
        .find(|class| q.contains(class.keyword()))
}

/// Canonical keys of the players named in the query, in order of first mention.
pub fn extract_comparison_players(query: &str) -> Vec<&'static str> {
    let q = query.to_lowercase();
    let mut found: Vec<(usize, &'static str)> = PLAYER_ALIASES
        .iter()
        .filter_map(|(key, variants)| {
            variants
                .iter()
                .filter_map(|variant| q.find(variant))
                .min()
                .map(|pos| (pos, *key))
        })
        .collect();
    // Stable sort keeps table order for aliases that start at the same offset.
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, key)| key).collect()
}

pub fn extract_sort_attribute(query: &str) -> SortAttribute {
    let q = query.to_lowercase();
    if q.contains("fastest") {
        SortAttribute::Pace
    } else if q.contains("strongest") {
        SortAttribute::Physical
    } else if q.contains("finisher") || q.contains("finishing") {
        SortAttribute::Shooting
    } else if q.contains("cheapest") {
        SortAttribute::MarketValue
    } else {
        // "talent" / "potential" rank by OVR, which is also the default.
        SortAttribute::Overall
    }
}

/// Name-matching pattern for a canonical player key.
pub fn player_name_pattern(key: &str) -> String {
    match key {
        "luis diaz" => r"luis.*d[ií]az".to_string(),
        "mbeumo" => r"mb[eu]umo".to_string(),
        other => regex::escape(other).replace(' ', ".*"),
    }
}

pub(crate) fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static query pattern should compile"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_ceiling_reads_decimal_with_currency() {
        assert_eq!(extract_price_ceiling("wingers under €12.5m"), Some(12.5));
        assert_eq!(extract_price_ceiling("max 40 please"), Some(40.0));
        assert_eq!(extract_price_ceiling("fastest wingers"), None);
    }

    #[test]
    fn age_ceiling_outside_range_falls_through() {
        // "under 50" is a price, not an age.
        assert_eq!(extract_age_ceiling("strikers under 50"), None);
        assert_eq!(extract_age_ceiling("wingers 23 and under"), Some(23));
        assert_eq!(extract_age_ceiling("young talent in spain"), Some(25));
    }

    #[test]
    fn position_class_prefers_winger_over_striker() {
        assert_eq!(
            extract_position_class("winger or striker"),
            Some(PositionClass::Winger)
        );
        assert_eq!(
            extract_position_class("best finishers"),
            Some(PositionClass::Finisher)
        );
    }

    #[test]
    fn comparison_players_follow_mention_order() {
        assert_eq!(
            extract_comparison_players("is Haaland better than Kylian Mbappé?"),
            vec!["haaland", "mbappe"]
        );
        assert_eq!(extract_comparison_players("meumo vs saka"), vec!["mbeumo", "saka"]);
    }

    #[test]
    fn name_patterns_escape_and_join_words() {
        assert_eq!(player_name_pattern("kane"), "kane");
        assert_eq!(player_name_pattern("mbeumo"), "mb[eu]umo");
        assert_eq!(player_name_pattern("luis diaz"), r"luis.*d[ií]az");
    }
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::facets::compile_all;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Singular,
    Plural,
    Comparison,
}

impl Intent {
    pub fn label(self) -> &'static str {
        match self {
            Intent::Singular => "singular",
            Intent::Plural => "plural",
            Intent::Comparison => "comparison",
        }
    }
}

static COMPARISON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\bwho is better\b",
        r"\bbetter\b.*\bor\b",
        r"\bvs\b",
        r"\bversus\b",
        r"\bcompare\b",
        r"\b\w+\s+or\s+\w+\b",
    ])
});

static PLURAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\bwho are\b",
        r"\bshow me\b",
        r"\blist\b",
        r"\bfind\b",
        r"\bwingers\b",
        r"\bstrikers\b",
        r"\bforwards\b",
        r"\bplayers\b",
        r"\btalents\b",
        r"\bfinishers\b",
        r"\btop \d+\b",
        r"\bbest \d+\b",
        r"\bcheapest \w+s\b",
        r"\bfastest \w+s\b",
        r"\bstrongest \w+s\b",
    ])
});

static SINGULAR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\bwho is the\b",
        r"\bwhat is the\b",
        r"\bwhich is the\b",
        r"\btell me about\b",
    ])
});

// Superlatives only count as singular when they are not followed by a count
// ("the best 5") or a plural noun ("the fastest wingers").
static BARE_SUPERLATIVES: Lazy<Vec<(Regex, Regex)>> = Lazy::new(|| {
    let pair = |head: &str, tail: &str| {
        (
            Regex::new(head).expect("static superlative pattern should compile"),
            Regex::new(tail).expect("static superlative tail should compile"),
        )
    };
    vec![
        pair(r"\bthe best\b", r"^\s+\d+"),
        pair(r"\bthe fastest\b", r"^\s+\w+s\b"),
        pair(r"\bthe strongest\b", r"^\s+\w+s\b"),
    ]
});

/// Assigns the presentation shape of a query. Never fails; ambiguous queries are plural.
pub fn classify(query: &str) -> Intent {
    let q = query.to_lowercase();

    if COMPARISON_PATTERNS.iter().any(|re| re.is_match(&q)) {
        return Intent::Comparison;
    }
    if PLURAL_PATTERNS.iter().any(|re| re.is_match(&q)) {
        return Intent::Plural;
    }
    if SINGULAR_PATTERNS.iter().any(|re| re.is_match(&q)) || has_bare_superlative(&q) {
        return Intent::Singular;
    }
    Intent::Plural
}

fn has_bare_superlative(q: &str) -> bool {
    BARE_SUPERLATIVES.iter().any(|(head, excluded_tail)| {
        head.find_iter(q)
            .any(|m| !excluded_tail.is_match(&q[m.end()..]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_superlative_needs_no_plural_tail() {
        assert!(has_bare_superlative("the fastest in spain"));
        assert!(!has_bare_superlative("the fastest wingers"));
        assert!(!has_bare_superlative("the best 5"));
        assert!(has_bare_superlative("the best"));
    }

    #[test]
    fn or_phrasing_is_a_comparison() {
        assert_eq!(classify("Salah or Saka?"), Intent::Comparison);
    }

    #[test]
    fn counts_make_a_query_plural() {
        assert_eq!(classify("top 5 in la liga"), Intent::Plural);
    }
}

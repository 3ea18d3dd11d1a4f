//! Narrows the player table for one query and ranks what is left.
//!
//! Facets are applied in a fixed order (nationality, age, league, position). When
//! that leaves nothing and a nationality was asked for, relaxed "suggestions" are
//! produced instead. A price ceiling splits the main set and spills near-misses
//! into suggestions, then exactly one ranking rule orders both sets.

use std::cmp::Ordering;

use log::debug;
use regex::RegexBuilder;

use crate::facets::{PositionClass, QueryFacets, SortAttribute, player_name_pattern};
use crate::player_table::{Player, PlayerTable, Skill};

pub const MAX_MAIN_RESULTS: usize = 15;
pub const MAX_SUGGESTIONS: usize = 3;
pub const MAX_COMPARISON_RESULTS: usize = 10;

/// Extra years allowed when falling back to the same-nationality snapshot.
pub const NATIONALITY_FALLBACK_AGE_SLACK: u32 = 3;
/// Extra years allowed when falling back to the whole table.
pub const BROAD_FALLBACK_AGE_SLACK: u32 = 2;
pub const PRICE_SPILLOVER_FACTOR: f64 = 1.5;
pub const PRICE_SPILLOVER_MAX: usize = 2;
/// Fast-and-cheap queries keep players at or above this pace quantile.
pub const FAST_CHEAP_PACE_QUANTILE: f64 = 0.6;

pub type ResultSet<'a> = Vec<&'a Player>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingRule {
    FastAndCheap,
    Attribute(SortAttribute),
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome<'a> {
    pub main: ResultSet<'a>,
    pub suggestions: ResultSet<'a>,
}

impl FilterOutcome<'_> {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.suggestions.is_empty()
    }
}

/// Runs the full pipeline, extracting facets from `query` first.
pub fn filter<'a>(query: &str, table: &'a PlayerTable) -> FilterOutcome<'a> {
    let facets = QueryFacets::extract(query);
    filter_with_facets(query, &facets, table)
}

pub fn filter_with_facets<'a>(
    query: &str,
    facets: &QueryFacets,
    table: &'a PlayerTable,
) -> FilterOutcome<'a> {
    let q = query.to_lowercase();
    debug!("filtering {} players for query: {query}", table.len());

    let asks_comparison = q.contains("better") || q.contains("vs") || q.contains("compare");
    if asks_comparison && !facets.comparison_players.is_empty() {
        return comparison_matches(&facets.comparison_players, table);
    }

    let mut working: ResultSet<'a> = table.iter().collect();

    if let Some(codes) = facets.nationality_codes {
        working.retain(|p| p.nation_matches(codes));
        debug!("after nationality filter {codes:?}: {}", working.len());
    }
    let after_nationality = working.clone();

    if let Some(age) = facets.age_ceiling {
        working.retain(|p| p.age < age);
        debug!("after age filter (<{age}): {}", working.len());
    }
    if let Some(league) = facets.league_name {
        working.retain(|p| p.league_matches(league));
        debug!("after {league} filter: {}", working.len());
    }
    if let Some(class) = facets.position_class {
        working.retain(|p| p.position_matches(class.position_codes()));
        debug!("after {} filter: {}", class.keyword(), working.len());
    }

    let mut main = working;
    let mut suggestions: ResultSet<'a> = Vec::new();

    if main.is_empty() && facets.nationality_codes.is_some() {
        suggestions = fallback_suggestions(&q, facets, table, &after_nationality);
    }

    if let Some(ceiling) = facets.price_ceiling {
        if !main.is_empty() {
            apply_price_ceiling(ceiling, &mut main, &mut suggestions);
            debug!(
                "after price filter: main={}, suggestions={}",
                main.len(),
                suggestions.len()
            );
        }
    }

    match ranking_rule(&q, facets) {
        RankingRule::FastAndCheap => {
            if table.has_skill(Skill::Pace) && !main.is_empty() {
                main = fast_and_cheap(main);
                debug!("fast + cheap filter: {}", main.len());
            }
        }
        RankingRule::Attribute(attr) => {
            rank_by(&mut main, attr, table);
            rank_by(&mut suggestions, attr, table);
        }
    }

    main.truncate(MAX_MAIN_RESULTS);
    suggestions.truncate(MAX_SUGGESTIONS);
    FilterOutcome { main, suggestions }
}

/// The compound fast-and-cheap phrasing outranks any single sort keyword.
pub fn ranking_rule(query_lower: &str, facets: &QueryFacets) -> RankingRule {
    if query_lower.contains("fastest")
        && query_lower.contains("lowest")
        && query_lower.contains("market value")
    {
        RankingRule::FastAndCheap
    } else {
        RankingRule::Attribute(facets.sort_attribute)
    }
}

fn comparison_matches<'a>(players: &[&str], table: &'a PlayerTable) -> FilterOutcome<'a> {
    let combined = players
        .iter()
        .map(|key| player_name_pattern(key))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(re) = RegexBuilder::new(&combined).case_insensitive(true).build() else {
        return FilterOutcome::default();
    };
    let main: ResultSet<'a> = table
        .iter()
        .filter(|p| re.is_match(&p.name.to_lowercase()))
        .take(MAX_COMPARISON_RESULTS)
        .collect();
    debug!("after comparison filter {players:?}: {}", main.len());
    if main.is_empty() {
        debug!("no exact matches found for comparison players");
    }
    FilterOutcome {
        main,
        suggestions: Vec::new(),
    }
}

fn fallback_suggestions<'a>(
    query_lower: &str,
    facets: &QueryFacets,
    table: &'a PlayerTable,
    after_nationality: &[&'a Player],
) -> ResultSet<'a> {
    let same_nation: ResultSet<'a> = after_nationality
        .iter()
        .copied()
        .filter(|p| match facets.age_ceiling {
            Some(age) => p.age < age + NATIONALITY_FALLBACK_AGE_SLACK,
            None => true,
        })
        .take(MAX_SUGGESTIONS)
        .collect();
    if !same_nation.is_empty() {
        debug!("fallback suggestions (same nationality): {}", same_nation.len());
        return same_nation;
    }

    let wants_finisher = query_lower.contains("finisher");
    let broad: ResultSet<'a> = table
        .iter()
        .filter(|p| match facets.age_ceiling {
            Some(age) => p.age < age + BROAD_FALLBACK_AGE_SLACK,
            None => true,
        })
        .filter(|p| !wants_finisher || p.position_matches(PositionClass::Finisher.position_codes()))
        .take(MAX_SUGGESTIONS)
        .collect();
    debug!("broad fallback suggestions: {}", broad.len());
    broad
}

fn apply_price_ceiling<'a>(
    ceiling: f64,
    main: &mut ResultSet<'a>,
    suggestions: &mut ResultSet<'a>,
) {
    let stretch = ceiling * PRICE_SPILLOVER_FACTOR;
    let over_budget: ResultSet<'a> = main
        .iter()
        .copied()
        .filter(|p| p.market_value > ceiling && p.market_value <= stretch)
        .take(PRICE_SPILLOVER_MAX)
        .collect();
    main.retain(|p| p.market_value <= ceiling);

    for player in over_budget {
        if !suggestions.iter().any(|s| std::ptr::eq(*s, player)) {
            suggestions.push(player);
        }
    }
    suggestions.truncate(MAX_SUGGESTIONS);
}

fn fast_and_cheap(main: ResultSet<'_>) -> ResultSet<'_> {
    let paces: Vec<f64> = main.iter().filter_map(|p| p.pace).collect();
    let Some(threshold) = quantile(&paces, FAST_CHEAP_PACE_QUANTILE) else {
        return main;
    };
    let mut fast: ResultSet<'_> = main
        .into_iter()
        .filter(|p| p.pace.is_some_and(|pace| pace >= threshold))
        .collect();
    fast.sort_by(|a, b| cmp_f64(a.market_value, b.market_value));
    fast.truncate(MAX_MAIN_RESULTS);
    fast
}

/// Sorts by `attr`, falling back to OVR descending when the column is absent.
fn rank_by(rows: &mut ResultSet<'_>, attr: SortAttribute, table: &PlayerTable) {
    if rows.is_empty() {
        return;
    }
    let attr = match sort_skill(attr) {
        Some(skill) if !table.has_skill(skill) => {
            debug!("column {} not found, falling back to OVR", attr.column());
            SortAttribute::Overall
        }
        _ => attr,
    };
    rows.sort_by(|a, b| {
        let (va, vb) = (sort_value(a, attr), sort_value(b, attr));
        // Missing cells always sort last, whatever the direction.
        match (va, vb) {
            (Some(x), Some(y)) if attr.ascending() => cmp_f64(x, y),
            (Some(x), Some(y)) => cmp_f64(y, x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

fn sort_skill(attr: SortAttribute) -> Option<Skill> {
    match attr {
        SortAttribute::Pace => Some(Skill::Pace),
        SortAttribute::Physical => Some(Skill::Physical),
        SortAttribute::Shooting => Some(Skill::Shooting),
        SortAttribute::Overall | SortAttribute::MarketValue => None,
    }
}

fn sort_value(player: &Player, attr: SortAttribute) -> Option<f64> {
    match attr {
        SortAttribute::Pace => player.pace,
        SortAttribute::Physical => player.physical,
        SortAttribute::Shooting => player.shooting,
        SortAttribute::Overall => Some(player.overall_rating),
        SortAttribute::MarketValue => Some(player.market_value),
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Linear-interpolated quantile of `values`, `q` in [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| cmp_f64(*a, *b));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates_between_ranks() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let q60 = quantile(&values, 0.6).unwrap();
        assert!((q60 - 3.4).abs() < 1e-9);
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(5.0));
        assert_eq!(quantile(&[], 0.6), None);
    }

    #[test]
    fn compound_phrase_wins_over_sort_keyword() {
        let q = "fastest wingers with the lowest market value";
        let facets = QueryFacets::extract(q);
        assert_eq!(facets.sort_attribute, SortAttribute::Pace);
        assert_eq!(ranking_rule(q, &facets), RankingRule::FastAndCheap);
    }
}

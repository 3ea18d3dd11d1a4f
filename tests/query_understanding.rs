use scout_assistant::classify::{Intent, classify};
use scout_assistant::facets::{PositionClass, QueryFacets, SortAttribute};

#[test]
fn comparison_phrasing_wins_over_everything() {
    assert_eq!(classify("compare Mbappe vs Haaland"), Intent::Comparison);
    assert_eq!(classify("Who is better, Salah or Saka?"), Intent::Comparison);
    assert_eq!(classify("Kane versus Isak for a title push"), Intent::Comparison);
    // Plural nouns do not override an explicit comparison.
    assert_eq!(classify("compare the fastest wingers"), Intent::Comparison);
}

#[test]
fn list_requests_are_plural() {
    assert_eq!(classify("show me fast wingers"), Intent::Plural);
    assert_eq!(classify("top 5 strikers in Serie A"), Intent::Plural);
    assert_eq!(classify("who is the best 3 in la liga"), Intent::Plural);
    assert_eq!(classify("the fastest wingers in spain"), Intent::Plural);
}

#[test]
fn single_player_questions_are_singular() {
    assert_eq!(classify("who is the best striker"), Intent::Singular);
    assert_eq!(classify("What is the fastest winger?"), Intent::Singular);
    assert_eq!(classify("tell me about Kane"), Intent::Singular);
    assert_eq!(classify("the fastest in spain"), Intent::Singular);
}

#[test]
fn unmatched_queries_default_to_plural() {
    assert_eq!(classify("Messi"), Intent::Plural);
    assert_eq!(classify(""), Intent::Plural);
}

#[test]
fn facets_for_budget_winger_query() {
    let facets = QueryFacets::extract("fastest French wingers under €30 million");
    assert_eq!(facets.nationality_codes, Some(&["france", "fra"][..]));
    assert_eq!(facets.price_ceiling, Some(30.0));
    // The currency sign keeps "under €30" from reading as an age.
    assert_eq!(facets.age_ceiling, None);
    assert_eq!(facets.league_name, None);
    assert_eq!(facets.position_class, Some(PositionClass::Winger));
    assert!(facets.comparison_players.is_empty());
    assert_eq!(facets.sort_attribute, SortAttribute::Pace);
}

#[test]
fn bare_number_is_both_age_and_price() {
    let facets = QueryFacets::extract("young french strikers under 19");
    assert_eq!(facets.age_ceiling, Some(19));
    assert_eq!(facets.price_ceiling, Some(19.0));
    assert_eq!(facets.position_class, Some(PositionClass::Striker));
}

#[test]
fn league_and_sort_keywords() {
    let facets = QueryFacets::extract("Cheapest forwards in the Premier League");
    assert_eq!(facets.league_name, Some("Premier League"));
    assert_eq!(facets.sort_attribute, SortAttribute::MarketValue);
    assert!(facets.sort_attribute.ascending());

    let facets = QueryFacets::extract("strongest strikers in serie a");
    assert_eq!(facets.league_name, Some("Serie A"));
    assert_eq!(facets.sort_attribute, SortAttribute::Physical);

    let facets = QueryFacets::extract("clinical finishers");
    assert_eq!(facets.position_class, Some(PositionClass::Finisher));
    assert_eq!(facets.sort_attribute, SortAttribute::Shooting);
}

#[test]
fn facets_absent_for_plain_query() {
    let facets = QueryFacets::extract("tell me something interesting");
    assert_eq!(facets, QueryFacets::default());
}

#[test]
fn comparison_players_resolve_aliases() {
    let facets = QueryFacets::extract("Is Mo Salah better than Luis Díaz?");
    assert_eq!(facets.comparison_players, vec!["salah", "luis diaz"]);
}

use std::fmt::Write as _;

use crate::classify::Intent;
use crate::facets::QueryFacets;
use crate::player_table::{Player, PlayerTable, Skill};

pub const MAX_CONTEXT_PLAYERS: usize = 8;
pub const MAX_SOURCES: usize = 5;

const TABLE_NAME_CHARS: usize = 15;
const TABLE_TIER_CHARS: usize = 12;

/// Skills described in the answer context, in display order.
pub const CONTEXT_SKILLS: [Skill; 5] = [
    Skill::Pace,
    Skill::Shooting,
    Skill::Passing,
    Skill::Dribbling,
    Skill::Physical,
];

// Phrases per tier: >= 2.0, >= 1.0, >= 0.0, below zero.
fn tier_phrases(skill: Skill) -> [&'static str; 4] {
    match skill {
        Skill::Pace => [
            "lightning fast pace that terrorizes defenders",
            "very fast with explosive acceleration",
            "good pace and mobility",
            "average pace",
        ],
        Skill::Shooting => [
            "world-class finishing ability",
            "excellent shooting and clinical finishing",
            "good finishing skills",
            "average shooting",
        ],
        Skill::Passing => [
            "exceptional vision and passing range",
            "excellent passing and distribution",
            "good passing ability",
            "average passing",
        ],
        Skill::Dribbling => [
            "exceptional dribbling and ball control",
            "excellent dribbling skills",
            "good ball control",
            "average dribbling",
        ],
        Skill::Physical => [
            "exceptional physical presence and strength",
            "very strong and robust",
            "good physicality",
            "average strength",
        ],
        Skill::Aerial => [
            "dominant in the air",
            "excellent heading ability",
            "decent aerial presence",
            "average in the air",
        ],
        Skill::Mental => [
            "outstanding composure and decision-making",
            "excellent composure under pressure",
            "good game intelligence",
            "average mentality",
        ],
    }
}

/// Qualitative description of a standardized skill value. The number itself never leaks.
pub fn skill_tier(skill: Skill, value: f64) -> &'static str {
    let [elite, strong, good, average] = tier_phrases(skill);
    if value >= 2.0 {
        elite
    } else if value >= 1.0 {
        strong
    } else if value >= 0.0 {
        good
    } else {
        average
    }
}

/// Tier descriptions for the skills the table carries; missing cells read "unknown".
pub fn describe_skills(
    player: &Player,
    table: &PlayerTable,
    skills: &[Skill],
) -> Vec<(Skill, &'static str)> {
    skills
        .iter()
        .filter(|skill| table.has_skill(**skill))
        .map(|skill| {
            let text = player
                .skill(*skill)
                .map(|v| skill_tier(*skill, v))
                .unwrap_or("unknown");
            (*skill, text)
        })
        .collect()
}

pub fn format_market_value(value: f64) -> String {
    format!("€{value:.1}M")
}

pub fn format_overall(rating: f64) -> String {
    format!("{rating:.1}/100")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledContext {
    pub context: String,
    pub suggestions_text: String,
    pub comparison_table: String,
    pub sources: Vec<String>,
}

pub fn max_players_in_context(intent: Intent, main_len: usize) -> usize {
    match intent {
        Intent::Singular => main_len.min(1),
        Intent::Plural | Intent::Comparison => main_len.min(MAX_CONTEXT_PLAYERS),
    }
}

pub fn assemble(
    main: &[&Player],
    suggestions: &[&Player],
    intent: Intent,
    facets: &QueryFacets,
    table: &PlayerTable,
) -> AssembledContext {
    let mut out = AssembledContext::default();

    let take = max_players_in_context(intent, main.len());
    for (idx, player) in main.iter().take(take).enumerate() {
        write_player_block(&mut out.context, &format!("Player {}", idx + 1), player, table, true);
        out.sources.push(player.name.clone());
    }

    if !suggestions.is_empty() {
        out.suggestions_text.push_str("\n\n");
        out.suggestions_text.push_str(suggestions_header(facets));
        out.suggestions_text.push('\n');
        for (idx, player) in suggestions.iter().enumerate() {
            write_player_block(
                &mut out.suggestions_text,
                &format!("Option {}", idx + 1),
                player,
                table,
                false,
            );
        }
    }

    if intent == Intent::Comparison {
        out.comparison_table = comparison_table(main, table);
    }

    out
}

fn suggestions_header(facets: &QueryFacets) -> &'static str {
    if facets.price_ceiling.is_some() {
        "SLIGHTLY OVER BUDGET OPTIONS:"
    } else if facets.nationality_codes.is_some() {
        "ALTERNATIVE OPTIONS (different criteria):"
    } else {
        "ADDITIONAL SUGGESTIONS:"
    }
}

fn write_player_block(
    out: &mut String,
    heading: &str,
    player: &Player,
    table: &PlayerTable,
    with_play_style: bool,
) {
    let _ = writeln!(out, "{heading}: {}", player.name);
    let _ = writeln!(
        out,
        "- Team: {} ({})",
        or_unknown(&player.team),
        or_unknown(&player.league)
    );
    let _ = writeln!(out, "- Age: {} years", player.age);
    let _ = writeln!(out, "- Position: {}", or_unknown(&player.position));
    let _ = writeln!(out, "- Nation: {}", or_unknown(&player.nation));
    let _ = writeln!(out, "- Market Value: {}", format_market_value(player.market_value));
    let _ = writeln!(out, "- Overall Rating: {}", format_overall(player.overall_rating));
    for (skill, text) in describe_skills(player, table, &CONTEXT_SKILLS) {
        let _ = writeln!(out, "- {}: {text}", skill.label());
    }
    if with_play_style {
        if let Some(style) = player.play_style.as_deref() {
            let _ = writeln!(out, "- Play Style: {style}");
        }
    }
    out.push('\n');
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    }
}

/// Fixed-column markdown table used for head-to-head questions.
pub fn comparison_table(players: &[&Player], table: &PlayerTable) -> String {
    if players.is_empty() {
        return "No players to compare.".to_string();
    }
    let mut out = String::from("\n**COMPARISON TABLE:**\n");
    out.push_str("| Player | Age | Value | Pace | Shooting | Physical | Overall |\n");
    out.push_str("|--------|-----|-------|------|----------|----------|---------|\n");
    for player in players {
        let tier = |skill: Skill| {
            let text = if table.has_skill(skill) {
                player
                    .skill(skill)
                    .map(|v| skill_tier(skill, v))
                    .unwrap_or("unknown")
            } else {
                "unknown"
            };
            clip_with_ellipsis(text, TABLE_TIER_CHARS)
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            player.name.chars().take(TABLE_NAME_CHARS).collect::<String>(),
            player.age,
            format_market_value(player.market_value),
            tier(Skill::Pace),
            tier(Skill::Shooting),
            tier(Skill::Physical),
            format_overall(player.overall_rating),
        );
    }
    out
}

fn clip_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut clipped: String = text.chars().take(max_chars).collect();
        clipped.push_str("...");
        clipped
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_use_fixed_thresholds() {
        assert_eq!(
            skill_tier(Skill::Pace, 2.0),
            "lightning fast pace that terrorizes defenders"
        );
        assert_eq!(skill_tier(Skill::Pace, 1.99), "very fast with explosive acceleration");
        assert_eq!(skill_tier(Skill::Shooting, 0.0), "good finishing skills");
        assert_eq!(skill_tier(Skill::Physical, -0.1), "average strength");
    }

    #[test]
    fn clip_adds_ellipsis_only_when_long() {
        assert_eq!(clip_with_ellipsis("average pace", 12), "average pace");
        assert_eq!(clip_with_ellipsis("good physicality", 12), "good physica...");
    }

    #[test]
    fn singular_context_holds_one_player() {
        assert_eq!(max_players_in_context(Intent::Singular, 12), 1);
        assert_eq!(max_players_in_context(Intent::Plural, 12), 8);
        assert_eq!(max_players_in_context(Intent::Comparison, 3), 3);
        assert_eq!(max_players_in_context(Intent::Singular, 0), 0);
    }
}

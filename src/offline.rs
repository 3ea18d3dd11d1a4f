//! Basic-mode answers used when the generation service is disabled or unreachable.

use std::cmp::Ordering;
use std::fmt::Write as _;

use crate::context::{format_market_value, format_overall, skill_tier};
use crate::player_table::{Player, PlayerTable, Skill};

const BASIC_LIST_LEN: usize = 5;
const VALUE_KEYWORDS: &[&str] = &["valuable", "expensive", "price", "cost", "market"];

pub const BASIC_MODE_HELP: &str = "**Scout Assistant - Basic Mode**

The answer service is unavailable, so only simple questions are supported. Try asking:
- \"Most valuable forwards\"
- \"Who is the fastest player in Premier League?\"
- \"Best overall players\"

For full natural-language analysis, start the answer service and check SCOUT_LLM_URL.";

pub fn basic_answer(query: &str, table: &PlayerTable) -> String {
    let q = query.to_lowercase();
    if table.is_empty() {
        return BASIC_MODE_HELP.to_string();
    }

    if VALUE_KEYWORDS.iter().any(|k| q.contains(k)) {
        let top = top_by(table.iter().collect(), |p| Some(p.market_value));
        if !top.is_empty() {
            let mut out = String::from("**Most Valuable Forwards:**\n\n");
            for (idx, player) in top.iter().enumerate() {
                let _ = write!(
                    out,
                    "{}. **{}** - {}",
                    idx + 1,
                    player.name,
                    format_market_value(player.market_value)
                );
                push_team(&mut out, player);
            }
            return out;
        }
    } else if q.contains("premier") {
        let premier: Vec<&Player> = table
            .iter()
            .filter(|p| p.league_matches("Premier League"))
            .collect();
        if !premier.is_empty() {
            if q.contains("fast") && table.has_skill(Skill::Pace) {
                let fastest = top_by(premier, |p| p.pace);
                let mut out = String::from("**Fastest Premier League Forwards:**\n\n");
                for (idx, player) in fastest.iter().enumerate() {
                    let pace = player
                        .pace
                        .map(|v| skill_tier(Skill::Pace, v))
                        .unwrap_or("unknown pace");
                    let _ = write!(out, "{}. **{}** - {pace}", idx + 1, player.name);
                    push_team(&mut out, player);
                }
                return out;
            }
            let best = top_by(premier, |p| Some(p.overall_rating));
            let mut out = String::from("**Top Premier League Forwards:**\n\n");
            for (idx, player) in best.iter().enumerate() {
                let _ = write!(
                    out,
                    "{}. **{}** - Overall {}",
                    idx + 1,
                    player.name,
                    format_overall(player.overall_rating)
                );
                push_team(&mut out, player);
            }
            return out;
        }
    }

    BASIC_MODE_HELP.to_string()
}

fn top_by<'a>(mut rows: Vec<&'a Player>, key: impl Fn(&Player) -> Option<f64>) -> Vec<&'a Player> {
    rows.retain(|p| key(p).is_some());
    rows.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(Ordering::Equal)
    });
    rows.truncate(BASIC_LIST_LEN);
    rows
}

fn push_team(out: &mut String, player: &Player) {
    if !player.team.trim().is_empty() {
        let _ = write!(out, " ({})", player.team);
    }
    out.push('\n');
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;

use scout_assistant::assistant::{QueryReport, analyze};
use scout_assistant::config::ScoutConfig;
use scout_assistant::context::format_market_value;
use scout_assistant::player_table::{Player, PlayerTable};

// Prints how each query is classified and filtered, without calling the answer service.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = ScoutConfig::from_env();
    let data_path = flag_value(&args, "--data")
        .map(PathBuf::from)
        .unwrap_or(cfg.data_path);
    let table = PlayerTable::load_csv(&data_path)?;

    let mut queries: Vec<String> = Vec::new();
    if let Some(file) = flag_value(&args, "--file") {
        let raw = fs::read_to_string(&file).with_context(|| format!("read queries from {file}"))?;
        queries.extend(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(str::to_string),
        );
    }
    let free_args = positional_args(&args);
    if !free_args.is_empty() {
        queries.push(free_args.join(" "));
    }
    if queries.is_empty() {
        eprintln!("usage: explain_query [--data PATH] [--file QUERIES] [QUERY...]");
        return Ok(());
    }

    // Queries share the read-only table and run independently.
    let rendered: Vec<String> = queries
        .par_iter()
        .map(|q| render_report(q, &analyze(q, &table)))
        .collect();
    for block in rendered {
        println!("{block}");
    }
    Ok(())
}

fn render_report(query: &str, report: &QueryReport<'_>) -> String {
    let facets = &report.facets;
    let mut out = format!("Query: {query}\n");
    out.push_str(&format!("  intent: {}\n", report.intent.label()));
    if let Some(codes) = facets.nationality_codes {
        out.push_str(&format!("  nationality: {}\n", codes.join("|")));
    }
    if let Some(price) = facets.price_ceiling {
        out.push_str(&format!("  price ceiling: {}\n", format_market_value(price)));
    }
    if let Some(age) = facets.age_ceiling {
        out.push_str(&format!("  age ceiling: under {age}\n"));
    }
    if let Some(league) = facets.league_name {
        out.push_str(&format!("  league: {league}\n"));
    }
    if let Some(class) = facets.position_class {
        out.push_str(&format!("  position: {}\n", class.keyword()));
    }
    if !facets.comparison_players.is_empty() {
        out.push_str(&format!(
            "  players: {}\n",
            facets.comparison_players.join(", ")
        ));
    }
    out.push_str(&format!("  sort: {}\n", facets.sort_attribute.column()));
    push_rows(&mut out, "main", &report.outcome.main);
    push_rows(&mut out, "suggestions", &report.outcome.suggestions);
    out
}

fn push_rows(out: &mut String, label: &str, rows: &[&Player]) {
    out.push_str(&format!("  {label} ({}):\n", rows.len()));
    for (idx, p) in rows.iter().enumerate() {
        out.push_str(&format!(
            "    {:>2}. {} ({}, {}) age {} {} ovr {:.1}\n",
            idx + 1,
            p.name,
            p.team,
            p.position,
            p.age,
            format_market_value(p.market_value),
            p.overall_rating
        ));
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}

fn positional_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--data" || arg == "--file" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.clone());
    }
    out
}

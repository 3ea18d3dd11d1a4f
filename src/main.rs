use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use scout_assistant::assistant::{ScoutAnswer, ScoutAssistant};
use scout_assistant::config::ScoutConfig;
use scout_assistant::player_table::PlayerTable;
use scout_assistant::shortlist_export::export_shortlist;

#[derive(Debug, Default)]
struct CliArgs {
    data_path: Option<PathBuf>,
    export_path: Option<PathBuf>,
    json: bool,
    offline: bool,
    query: Vec<String>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args(std::env::args().skip(1).collect());
    let mut cfg = ScoutConfig::from_env();
    if let Some(path) = args.data_path.clone() {
        cfg.data_path = path;
    }
    if args.offline {
        cfg.llm_enabled = false;
    }

    let table = PlayerTable::load_csv(&cfg.data_path)?;
    info!("{} forwards available", table.len());
    let assistant = ScoutAssistant::from_config(&cfg, table);
    if assistant.is_offline() {
        eprintln!("[WARN] answer service unavailable, running in basic mode");
    }

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        return run_query(&assistant, &args, &query);
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("scout> ");
        io::stdout().flush().context("flush stdout")?;
        line.clear();
        if stdin.lock().read_line(&mut line).context("read query")? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            break;
        }
        run_query(&assistant, &args, query)?;
    }
    Ok(())
}

fn run_query(assistant: &ScoutAssistant, args: &CliArgs, query: &str) -> Result<()> {
    let (answer, report) = assistant.process_query_with_report(query);
    print_answer(&answer, args.json)?;

    if let Some(path) = args.export_path.as_ref() {
        let summary = export_shortlist(path, query, &report, assistant.table())?;
        eprintln!(
            "[INFO] shortlist written to {} ({} main, {} suggestions)",
            path.display(),
            summary.main,
            summary.suggestions
        );
    }
    Ok(())
}

fn print_answer(answer: &ScoutAnswer, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(answer).context("serialize answer")?
        );
        return Ok(());
    }
    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!();
        println!("Sources: {}", answer.sources.join(", "));
    }
    println!();
    Ok(())
}

fn parse_args(args: Vec<String>) -> CliArgs {
    let mut out = CliArgs::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if let Some(path) = arg.strip_prefix("--data=") {
            out.data_path = non_empty_path(path);
        } else if arg == "--data" {
            out.data_path = iter.next().as_deref().and_then(non_empty_path);
        } else if let Some(path) = arg.strip_prefix("--export=") {
            out.export_path = non_empty_path(path);
        } else if arg == "--export" {
            out.export_path = iter.next().as_deref().and_then(non_empty_path);
        } else if arg == "--json" {
            out.json = true;
        } else if arg == "--offline" {
            out.offline = true;
        } else {
            out.query.push(arg);
        }
    }
    out
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

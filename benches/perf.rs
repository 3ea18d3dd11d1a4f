use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scout_assistant::assistant::analyze;
use scout_assistant::classify::classify;
use scout_assistant::context::assemble;
use scout_assistant::facets::QueryFacets;
use scout_assistant::pipeline::filter;
use scout_assistant::player_table::{Player, PlayerTable, Skill};

const QUERIES: &[&str] = &[
    "fastest French wingers under €30 million",
    "who is the best striker in the Premier League",
    "compare Mbappe vs Haaland",
    "young english talents",
    "fastest forwards with the lowest market value",
];

const NATIONS: &[&str] = &["fr FRA", "eng ENG", "es ESP", "br BRA", "de GER", "nl NED"];
const LEAGUES: &[&str] = &["Premier League", "La Liga", "Serie A", "Bundesliga", "Ligue 1"];
const POSITIONS: &[&str] = &["ST", "LW", "RW", "CF", "LW/ST"];

fn synthetic_table(rows: usize) -> PlayerTable {
    let players = (0..rows)
        .map(|idx| {
            let spread = (idx % 50) as f64 / 10.0 - 2.5;
            Player {
                name: format!("Player {idx}"),
                age: 17 + (idx % 20) as u32,
                nation: NATIONS[idx % NATIONS.len()].to_string(),
                league: LEAGUES[idx % LEAGUES.len()].to_string(),
                team: format!("Club {}", idx % 97),
                position: POSITIONS[idx % POSITIONS.len()].to_string(),
                market_value: (idx % 120) as f64 + 0.5,
                overall_rating: 60.0 + (idx % 35) as f64,
                pace: Some(spread),
                shooting: Some(-spread),
                passing: Some(spread / 2.0),
                dribbling: Some(spread),
                physical: (idx % 7 != 0).then_some(spread / 3.0),
                aerial: None,
                mental: None,
                play_style: None,
            }
        })
        .collect();
    PlayerTable::new(players, Skill::ALL)
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_queries", |b| {
        b.iter(|| {
            for q in QUERIES {
                black_box(classify(black_box(q)));
            }
        })
    });
}

fn bench_facets(c: &mut Criterion) {
    c.bench_function("extract_facets", |b| {
        b.iter(|| {
            for q in QUERIES {
                black_box(QueryFacets::extract(black_box(q)));
            }
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let table = synthetic_table(2_000);
    c.bench_function("filter_2000_rows", |b| {
        b.iter(|| {
            for q in QUERIES {
                let outcome = filter(black_box(q), &table);
                black_box(outcome.main.len() + outcome.suggestions.len());
            }
        })
    });
}

fn bench_assemble(c: &mut Criterion) {
    let table = synthetic_table(2_000);
    let report = analyze("show me the fastest wingers in la liga", &table);
    c.bench_function("assemble_context", |b| {
        b.iter(|| {
            let assembled = assemble(
                black_box(&report.outcome.main),
                &report.outcome.suggestions,
                report.intent,
                &report.facets,
                &table,
            );
            black_box(assembled.context.len());
        })
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_facets,
    bench_filter,
    bench_assemble
);
criterion_main!(benches);

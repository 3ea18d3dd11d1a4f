use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::assistant::QueryReport;
use crate::context::{describe_skills, format_market_value, format_overall};
use crate::player_table::{Player, PlayerTable, Skill};

pub struct ExportReport {
    pub main: usize,
    pub suggestions: usize,
}

/// Writes the main results and suggestions of one query to an `.xlsx` workbook.
pub fn export_shortlist(
    path: &Path,
    query: &str,
    report: &QueryReport<'_>,
    table: &PlayerTable,
) -> Result<ExportReport> {
    let mut header = vec![
        "Rank".to_string(),
        "Set".to_string(),
        "Player".to_string(),
        "Team".to_string(),
        "League".to_string(),
        "Nation".to_string(),
        "Position".to_string(),
        "Age".to_string(),
        "Market Value".to_string(),
        "Overall".to_string(),
    ];
    let skills: Vec<Skill> = Skill::ALL
        .into_iter()
        .filter(|s| table.has_skill(*s))
        .collect();
    header.extend(skills.iter().map(|s| s.label().to_string()));

    let mut shortlist_rows = vec![header];
    shortlist_rows.extend(
        report
            .outcome
            .main
            .iter()
            .enumerate()
            .map(|(idx, p)| player_row(idx + 1, "Main", p, table, &skills)),
    );
    shortlist_rows.extend(
        report
            .outcome
            .suggestions
            .iter()
            .enumerate()
            .map(|(idx, p)| player_row(idx + 1, "Suggestion", p, table, &skills)),
    );

    let facets = &report.facets;
    let query_rows = vec![
        vec!["Field".to_string(), "Value".to_string()],
        vec!["Query".to_string(), query.to_string()],
        vec!["Intent".to_string(), report.intent.label().to_string()],
        vec![
            "Nationality".to_string(),
            facets
                .nationality_codes
                .map(|codes| codes.join(", "))
                .unwrap_or_default(),
        ],
        vec![
            "Price ceiling".to_string(),
            facets.price_ceiling.map(format_market_value).unwrap_or_default(),
        ],
        vec!["Age ceiling".to_string(), opt_to_string(facets.age_ceiling)],
        vec![
            "League".to_string(),
            facets.league_name.unwrap_or_default().to_string(),
        ],
        vec![
            "Position".to_string(),
            facets
                .position_class
                .map(|c| c.keyword().to_string())
                .unwrap_or_default(),
        ],
        vec![
            "Compared players".to_string(),
            facets.comparison_players.join(", "),
        ],
        vec![
            "Sort".to_string(),
            facets.sort_attribute.column().to_string(),
        ],
        vec![
            "Generated".to_string(),
            Local::now().format("%Y-%m-%d %H:%M").to_string(),
        ],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shortlist").context("name shortlist sheet")?;
        write_rows(sheet, &shortlist_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Query").context("name query sheet")?;
        write_rows(sheet, &query_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save shortlist workbook: {}", path.display()))?;

    Ok(ExportReport {
        main: report.outcome.main.len(),
        suggestions: report.outcome.suggestions.len(),
    })
}

// Skills are exported as tier phrases, never as the underlying values.
fn player_row(
    rank: usize,
    set: &str,
    player: &Player,
    table: &PlayerTable,
    skills: &[Skill],
) -> Vec<String> {
    let mut row = vec![
        rank.to_string(),
        set.to_string(),
        player.name.clone(),
        player.team.clone(),
        player.league.clone(),
        player.nation.clone(),
        player.position.clone(),
        player.age.to_string(),
        format_market_value(player.market_value),
        format_overall(player.overall_rating),
    ];
    row.extend(
        describe_skills(player, table, skills)
            .into_iter()
            .map(|(_, text)| text.to_string()),
    );
    row
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

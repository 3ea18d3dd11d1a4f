use log::{debug, info, warn};
use serde::Serialize;

use crate::classify::{Intent, classify};
use crate::config::ScoutConfig;
use crate::context::{MAX_SOURCES, assemble};
use crate::facets::QueryFacets;
use crate::generation::{Generator, OllamaClient};
use crate::offline;
use crate::pipeline::{FilterOutcome, filter_with_facets};
use crate::player_table::PlayerTable;
use crate::prompt::{PromptInputs, build_prompt};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoutAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Intent, facets and filter results for one query, before any text generation.
#[derive(Debug, Clone)]
pub struct QueryReport<'a> {
    pub intent: Intent,
    pub facets: QueryFacets,
    pub outcome: FilterOutcome<'a>,
}

pub fn analyze<'a>(query: &str, table: &'a PlayerTable) -> QueryReport<'a> {
    let intent = classify(query);
    let facets = QueryFacets::extract(query);
    let outcome = filter_with_facets(query, &facets, table);
    QueryReport {
        intent,
        facets,
        outcome,
    }
}

/// Apology returned when neither main results nor suggestions exist.
pub fn no_match_message(facets: &QueryFacets) -> String {
    let mut msg = String::from("I couldn't find any players matching your specific criteria. ");
    if let Some(code) = facets.nationality_codes.and_then(|codes| codes.first()) {
        msg.push_str(&format!("There might not be any players from {code} "));
    }
    if let Some(age) = facets.age_ceiling {
        msg.push_str(&format!("under {age} years old "));
    }
    msg.push_str("in our database. Try broadening your search criteria.");
    msg
}

pub struct ScoutAssistant {
    table: PlayerTable,
    generator: Option<Box<dyn Generator>>,
}

impl ScoutAssistant {
    pub fn new(table: PlayerTable, generator: impl Generator + 'static) -> Self {
        Self {
            table,
            generator: Some(Box::new(generator)),
        }
    }

    /// Answers from the table alone, without the generation service.
    pub fn offline(table: PlayerTable) -> Self {
        Self {
            table,
            generator: None,
        }
    }

    /// Uses the configured service when it is enabled and its `/api/tags` check passes,
    /// otherwise falls back to basic mode.
    pub fn from_config(cfg: &ScoutConfig, table: PlayerTable) -> Self {
        if !cfg.llm_enabled {
            return Self::offline(table);
        }
        let client = OllamaClient::new(cfg);
        if !client.is_available() {
            warn!("answer service at {} is not reachable", cfg.llm_url);
            return Self::offline(table);
        }
        info!("using model {}", client.model());
        Self::new(table, client)
    }

    pub fn table(&self) -> &PlayerTable {
        &self.table
    }

    pub fn is_offline(&self) -> bool {
        self.generator.is_none()
    }

    pub fn process_query(&self, query: &str) -> ScoutAnswer {
        self.process_query_with_report(query).0
    }

    /// Answers `query` and also hands back the filter report the answer was built from.
    pub fn process_query_with_report(&self, query: &str) -> (ScoutAnswer, QueryReport<'_>) {
        let report = analyze(query, &self.table);
        let answer = match self.generator.as_deref() {
            Some(generator) => self.generate_answer(query, &report, generator),
            None => ScoutAnswer {
                answer: offline::basic_answer(query, &self.table),
                sources: Vec::new(),
            },
        };
        (answer, report)
    }

    fn generate_answer(
        &self,
        query: &str,
        report: &QueryReport<'_>,
        generator: &dyn Generator,
    ) -> ScoutAnswer {
        info!("query intent: {}", report.intent.label());
        let mut main = report.outcome.main.clone();
        let mut suggestions = report.outcome.suggestions.clone();

        let mut promoted = false;
        if main.is_empty() {
            if suggestions.is_empty() {
                debug!("no players found in main results or suggestions");
                return ScoutAnswer {
                    answer: no_match_message(&report.facets),
                    sources: Vec::new(),
                };
            }
            debug!("using suggestions as main results");
            main = std::mem::take(&mut suggestions);
            promoted = true;
        }
        info!(
            "found {} main results, {} suggestions",
            main.len(),
            suggestions.len()
        );

        let assembled = assemble(
            &main,
            &suggestions,
            report.intent,
            &report.facets,
            &self.table,
        );
        let prompt = build_prompt(&PromptInputs {
            context: &assembled.context,
            suggestions_text: &assembled.suggestions_text,
            comparison_table: &assembled.comparison_table,
            query,
            intent: report.intent,
            no_exact_nationality_match: promoted && report.facets.nationality_codes.is_some(),
        });

        match generator.generate(&prompt) {
            Ok(answer) => {
                let mut sources = assembled.sources;
                sources.truncate(MAX_SOURCES);
                ScoutAnswer { answer, sources }
            }
            Err(err) => {
                warn!("answer generation failed: {err}");
                ScoutAnswer {
                    answer: err.to_string(),
                    sources: Vec::new(),
                }
            }
        }
    }
}

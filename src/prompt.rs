use crate::classify::Intent;

const SCOUT_ROLE: &str = "You are a professional football scout.";

const NUMBER_RULES: &str = "- Use the qualitative descriptions provided (never show raw numbers for pace/shooting/physical/passing/dribbling)
- Show exact numbers ONLY for: Age, Market Value (€M), Overall Rating (/100)";

const NO_NATIONALITY_MATCH_NOTE: &str = "IMPORTANT: No players were found matching the exact nationality criteria. The players below are alternative options that might interest the user.";

/// Everything a prompt template can draw on.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub context: &'a str,
    pub suggestions_text: &'a str,
    pub comparison_table: &'a str,
    pub query: &'a str,
    pub intent: Intent,
    /// Main results were promoted from nationality fallback suggestions.
    pub no_exact_nationality_match: bool,
}

pub fn build_prompt(inputs: &PromptInputs<'_>) -> String {
    match inputs.intent {
        Intent::Singular => singular_prompt(inputs),
        Intent::Comparison => comparison_prompt(inputs),
        Intent::Plural => plural_prompt(inputs),
    }
}

fn singular_prompt(p: &PromptInputs<'_>) -> String {
    format!(
        "{SCOUT_ROLE} Based on the data below, identify and analyze THE SINGLE BEST player that matches the user's query.

CRITICAL RULES:
- Focus on ONE player only (the top player in the main results)
{NUMBER_RULES}
- Be detailed and professional like a real scout report
- If suggestions are provided, mention them at the end

Main Results:
{context}

{suggestions}

Question: {query}

Professional Scout Analysis:",
        context = p.context,
        suggestions = p.suggestions_text,
        query = p.query,
    )
}

fn comparison_prompt(p: &PromptInputs<'_>) -> String {
    format!(
        "{SCOUT_ROLE} Compare ALL the players provided in the data below.

CRITICAL RULES:
- Compare each player's strengths and weaknesses point by point
{NUMBER_RULES}
- Use the comparison table provided to structure your analysis
- Give a clear final recommendation with reasoning

{table}

Detailed Player Data:
{context}

Question: {query}

Professional Comparison Analysis:",
        table = p.comparison_table,
        context = p.context,
        query = p.query,
    )
}

fn plural_prompt(p: &PromptInputs<'_>) -> String {
    let alternatives_rule = if p.suggestions_text.is_empty() {
        ""
    } else {
        "\n- Include suggestions section at the end labeled 'ALTERNATIVE OPTIONS'"
    };
    let note = if p.no_exact_nationality_match {
        NO_NATIONALITY_MATCH_NOTE
    } else {
        ""
    };
    format!(
        "{SCOUT_ROLE} Analyze the TOP players from the data below that match the user's query.

CRITICAL RULES:
- Present MULTIPLE players in ranked order (start with #1, #2, #3, etc.)
{NUMBER_RULES}
- Be detailed for each player with tactical insights
- If no exact matches were found, clearly explain this and present alternatives{alternatives_rule}

{note}

Main Results:
{context}

{suggestions}

Question: {query}

Professional Scout Analysis:",
        context = p.context,
        suggestions = p.suggestions_text,
        query = p.query,
    )
}

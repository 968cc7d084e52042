//! Prompt construction for reasoning providers.

use crate::agent::Transcript;
use crate::ops::catalog;

/// System prompt establishing the tool-call contract.
pub fn system_prompt() -> String {
    let schemas = serde_json::to_string_pretty(&catalog::tool_schemas())
        .unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are a data analyst answering questions about spreadsheet data. \
         You cannot see the data directly; you work by calling tools from the \
         catalog below and reading their results.\n\
         \n\
         Respond with a single JSON object and nothing else. Either:\n\
         {{\"action\": \"tool_call\", \"name\": \"<operation>\", \"arguments\": {{...}}}}\n\
         or, once you can answer the question:\n\
         {{\"action\": \"final_answer\", \"answer\": \"<your answer>\"}}\n\
         \n\
         Sheet and column names are matched tolerantly, but prefer the exact \
         names from the workbook overview. If a previous step failed with an \
         ambiguous reference, pick one of the listed candidates or call \
         find_column_fuzzy.\n\
         \n\
         Tool catalog:\n{schemas}"
    )
}

/// Per-step user prompt: question, workbook overview, transcript so far.
pub fn step_prompt(question: &str, overview: &str, transcript: &Transcript) -> String {
    format!(
        "Question: {question}\n\
         \n\
         Workbook:\n{overview}\n\
         Steps so far:\n{}\n\
         Propose the next step.",
        transcript.render()
    )
}

/// Prompt used when the loop must finalize without a model-issued answer.
pub fn summary_prompt(question: &str, transcript: &Transcript) -> String {
    format!(
        "Question: {question}\n\
         \n\
         The investigation is over; these steps were executed:\n{}\n\
         Write the best final answer you can from these results alone. \
         If they are insufficient to answer, say so plainly.",
        transcript.render()
    )
}

//! Best-effort correction of invalid language codes
//!
//! When a request carries a code outside the catalog (e.g. `pt` instead of
//! `pt-BR`), a text model is asked for the closest valid code. The answer is
//! only applied if it is itself a valid code. Nothing here can fail the
//! request.

use async_trait::async_trait;

use crate::catalog::{LANGUAGES, is_valid_language_code};
use crate::types::SpeechRequest;

/// Literal the model is told to answer with when nothing matches
const NO_MATCH: &str = "null";

/// Source of free-form text completions
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Answer a single prompt
    async fn generate_text(&self, prompt: &str) -> crate::Result<String>;
}

/// What the repair step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageRepair {
    /// No code, or the code is already valid
    NotNeeded,
    /// The invalid code was replaced
    Corrected { from: String, to: String },
    /// The code is invalid and was left in place
    Unchanged { code: String },
}

/// Build the correction prompt for an invalid code
pub fn correction_prompt(invalid_code: &str) -> String {
    let valid_codes = LANGUAGES.iter().map(|entry| entry.code).collect::<Vec<_>>().join(", ");

    format!(
        "The language code \"{invalid_code}\" is not supported. \
         The supported language codes are: {valid_codes}. \
         Reply with only the single supported code that is closest to \"{invalid_code}\", \
         exactly as written in the list and with no other text. \
         If none of them is a reasonable match, reply with {NO_MATCH}."
    )
}

/// Read a model answer, accepting it only if it is a valid code
fn parse_answer(answer: &str) -> Option<&str> {
    let answer = answer.trim();
    (answer != NO_MATCH && is_valid_language_code(answer)).then_some(answer)
}

/// Replace an invalid `language_code` with the model's suggestion
///
/// Makes at most one `generate_text` call. Errors from the generator are
/// logged and swallowed.
pub async fn repair_language_code(request: &mut SpeechRequest, generator: &dyn TextGenerator) -> LanguageRepair {
    let Some(code) = request.language_code.clone() else {
        return LanguageRepair::NotNeeded;
    };

    if is_valid_language_code(&code) {
        return LanguageRepair::NotNeeded;
    }

    tracing::info!(language_code = %code, "language code not supported, asking for a correction");

    let answer = match generator.generate_text(&correction_prompt(&code)).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(language_code = %code, error = %e, "language code correction failed");
            return LanguageRepair::Unchanged { code };
        }
    };

    match parse_answer(&answer) {
        Some(corrected) => {
            tracing::info!(from = %code, to = corrected, "language code corrected");
            request.language_code = Some(corrected.to_string());
            LanguageRepair::Corrected {
                from: code,
                to: corrected.to_string(),
            }
        }
        None => {
            tracing::warn!(language_code = %code, answer = answer.trim(), "no valid correction suggested");
            LanguageRepair::Unchanged { code }
        }
    }
}

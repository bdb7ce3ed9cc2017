//! # Prompt templates
//!
//! A prompt template is a small YAML document holding the instruction phrases
//! that go into the generation prompt:
//! - a `preamble` telling the model what to do with the context,
//! - one instruction per [`ResponseStyle`] and per [`ExpertiseLevel`],
//! - a `closing_instruction` appended after those two.
//!
//! Templates live under the configuration directory:
//!
//! ```text
//! <config_dir>/templates/<name>.yaml
//! ```
//!
//! ## Minimal YAML example
//!
//! ```yaml
//! preamble: "Based on the following context, answer the user's question."
//! closing_instruction: "Make the response personally relevant and actionable"
//! style_instructions:
//!   casual: "Use a friendly, conversational tone"
//! level_instructions:
//!   beginner: "Explain concepts simply with basic examples"
//! ```
//!
//! Missing fields fall back to [`PromptTemplate::default`]; a style or level
//! absent from a map that *is* present falls back to a generic phrase when the
//! prompt is built (see [`PromptTemplate::style_instruction`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::{error::Error, fs};

use crate::profile::{ExpertiseLevel, ResponseStyle};

pub const DEFAULT_TEMPLATE_NAME: &str = "personalized_answer";

const FALLBACK_STYLE_INSTRUCTION: &str = "Provide a clear response";
const FALLBACK_LEVEL_INSTRUCTION: &str = "Use appropriate detail level";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    /// First line of the prompt, ahead of the retrieved context.
    pub preamble: String,

    pub style_instructions: BTreeMap<ResponseStyle, String>,

    pub level_instructions: BTreeMap<ExpertiseLevel, String>,

    /// Last instruction bullet, after the style and level ones.
    pub closing_instruction: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let style_instructions = BTreeMap::from([
            (
                ResponseStyle::Professional,
                "Provide a professional, structured response".to_string(),
            ),
            (
                ResponseStyle::Casual,
                "Use a friendly, conversational tone".to_string(),
            ),
            (
                ResponseStyle::Technical,
                "Focus on technical details and implementation".to_string(),
            ),
            (
                ResponseStyle::Creative,
                "Use creative examples and analogies".to_string(),
            ),
        ]);

        let level_instructions = BTreeMap::from([
            (
                ExpertiseLevel::Beginner,
                "Explain concepts simply with basic examples".to_string(),
            ),
            (
                ExpertiseLevel::Intermediate,
                "Provide balanced detail with practical examples".to_string(),
            ),
            (
                ExpertiseLevel::Expert,
                "Include advanced concepts and technical depth".to_string(),
            ),
        ]);

        Self {
            preamble: "Based on the following context, answer the user's question.".to_string(),
            style_instructions,
            level_instructions,
            closing_instruction: "Make the response personally relevant and actionable"
                .to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn style_instruction(&self, style: ResponseStyle) -> &str {
        self.style_instructions
            .get(&style)
            .map(String::as_str)
            .unwrap_or(FALLBACK_STYLE_INSTRUCTION)
    }

    pub fn level_instruction(&self, level: ExpertiseLevel) -> &str {
        self.level_instructions
            .get(&level)
            .map(String::as_str)
            .unwrap_or(FALLBACK_LEVEL_INSTRUCTION)
    }
}

/// Load a template by name from `<config_dir>/templates/<name>.yaml`.
///
/// ### Errors
/// Returns an error if the config directory cannot be determined, the file
/// cannot be read, or the YAML does not describe a `PromptTemplate`.
pub fn load_template(name: &str) -> Result<PromptTemplate, Box<dyn Error>> {
    let path = crate::config_dir()?.join(format!("templates/{name}.yaml"));
    load_template_from(&path)
}

pub fn load_template_from(path: &Path) -> Result<PromptTemplate, Box<dyn Error>> {
    tracing::info!("Loading template: {}", path.display());

    let content = fs::read_to_string(path)?;
    let template: PromptTemplate = serde_yaml::from_str(&content)?;
    Ok(template)
}

/// Load the named template, or the built-in default when no such file exists.
///
/// A file that exists but does not parse is still an error.
pub fn load_template_or_default(name: &str) -> Result<PromptTemplate, Box<dyn Error>> {
    let path = crate::config_dir()?.join(format!("templates/{name}.yaml"));
    if !path.exists() {
        tracing::info!(
            "Template {} not found, using built-in default",
            path.display()
        );
        return Ok(PromptTemplate::default());
    }
    load_template_from(&path)
}

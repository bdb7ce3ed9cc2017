//! # Query personalization
//!
//! Turns profile state into two things:
//!
//! 1. a retrieval query, expanded with level-specific phrasing
//!    ([`QueryPersonalizer::enhance`]);
//! 2. the answer shown to the user ([`QueryPersonalizer::render`]).
//!
//! Rendering builds a full generation prompt from the [`PromptTemplate`] and
//! the retrieved snippets, then hands it to a [`Responder`]. No model is called:
//! the default [`PlaceholderResponder`] answers with a fixed sentence naming the
//! level, the style, and the question. A real generation backend plugs in by
//! implementing [`Responder`].

use tracing::debug;

use crate::profile::{ExpertiseLevel, ResponseStyle};
use crate::template::PromptTemplate;

/// Everything a responder may use to produce an answer.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRequest<'a> {
    pub query: &'a str,
    pub prompt: &'a str,
    pub context: &'a [String],
    pub style: ResponseStyle,
    pub level: ExpertiseLevel,
}

pub trait Responder {
    fn respond(&self, request: &ResponseRequest<'_>) -> String;
}

/// Stands in for a generation call with a fixed sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderResponder;

impl Responder for PlaceholderResponder {
    fn respond(&self, request: &ResponseRequest<'_>) -> String {
        format!(
            "Based on your {} level and {} preference, here's a personalized answer to '{}': \
             [Generated response using retrieved context and user preferences]",
            request.level, request.style, request.query
        )
    }
}

pub struct QueryPersonalizer {
    template: PromptTemplate,
    responder: Box<dyn Responder>,
}

impl Default for QueryPersonalizer {
    fn default() -> Self {
        Self::new(PromptTemplate::default())
    }
}

impl QueryPersonalizer {
    pub fn new(template: PromptTemplate) -> Self {
        Self {
            template,
            responder: Box::new(PlaceholderResponder),
        }
    }

    pub fn with_responder(mut self, responder: Box<dyn Responder>) -> Self {
        self.responder = responder;
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Expand `query` with phrasing that pulls in material for `level`.
    pub fn enhance(query: &str, level: ExpertiseLevel) -> String {
        match level {
            ExpertiseLevel::Beginner => format!("basic introduction {query} simple explanation"),
            ExpertiseLevel::Expert => format!("advanced technical {query} detailed analysis"),
            ExpertiseLevel::Intermediate => query.to_string(),
        }
    }

    /// The generation prompt for `query` over the retrieved `docs`.
    pub fn build_prompt(
        &self,
        query: &str,
        docs: &[String],
        style: ResponseStyle,
        level: ExpertiseLevel,
    ) -> String {
        let context = docs.join("\n\n");

        format!(
            "\n{preamble}\n\nContext:\n{context}\n\nUser Question: {query}\n\nInstructions:\n\
             - {style}\n- {level}\n- {closing}\n\nResponse:\n",
            preamble = self.template.preamble,
            style = self.template.style_instruction(style),
            level = self.template.level_instruction(level),
            closing = self.template.closing_instruction,
        )
    }

    pub fn render(
        &self,
        query: &str,
        docs: &[String],
        style: ResponseStyle,
        level: ExpertiseLevel,
    ) -> String {
        let prompt = self.build_prompt(query, docs, style, level);
        debug!(%style, %level, docs = docs.len(), "Prompt:\n{}", prompt);

        self.responder.respond(&ResponseRequest {
            query,
            prompt: &prompt,
            context: docs,
            style,
            level,
        })
    }
}

//! # RagSession
//!
//! The session context that ties the pieces together. A [`RagSession`] owns the
//! [`DocumentStore`], the [`ProfileStore`], the [`InteractionLog`] and the
//! [`QueryPersonalizer`]; callers construct one explicitly and pass it around.
//! Nothing is global and nothing outlives the value.
//!
//! ## Answering a question
//!
//! ```text
//! question ─▶ ProfileStore lookup ─▶ enhance(level) ─▶ DocumentStore::query
//!          ─▶ render(style, level) ─▶ record_interaction ─▶ PersonalizedAnswer
//! ```
//!
//! ```rust
//! use personal_knowledge_rag::config::RagConfig;
//! use personal_knowledge_rag::profile::{ExpertiseLevel, Preferences, ResponseStyle};
//! use personal_knowledge_rag::session::RagSession;
//! use personal_knowledge_rag::template::PromptTemplate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = RagSession::new(&RagConfig::default(), PromptTemplate::default());
//! session.seed_sample_documents()?;
//! session.create_or_update_profile(
//!     "user_001",
//!     Preferences::new(ExpertiseLevel::Beginner, ResponseStyle::Casual),
//! );
//!
//! let answer = session.get_personalized_answer("What is AI?", "user_001")?;
//! assert!(answer.response.contains("beginner"));
//! # Ok(()) }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::document_store::DocumentStore;
use crate::error::RagError;
use crate::interaction::InteractionLog;
use crate::personalizer::{QueryPersonalizer, Responder};
use crate::profile::{ExpertiseLevel, Preferences, ProfileStore, ResponseStyle, UserProfile};
use crate::template::PromptTemplate;

/// `(content, topic, difficulty)` of the documents every fresh session can start with.
pub const SAMPLE_DOCUMENTS: [(&str, &str, ExpertiseLevel); 3] = [
    (
        "Artificial Intelligence (AI) is a branch of computer science that aims to create \
         intelligent machines capable of performing tasks that typically require human \
         intelligence.",
        "AI basics",
        ExpertiseLevel::Beginner,
    ),
    (
        "Machine Learning algorithms can be categorized into supervised, unsupervised, and \
         reinforcement learning approaches, each with specific use cases and implementation \
         strategies.",
        "Machine Learning",
        ExpertiseLevel::Intermediate,
    ),
    (
        "Advanced neural network architectures like Transformers have revolutionized natural \
         language processing through attention mechanisms and parallel processing capabilities.",
        "Deep Learning",
        ExpertiseLevel::Expert,
    ),
];

/// Result of [`RagSession::get_personalized_answer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalizedAnswer {
    pub response: String,
    /// How many documents were retrieved as context.
    pub retrieved_docs: usize,
    pub personalization_applied: bool,
    /// The asking user's profile after the interaction was recorded, if any.
    pub user_profile: Option<UserProfile>,
}

/// Snapshot for the "system stats" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_users: usize,
    pub total_interactions: usize,
    pub total_documents: usize,
    /// Set when the selected user has a profile.
    pub user: Option<UserStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_id: String,
    pub interaction_count: u64,
    pub expertise_level: ExpertiseLevel,
    pub response_style: ResponseStyle,
}

pub struct RagSession {
    documents: DocumentStore,
    profiles: ProfileStore,
    interactions: InteractionLog,
    personalizer: QueryPersonalizer,
    top_k: usize,
}

impl RagSession {
    pub fn new(config: &RagConfig, template: PromptTemplate) -> Self {
        Self {
            documents: DocumentStore::new(config.embedding_dimension),
            profiles: ProfileStore::new(),
            interactions: InteractionLog::new(),
            personalizer: QueryPersonalizer::new(template),
            top_k: config.top_k,
        }
    }

    /// Replace the placeholder responder, e.g. with a real generation backend.
    pub fn with_responder(mut self, responder: Box<dyn Responder>) -> Self {
        self.personalizer = self.personalizer.with_responder(responder);
        self
    }

    /// Add [`SAMPLE_DOCUMENTS`] and return their ids.
    ///
    /// Safe to call more than once: identical content maps to the same ids.
    pub fn seed_sample_documents(&mut self) -> Result<Vec<String>, RagError> {
        SAMPLE_DOCUMENTS
            .iter()
            .map(|(content, topic, difficulty)| {
                self.documents
                    .add(content, topic_metadata(topic, *difficulty))
            })
            .collect()
    }

    pub fn add_document(
        &mut self,
        content: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<String, RagError> {
        self.documents.add(content, metadata)
    }

    /// The document-add form: content plus a topic and a difficulty.
    ///
    /// # Errors
    /// [`RagError::IncompleteDocument`] when content or topic is blank.
    pub fn add_topic_document(
        &mut self,
        content: &str,
        topic: &str,
        difficulty: ExpertiseLevel,
    ) -> Result<String, RagError> {
        if content.trim().is_empty() || topic.trim().is_empty() {
            return Err(RagError::IncompleteDocument);
        }
        self.documents
            .add(content, topic_metadata(topic, difficulty))
    }

    pub fn create_or_update_profile(
        &mut self,
        user_id: &str,
        preferences: Preferences,
    ) -> &UserProfile {
        self.profiles.create_or_update(user_id, preferences)
    }

    /// Fetch up to `k` documents for `query`, expanded for the user's level.
    pub fn personalized_retrieval(
        &self,
        query: &str,
        user_id: &str,
        k: usize,
    ) -> Result<Vec<String>, RagError> {
        let (level, _) = self.profiles.settings_for(user_id);
        let enhanced = QueryPersonalizer::enhance(query, level);
        debug!(user_id, %level, enhanced = %enhanced, "Retrieving");

        self.documents.query(&enhanced, k)
    }

    pub fn generate_personalized_response(
        &self,
        query: &str,
        user_id: &str,
        retrieved_docs: &[String],
    ) -> String {
        let (level, style) = self.profiles.settings_for(user_id);
        self.personalizer.render(query, retrieved_docs, style, level)
    }

    /// Answer `query` for `user_id` and record the exchange.
    ///
    /// Unknown users get the default level and style; their exchange is not logged.
    ///
    /// # Errors
    /// [`RagError::MissingInput`] when the query or user id is blank.
    pub fn get_personalized_answer(
        &mut self,
        query: &str,
        user_id: &str,
    ) -> Result<PersonalizedAnswer, RagError> {
        if query.trim().is_empty() || user_id.trim().is_empty() {
            return Err(RagError::MissingInput);
        }

        let retrieved = self.personalized_retrieval(query, user_id, self.top_k)?;
        let response = self.generate_personalized_response(query, user_id, &retrieved);
        self.profiles
            .record_interaction(user_id, query, &response, &mut self.interactions);

        info!(user_id, retrieved = retrieved.len(), "Answered question");

        Ok(PersonalizedAnswer {
            response,
            retrieved_docs: retrieved.len(),
            personalization_applied: true,
            user_profile: self.profiles.get(user_id).cloned(),
        })
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn interactions(&self) -> &InteractionLog {
        &self.interactions
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn stats(&self, user_id: &str) -> SessionStats {
        SessionStats {
            total_users: self.profiles.len(),
            total_interactions: self.interactions.len(),
            total_documents: self.documents.len(),
            user: self.profiles.get(user_id).map(|p| UserStats {
                user_id: user_id.to_string(),
                interaction_count: p.interaction_count,
                expertise_level: p.expertise_level,
                response_style: p.response_style,
            }),
        }
    }
}

fn topic_metadata(topic: &str, difficulty: ExpertiseLevel) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("topic".to_string(), topic.to_string()),
        ("difficulty".to_string(), difficulty.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> RagSession {
        let mut session = RagSession::new(&RagConfig::default(), PromptTemplate::default());
        session.seed_sample_documents().unwrap();
        session
    }

    #[test]
    fn test_end_to_end_beginner_casual() {
        let mut session = session();
        session.create_or_update_profile(
            "user_001",
            Preferences::new(ExpertiseLevel::Beginner, ResponseStyle::Casual),
        );

        let answer = session
            .get_personalized_answer("What is AI?", "user_001")
            .unwrap();

        assert!(answer.response.contains("beginner"));
        assert!(answer.response.contains("casual"));
        assert!(answer.response.contains("What is AI?"));
        assert!(answer.personalization_applied);
        assert!(answer.retrieved_docs >= 1 && answer.retrieved_docs <= 3);
        assert_eq!(answer.user_profile.unwrap().interaction_count, 1);
        assert_eq!(session.profile("user_001").unwrap().interaction_count, 1);
        assert_eq!(session.interactions().count_for("user_001"), 1);
    }

    #[test]
    fn test_unknown_user_falls_back_to_defaults() {
        let mut session = session();

        let answer = session
            .get_personalized_answer("What is AI?", "stranger")
            .unwrap();

        assert!(answer.response.contains("intermediate"));
        assert!(answer.response.contains("professional"));
        assert!(answer.user_profile.is_none());
        assert!(session.interactions().is_empty());
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut session = session();

        assert_eq!(
            session.get_personalized_answer("   ", "user_001"),
            Err(RagError::MissingInput)
        );
        assert_eq!(
            session.get_personalized_answer("What is AI?", ""),
            Err(RagError::MissingInput)
        );
        assert!(session.interactions().is_empty());
    }

    #[test]
    fn test_empty_collection_answers_without_context() {
        let mut session = RagSession::new(&RagConfig::default(), PromptTemplate::default());

        let answer = session.get_personalized_answer("Anything?", "u").unwrap();

        assert_eq!(answer.retrieved_docs, 0);
        assert!(answer.response.contains("'Anything?'"));
    }

    #[test]
    fn test_seeding_twice_keeps_three_documents() {
        let mut session = session();
        let ids = session.seed_sample_documents().unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(session.documents().len(), 3);
        let first = session.documents().get(&ids[0]).unwrap();
        assert_eq!(first.metadata["topic"], "AI basics");
        assert_eq!(first.metadata["difficulty"], "beginner");
    }

    #[test]
    fn test_add_topic_document_validation() {
        let mut session = session();

        assert_eq!(
            session.add_topic_document("", "Rust", ExpertiseLevel::Expert),
            Err(RagError::IncompleteDocument)
        );
        assert_eq!(
            session.add_topic_document("Ownership rules", " ", ExpertiseLevel::Expert),
            Err(RagError::IncompleteDocument)
        );

        let id = session
            .add_topic_document("Ownership rules", "Rust", ExpertiseLevel::Expert)
            .unwrap();
        assert_eq!(id, DocumentStore::content_id("Ownership rules"));
        assert_eq!(session.documents().len(), 4);
    }

    #[test]
    fn test_stats_track_users_and_interactions() {
        let mut session = session();
        session.create_or_update_profile("a", Preferences::default());
        session.create_or_update_profile(
            "b",
            Preferences::new(ExpertiseLevel::Expert, ResponseStyle::Technical),
        );
        session.get_personalized_answer("q1", "b").unwrap();
        session.get_personalized_answer("q2", "b").unwrap();

        let stats = session.stats("b");
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_interactions, 2);
        assert_eq!(stats.total_documents, 3);
        let user = stats.user.unwrap();
        assert_eq!(user.interaction_count, 2);
        assert_eq!(user.expertise_level, ExpertiseLevel::Expert);

        assert!(session.stats("nobody").user.is_none());
    }

    #[test]
    fn test_answer_serializes_to_json() {
        let mut session = session();
        session.create_or_update_profile("u", Preferences::default());
        let answer = session.get_personalized_answer("What is AI?", "u").unwrap();

        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["personalization_applied"], true);
        assert_eq!(json["user_profile"]["expertise_level"], "intermediate");
        assert_eq!(json["user_profile"]["interaction_count"], 1);
    }
}

//! Append-only log of questions asked and answers given during a session.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One question/answer exchange. Entries have no identity beyond their position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: String,
    pub timestamp: DateTime<Local>,
    pub query: String,
    pub response: String,
}

impl Interaction {
    /// Build an entry stamped with the current local time.
    pub fn now(user_id: &str, query: &str, response: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            timestamp: Local::now(),
            query: query.to_string(),
            response: response.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct InteractionLog {
    entries: Vec<Interaction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, interaction: Interaction) {
        self.entries.push(interaction);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }

    pub fn for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Interaction> {
        self.entries.iter().filter(move |i| i.user_id == user_id)
    }

    pub fn count_for(&self, user_id: &str) -> usize {
        self.for_user(user_id).count()
    }

    pub fn last(&self) -> Option<&Interaction> {
        self.entries.last()
    }
}

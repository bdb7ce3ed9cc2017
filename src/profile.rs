//! # User profiles
//!
//! Per-user preference state for the current session.
//!
//! A [`UserProfile`] is created (or overwritten) by an explicit profile update
//! and then mutated in place each time its user asks a question. Profiles are
//! never deleted; they live as long as the owning [`ProfileStore`].
//!
//! The store is also the **only** place that records interactions, which keeps
//! `interaction_count` equal to the number of log entries for that user.
//!
//! ```rust
//! use personal_knowledge_rag::interaction::InteractionLog;
//! use personal_knowledge_rag::profile::{ExpertiseLevel, Preferences, ProfileStore, ResponseStyle};
//!
//! let mut profiles = ProfileStore::new();
//! let mut log = InteractionLog::new();
//!
//! profiles.create_or_update("ada", Preferences::new(ExpertiseLevel::Beginner, ResponseStyle::Casual));
//! assert!(profiles.record_interaction("ada", "What is AI?", "…", &mut log));
//! assert_eq!(profiles.get("ada").unwrap().interaction_count, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::interaction::{Interaction, InteractionLog};

/// How much background the user has; steers query expansion and phrasing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl ExpertiseLevel {
    pub const ALL: [ExpertiseLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

/// Tone of the rendered answer.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    #[default]
    Professional,
    Casual,
    Technical,
    Creative,
}

impl ResponseStyle {
    pub const ALL: [ResponseStyle; 4] = [
        Self::Professional,
        Self::Casual,
        Self::Technical,
        Self::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Technical => "technical",
            Self::Creative => "creative",
        }
    }
}

impl fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpertiseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown expertise level: {s}"))
    }
}

impl FromStr for ResponseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown response style: {s}"))
    }
}

/// Preferences submitted with a profile update.
///
/// Only `style` and `level` are interpreted; anything else rides along in
/// `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ResponseStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ExpertiseLevel>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Preferences {
    pub fn new(level: ExpertiseLevel, style: ResponseStyle) -> Self {
        Self {
            style: Some(style),
            level: Some(level),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub preferences: Preferences,
    pub interaction_count: u64,
    /// Never populated; kept so serialized profiles keep their shape.
    pub topics_of_interest: Vec<String>,
    pub response_style: ResponseStyle,
    pub expertise_level: ExpertiseLevel,
}

impl UserProfile {
    pub fn from_preferences(preferences: Preferences) -> Self {
        Self {
            response_style: preferences.style.unwrap_or_default(),
            expertise_level: preferences.level.unwrap_or_default(),
            preferences,
            interaction_count: 0,
            topics_of_interest: Vec::new(),
        }
    }
}

/// All profiles known to the session, keyed by user id.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: HashMap<String, UserProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the profile for `user_id`.
    ///
    /// An overwrite starts over: the interaction counter goes back to zero even
    /// though earlier log entries for the user remain in the log.
    pub fn create_or_update(&mut self, user_id: &str, preferences: Preferences) -> &UserProfile {
        let profile = UserProfile::from_preferences(preferences);
        info!(
            user_id,
            level = %profile.expertise_level,
            style = %profile.response_style,
            "Profile created or updated"
        );
        self.profiles.insert(user_id.to_string(), profile);
        &self.profiles[user_id]
    }

    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.profiles.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Expertise level and response style for `user_id`, defaulting to
    /// `intermediate` / `professional` when the user is unknown.
    pub fn settings_for(&self, user_id: &str) -> (ExpertiseLevel, ResponseStyle) {
        self.get(user_id)
            .map(|p| (p.expertise_level, p.response_style))
            .unwrap_or_default()
    }

    /// Count an interaction against `user_id` and append it to `log`.
    ///
    /// Returns `false` and leaves both the store and the log untouched when the
    /// user has no profile.
    pub fn record_interaction(
        &mut self,
        user_id: &str,
        query: &str,
        response: &str,
        log: &mut InteractionLog,
    ) -> bool {
        let Some(profile) = self.profiles.get_mut(user_id) else {
            warn!(user_id, "Ignoring interaction for unknown user");
            return false;
        };

        profile.interaction_count += 1;
        log.append(Interaction::now(user_id, query, response));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_record_counts_one() {
        let mut profiles = ProfileStore::new();
        let mut log = InteractionLog::new();

        profiles.create_or_update(
            "user_001",
            Preferences::new(ExpertiseLevel::Expert, ResponseStyle::Technical),
        );
        assert!(profiles.record_interaction("user_001", "q", "r", &mut log));

        assert_eq!(profiles.get("user_001").unwrap().interaction_count, 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.count_for("user_001"), 1);
    }

    #[test]
    fn test_record_interaction_unknown_user_is_noop() {
        let mut profiles = ProfileStore::new();
        let mut log = InteractionLog::new();

        assert!(!profiles.record_interaction("ghost", "q", "r", &mut log));
        assert!(profiles.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_update_resets_counter() {
        let mut profiles = ProfileStore::new();
        let mut log = InteractionLog::new();

        profiles.create_or_update("u", Preferences::default());
        profiles.record_interaction("u", "q1", "r1", &mut log);
        profiles.record_interaction("u", "q2", "r2", &mut log);
        assert_eq!(profiles.get("u").unwrap().interaction_count, 2);

        let profile = profiles.create_or_update(
            "u",
            Preferences::new(ExpertiseLevel::Beginner, ResponseStyle::Creative),
        );
        assert_eq!(profile.interaction_count, 0);
        assert_eq!(profile.expertise_level, ExpertiseLevel::Beginner);
        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn test_absent_preferences_default() {
        let mut profiles = ProfileStore::new();
        let profile = profiles.create_or_update("u", Preferences::default());

        assert_eq!(profile.expertise_level, ExpertiseLevel::Intermediate);
        assert_eq!(profile.response_style, ResponseStyle::Professional);
        assert!(profile.topics_of_interest.is_empty());
    }

    #[test]
    fn test_settings_for_unknown_user() {
        let profiles = ProfileStore::new();
        assert_eq!(
            profiles.settings_for("nobody"),
            (ExpertiseLevel::Intermediate, ResponseStyle::Professional)
        );
    }

    #[test]
    fn test_enum_text_forms() {
        assert_eq!("Expert".parse::<ExpertiseLevel>(), Ok(ExpertiseLevel::Expert));
        assert_eq!(" casual ".parse::<ResponseStyle>(), Ok(ResponseStyle::Casual));
        assert!("guru".parse::<ExpertiseLevel>().is_err());
        assert_eq!(ResponseStyle::Technical.to_string(), "technical");
    }

    #[test]
    fn test_preferences_yaml_keeps_extra_fields() {
        let yaml = "style: creative\nlevel: expert\nlanguage: en\n";
        let prefs: Preferences = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(prefs.style, Some(ResponseStyle::Creative));
        assert_eq!(prefs.level, Some(ExpertiseLevel::Expert));
        assert_eq!(prefs.extra.get("language").map(String::as_str), Some("en"));
    }
}

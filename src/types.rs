//! Batchbot - Core Data Structures
//!
//! Types for keyword-based intent extraction, dialogue state tracking,
//! and the completed request payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::lexicon;

/// Action verb of a request (canonical form after synonym resolution)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Delete,
    Update,
}

impl ActionKind {
    /// Canonical keyword string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Delete => "delete",
            ActionKind::Update => "update",
        }
    }

    /// Parse a canonical keyword (synonyms must already be normalized)
    pub fn from_canonical(keyword: &str) -> Option<Self> {
        match keyword {
            "create" => Some(ActionKind::Create),
            "delete" => Some(ActionKind::Delete),
            "update" => Some(ActionKind::Update),
            _ => None,
        }
    }

    /// Slots that must be filled before a request with this action is complete.
    /// Delete only needs to know which batch to drop.
    pub fn required_slots(&self) -> &'static [SlotName] {
        match self {
            ActionKind::Create | ActionKind::Update => {
                &[SlotName::BatchName, SlotName::Size, SlotName::ExpiryDate]
            }
            ActionKind::Delete => &[SlotName::BatchName],
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target entity of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Batch,
    Tablet,
    Cavity,
    Blister,
}

impl EntityKind {
    /// Canonical keyword string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Batch => "batch",
            EntityKind::Tablet => "tablet",
            EntityKind::Cavity => "cavity",
            EntityKind::Blister => "blister",
        }
    }

    /// Parse a canonical keyword
    pub fn from_canonical(keyword: &str) -> Option<Self> {
        match keyword {
            "batch" => Some(EntityKind::Batch),
            "tablet" => Some(EntityKind::Tablet),
            "cavity" => Some(EntityKind::Cavity),
            "blister" => Some(EntityKind::Blister),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named required field of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    BatchName,
    Size,
    ExpiryDate,
}

impl SlotName {
    /// Snake-case identifier, as used in payload maps
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::BatchName => "batch_name",
            SlotName::Size => "size",
            SlotName::ExpiryDate => "expiry_date",
        }
    }

    /// Human-readable form, as used in prompts ("batch name")
    pub fn display_name(&self) -> &'static str {
        match self {
            SlotName::BatchName => "batch name",
            SlotName::Size => "size",
            SlotName::ExpiryDate => "expiry date",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Normalized expiry date, always rendered as zero-padded `MM/YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryDate {
    pub month: u32, // 1-12
    pub year: i32,
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl Serialize for ExpiryDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Value filled into a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlotValue {
    Size(u64),
    Date(ExpiryDate),
    Text(String),
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Size(n) => write!(f, "{}", n),
            SlotValue::Date(d) => write!(f, "{}", d),
            SlotValue::Text(s) => f.write_str(s),
        }
    }
}

/// Dialogue phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No open request
    #[default]
    Idle,
    /// Keyword seen, but action and/or entity still missing
    CollectingIntent,
    /// Action and entity known, required slots incomplete
    CollectingSlots,
}

/// In-progress request, owned exclusively by the state machine.
/// Snapshotted and cleared when the request completes.
#[derive(Debug, Clone, Default)]
pub struct DialogueState {
    pub action: Option<ActionKind>,
    pub entity: Option<EntityKind>,
    pub slots: HashMap<SlotName, SlotValue>,
    pub phase: Phase,
}

impl DialogueState {
    /// Required slots that still have no value, in required-slot order
    pub fn missing_slots(&self) -> Vec<SlotName> {
        match self.action {
            Some(action) => action
                .required_slots()
                .iter()
                .copied()
                .filter(|slot| !self.slots.contains_key(slot))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Both halves of the intent are known
    pub fn has_intent(&self) -> bool {
        self.action.is_some() && self.entity.is_some()
    }
}

/// Completed extraction result returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    /// Canonical keywords involved: action, entity, then required slot names
    pub keywords: Vec<String>,
    pub action: ActionKind,
    pub entity: EntityKind,
    /// Values for every required slot
    pub slots: HashMap<SlotName, SlotValue>,
}

/// Engine response for one turn of input
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Caller should terminate the session
    Exit,
    /// Clarifying question or rejection message to show the user
    Prompt(String),
    /// Request complete; state has been reset
    Completed(Payload),
}

/// Configuration for the dialogue engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Tokens that end the session (matched against the whole trimmed line)
    pub exit_tokens: Vec<String>,

    /// Greeting tokens (matched against the whole trimmed line, Idle only)
    pub greeting_tokens: Vec<String>,

    /// Minimum normalized edit similarity for a fuzzy keyword match
    pub fuzzy_threshold: f64,

    /// Fixed "today" for deterministic date handling; falls back to the
    /// local clock when unset
    pub fixed_today: Option<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exit_tokens: lexicon::EXIT_TOKENS.iter().map(|s| s.to_string()).collect(),
            greeting_tokens: lexicon::GREETINGS.iter().map(|s| s.to_string()).collect(),
            fuzzy_threshold: 0.8,
            fixed_today: None,
        }
    }
}

//! Batchbot - Rule-Based Intent & Slot-Filling Dialogue Engine
//!
//! Extracts a user's intent (action + target entity) from free-form text
//! and fills the required slots over multiple turns, using keyword and
//! fuzzy string matching. No learned model, no persistence.
//!
//! # Architecture
//!
//! - **Lexicon**: static keyword, synonym, and month tables
//! - **Keyword Matcher**: tokenization + exact/fuzzy classification
//! - **Field Extractors**: pure per-field value extraction
//! - **Dialogue State Machine**: phase tracking and slot merging
//! - **Result Formatter**: the completed payload
//!
//! # Usage
//!
//! ```rust
//! use batchbot::{DialogueEngine, EngineConfig, Response};
//!
//! let mut engine = DialogueEngine::new(EngineConfig::default());
//!
//! match engine.handle_turn("create batch") {
//!     Response::Prompt(question) => println!("Bot: {}", question),
//!     Response::Completed(payload) => println!("Done: {:?}", payload.keywords),
//!     Response::Exit => println!("Bye!"),
//! }
//! ```

pub mod dialogue;
pub mod extract;
pub mod lexicon;
pub mod matcher;
pub mod payload;
pub mod types;

pub use types::{
    ActionKind, DialogueState, EngineConfig, EntityKind, ExpiryDate, Payload, Phase, Response,
    SlotName, SlotValue,
};

use chrono::NaiveDate;

use dialogue::StateMachine;
use matcher::KeywordMatcher;

pub const GREETING_REPLY: &str = "Hi! How can I help you today?";

/// One conversation session. Owns the dialogue state; the caller owns the
/// read/print loop and feeds one line of text per call.
pub struct DialogueEngine {
    config: EngineConfig,
    matcher: KeywordMatcher,
    machine: StateMachine,
}

impl DialogueEngine {
    /// Create a new engine with empty dialogue state
    pub fn new(config: EngineConfig) -> Self {
        let matcher = KeywordMatcher::new(config.fuzzy_threshold);
        Self {
            config,
            matcher,
            machine: StateMachine::new(),
        }
    }

    /// Consume one line of user text and return exactly one response:
    /// an exit signal, a clarifying prompt, or the completed payload.
    pub fn handle_turn(&mut self, input: &str) -> Response {
        let trimmed = input.trim();
        let lowered = trimmed.to_lowercase();

        if self.config.exit_tokens.iter().any(|t| *t == lowered) {
            return Response::Exit;
        }

        // greetings only count as greetings while nothing is open;
        // mid-request they are just more slot text
        if self.machine.phase() == Phase::Idle
            && self.config.greeting_tokens.iter().any(|t| *t == lowered)
        {
            return Response::Prompt(GREETING_REPLY.to_string());
        }

        let today = self.today();
        self.machine.advance(&self.matcher, trimmed, today)
    }

    /// Drop any open request and return to Idle
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Current dialogue phase
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Read-only view of the in-progress request
    pub fn state(&self) -> &DialogueState {
        self.machine.state()
    }

    fn today(&self) -> NaiveDate {
        self.config
            .fixed_today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit_tokens(mut self, tokens: Vec<String>) -> Self {
        self.config.exit_tokens = tokens;
        self
    }

    pub fn greeting_tokens(mut self, tokens: Vec<String>) -> Self {
        self.config.greeting_tokens = tokens;
        self
    }

    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.config.fuzzy_threshold = threshold;
        self
    }

    pub fn fixed_today(mut self, today: NaiveDate) -> Self {
        self.config.fixed_today = Some(today);
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

//! Batchbot - Dialogue State Machine
//!
//! Tracks the in-progress request across turns: Idle until a keyword
//! opens an intent, CollectingIntent until action and entity are both
//! known, CollectingSlots until every required slot has a value. Emits
//! the completed payload and resets to Idle.

use chrono::NaiveDate;

use crate::extract;
use crate::matcher::KeywordMatcher;
use crate::payload;
use crate::types::{DialogueState, Phase, Response, SlotName};

pub const OFF_TOPIC_PROMPT: &str = "Please ask a valid related question!";
pub const INTENT_PROMPT: &str =
    "Please mention what you want to do and on what (e.g., create batch).";

/// State machine driving one conversation. Exit and greeting handling
/// live in the engine; this only ever returns prompts or a payload.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: DialogueState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Read-only view of the in-progress request
    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    /// Drop any open request and return to Idle
    pub fn reset(&mut self) {
        self.state = DialogueState::default();
    }

    /// Consume one line of input and produce exactly one response
    pub fn advance(
        &mut self,
        matcher: &KeywordMatcher,
        text: &str,
        today: NaiveDate,
    ) -> Response {
        match self.state.phase {
            Phase::Idle | Phase::CollectingIntent => self.collect_intent(matcher, text, today),
            Phase::CollectingSlots => self.collect_slots(text, today),
        }
    }

    /// Intent detection: record action/entity keywords without overwriting
    /// ones already set, then either move on to slot filling or re-prompt.
    fn collect_intent(
        &mut self,
        matcher: &KeywordMatcher,
        text: &str,
        today: NaiveDate,
    ) -> Response {
        if self.state.phase == Phase::Idle && matcher.classify(text).is_empty() {
            // off topic and nothing open: reject, state unchanged
            return Response::Prompt(OFF_TOPIC_PROMPT.to_string());
        }

        if self.state.action.is_none() {
            self.state.action = extract::extract_action(matcher, text);
        }
        if self.state.entity.is_none() {
            self.state.entity = extract::extract_entity(matcher, text);
        }

        if !self.state.has_intent() {
            self.state.phase = Phase::CollectingIntent;
            return Response::Prompt(INTENT_PROMPT.to_string());
        }

        log::debug!(
            "intent complete: {:?} {:?}",
            self.state.action,
            self.state.entity
        );
        self.state.phase = Phase::CollectingSlots;

        // the intent turn may carry slot values inline
        self.merge_slots(text, today);
        match self.try_complete() {
            Some(response) => response,
            None => Response::Prompt(format!(
                "What is the {}?",
                join_names(&self.state.missing_slots())
            )),
        }
    }

    /// Slot filling: merge newly extracted values, then either finish or
    /// name exactly what is still missing.
    fn collect_slots(&mut self, text: &str, today: NaiveDate) -> Response {
        self.merge_slots(text, today);
        match self.try_complete() {
            Some(response) => response,
            None => Response::Prompt(format!(
                "Please provide: {}",
                join_names(&self.state.missing_slots())
            )),
        }
    }

    /// First-writer-wins per slot, except that a default request
    /// overwrites everything in one step.
    fn merge_slots(&mut self, text: &str, today: NaiveDate) {
        if let Some(defaults) = extract::default_request(text, today) {
            log::debug!("default request overrides all slots");
            self.state.slots = defaults;
            return;
        }

        for (name, value) in extract::extract_slots(text, today) {
            self.state.slots.entry(name).or_insert(value);
        }
    }

    /// When the intent is known and no required slot is missing, snapshot
    /// the state, reset to Idle, and return the payload.
    fn try_complete(&mut self) -> Option<Response> {
        let (Some(action), Some(entity)) = (self.state.action, self.state.entity) else {
            return None;
        };
        if !self.state.missing_slots().is_empty() {
            return None;
        }

        let snapshot = std::mem::take(&mut self.state);
        let payload = payload::build(action, entity, snapshot.slots);
        log::info!("request complete: {:?}", payload.keywords);
        Some(Response::Completed(payload))
    }
}

/// Human-readable missing-slot list ("batch name, size, expiry date")
fn join_names(slots: &[SlotName]) -> String {
    slots
        .iter()
        .map(|s| s.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionKind, EntityKind, SlotValue};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(0.8)
    }

    #[test]
    fn test_off_topic_in_idle() {
        let mut sm = StateMachine::new();
        let response = sm.advance(&matcher(), "what is the weather", today());

        assert_eq!(response, Response::Prompt(OFF_TOPIC_PROMPT.to_string()));
        assert_eq!(sm.phase(), Phase::Idle);
        assert!(sm.state().action.is_none());
    }

    #[test]
    fn test_partial_intent_reprompts() {
        let mut sm = StateMachine::new();

        let response = sm.advance(&matcher(), "create", today());
        assert_eq!(response, Response::Prompt(INTENT_PROMPT.to_string()));
        assert_eq!(sm.phase(), Phase::CollectingIntent);
        assert_eq!(sm.state().action, Some(ActionKind::Create));

        // entity arrives on the next turn
        let response = sm.advance(&matcher(), "a batch", today());
        assert_eq!(
            response,
            Response::Prompt("What is the batch name, size, expiry date?".to_string())
        );
        assert_eq!(sm.phase(), Phase::CollectingSlots);
    }

    #[test]
    fn test_intent_values_not_overwritten() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create", today());
        // a second action verb must not displace the first
        sm.advance(&matcher(), "delete batch", today());

        assert_eq!(sm.state().action, Some(ActionKind::Create));
        assert_eq!(sm.state().entity, Some(EntityKind::Batch));
    }

    #[test]
    fn test_completeness_gating_prompt_order() {
        let mut sm = StateMachine::new();
        let response = sm.advance(&matcher(), "create batch", today());

        assert_eq!(
            response,
            Response::Prompt("What is the batch name, size, expiry date?".to_string())
        );
    }

    #[test]
    fn test_end_to_end_two_turns() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create batch", today());

        let response = sm.advance(&matcher(), "batch1, 500000, March 2025", today());
        let Response::Completed(payload) = response else {
            panic!("expected completion, got {:?}", response);
        };

        assert_eq!(payload.action, ActionKind::Create);
        assert_eq!(payload.entity, EntityKind::Batch);
        assert_eq!(
            payload.slots.get(&SlotName::BatchName),
            Some(&SlotValue::Text("batch1".to_string()))
        );
        assert_eq!(payload.slots.get(&SlotName::Size), Some(&SlotValue::Size(500000)));
        assert_eq!(
            payload.slots.get(&SlotName::ExpiryDate).map(|v| v.to_string()),
            Some("03/2025".to_string())
        );

        // machine is fresh again
        assert_eq!(sm.phase(), Phase::Idle);
    }

    #[test]
    fn test_one_shot_completion() {
        let mut sm = StateMachine::new();
        let response = sm.advance(&matcher(), "create batch batch1, 500000, March 2025", today());

        assert!(matches!(response, Response::Completed(_)));
        assert_eq!(sm.phase(), Phase::Idle);
    }

    #[test]
    fn test_partial_slots_prompt_names_missing() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create batch", today());

        let response = sm.advance(&matcher(), "batch1", today());
        assert_eq!(
            response,
            Response::Prompt("Please provide: size, expiry date".to_string())
        );
        assert_eq!(sm.phase(), Phase::CollectingSlots);
    }

    #[test]
    fn test_first_writer_wins_per_slot() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create batch", today());
        sm.advance(&matcher(), "batch1", today());
        let response = sm.advance(&matcher(), "batch2, 75, March 2025", today());

        let Response::Completed(payload) = response else {
            panic!("expected completion, got {:?}", response);
        };
        assert_eq!(
            payload.slots.get(&SlotName::BatchName),
            Some(&SlotValue::Text("batch1".to_string()))
        );
    }

    #[test]
    fn test_default_overrides_filled_slots() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create batch", today());
        sm.advance(&matcher(), "batch1", today());

        let response = sm.advance(&matcher(), "default", today());
        let Response::Completed(payload) = response else {
            panic!("expected completion, got {:?}", response);
        };

        assert_eq!(
            payload.slots.get(&SlotName::BatchName),
            Some(&SlotValue::Text("default_batch".to_string()))
        );
        assert_eq!(payload.slots.get(&SlotName::Size), Some(&SlotValue::Size(100000)));
        assert_eq!(
            payload.slots.get(&SlotName::ExpiryDate).map(|v| v.to_string()),
            Some("02/2025".to_string())
        );
    }

    #[test]
    fn test_synonym_drives_same_transitions() {
        let mut canonical = StateMachine::new();
        let mut synonym = StateMachine::new();

        let a = canonical.advance(&matcher(), "create batch", today());
        let b = synonym.advance(&matcher(), "generate batch", today());

        assert_eq!(a, b);
        assert_eq!(canonical.state().action, synonym.state().action);
    }

    #[test]
    fn test_fuzzy_typo_drives_same_transitions() {
        let mut sm = StateMachine::new();
        let response = sm.advance(&matcher(), "creat batch", today());

        assert_eq!(
            response,
            Response::Prompt("What is the batch name, size, expiry date?".to_string())
        );
        assert_eq!(sm.state().action, Some(ActionKind::Create));
    }

    #[test]
    fn test_delete_needs_only_batch_name() {
        let mut sm = StateMachine::new();
        let response = sm.advance(&matcher(), "delete batch", today());
        assert_eq!(response, Response::Prompt("What is the batch name?".to_string()));

        let response = sm.advance(&matcher(), "batch42", today());
        let Response::Completed(payload) = response else {
            panic!("expected completion, got {:?}", response);
        };
        assert_eq!(payload.action, ActionKind::Delete);
        assert_eq!(payload.keywords, vec!["delete", "batch", "batch name"]);
    }

    #[test]
    fn test_idempotent_after_completion() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create batch", today());
        sm.advance(&matcher(), "default", today());

        // next turn behaves exactly like a fresh session
        let response = sm.advance(&matcher(), "what is the weather", today());
        assert_eq!(response, Response::Prompt(OFF_TOPIC_PROMPT.to_string()));
    }

    #[test]
    fn test_keywordless_turn_with_open_intent_reprompts() {
        let mut sm = StateMachine::new();
        sm.advance(&matcher(), "create", today());

        // no keyword, but a request is open: not treated as off topic
        let response = sm.advance(&matcher(), "hmm", today());
        assert_eq!(response, Response::Prompt(INTENT_PROMPT.to_string()));
    }
}

//! Batchbot - Result Formatter
//!
//! Turns a completed dialogue-state snapshot into the structured payload
//! returned to the caller: the ordered keyword list plus the values map.

use std::collections::HashMap;

use crate::types::{ActionKind, EntityKind, Payload, SlotName, SlotValue};

/// Build the final payload. Keywords are ordered action, entity, then the
/// required slot names; the values map is trimmed to the required slots.
pub fn build(
    action: ActionKind,
    entity: EntityKind,
    mut slots: HashMap<SlotName, SlotValue>,
) -> Payload {
    let required = action.required_slots();

    let mut keywords = Vec::with_capacity(2 + required.len());
    keywords.push(action.as_str().to_string());
    keywords.push(entity.as_str().to_string());
    keywords.extend(required.iter().map(|slot| slot.display_name().to_string()));

    slots.retain(|name, _| required.contains(name));

    Payload {
        keywords,
        action,
        entity,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpiryDate;

    #[test]
    fn test_keyword_order() {
        let mut slots = HashMap::new();
        slots.insert(SlotName::BatchName, SlotValue::Text("batch1".to_string()));
        slots.insert(SlotName::Size, SlotValue::Size(500000));
        slots.insert(
            SlotName::ExpiryDate,
            SlotValue::Date(ExpiryDate { month: 3, year: 2025 }),
        );

        let payload = build(ActionKind::Create, EntityKind::Batch, slots);
        assert_eq!(
            payload.keywords,
            vec!["create", "batch", "batch name", "size", "expiry date"]
        );
    }

    #[test]
    fn test_values_trimmed_to_required() {
        let mut slots = HashMap::new();
        slots.insert(SlotName::BatchName, SlotValue::Text("batch42".to_string()));
        slots.insert(SlotName::Size, SlotValue::Size(10)); // not required for delete

        let payload = build(ActionKind::Delete, EntityKind::Batch, slots);
        assert_eq!(payload.slots.len(), 1);
        assert!(payload.slots.contains_key(&SlotName::BatchName));
    }

    #[test]
    fn test_payload_json_shape() {
        let mut slots = HashMap::new();
        slots.insert(SlotName::BatchName, SlotValue::Text("batch1".to_string()));

        let payload = build(ActionKind::Delete, EntityKind::Batch, slots);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["action"], "delete");
        assert_eq!(json["entity"], "batch");
        assert_eq!(json["slots"]["batch_name"], "batch1");
    }
}

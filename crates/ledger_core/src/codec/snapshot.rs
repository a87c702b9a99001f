//! Whole-state JSON snapshot.
//!
//! Used for the durable storage slot and accepted as a legacy import shape.
//! Field names are camelCase (`personId`, `itemAdjustments`, `createdAt`)
//! and entry kinds are stored under `type`.

use super::CodecResult;
use crate::model::state::LedgerState;

pub fn encode(state: &LedgerState) -> CodecResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Missing collections and a missing `language` decode to their defaults.
pub fn decode(text: &str) -> CodecResult<LedgerState> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::model::entry::{ItemAdjustment, ItemAdjustmentType};
    use crate::model::state::{Language, LedgerState};

    #[test]
    fn decodes_legacy_snapshot_shape() {
        let text = r#"{
            "persons": [{"id": "p1", "name": "Sara", "createdAt": "2024-01-01T00:00:00.000Z"}],
            "transactions": [],
            "itemAdjustments": [{
                "id": "a1", "personId": "p1", "itemName": "Flour bag", "amount": 1200,
                "type": "given_by_me", "date": "2024-01-05", "time": "18:00",
                "description": "", "createdAt": "2024-01-05T18:00:00.000Z"
            }],
            "language": "ur"
        }"#;

        let state = decode(text).unwrap();
        assert_eq!(state.language, Language::Ur);
        assert_eq!(state.persons[0].name, "Sara");
        assert_eq!(state.item_adjustments[0].kind, ItemAdjustmentType::GivenByMe);
        assert_eq!(state.item_adjustments[0].amount, 1200.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state = decode(r#"{"persons": []}"#).unwrap();
        assert_eq!(state, LedgerState::default());
    }

    #[test]
    fn encode_decode_keeps_language_and_records() {
        let state = LedgerState {
            item_adjustments: vec![ItemAdjustment {
                id: "a1".to_string(),
                person_id: "p1".to_string(),
                item_name: "Phone charger".to_string(),
                amount: 850.5,
                kind: ItemAdjustmentType::GivenToMe,
                date: "2024-02-01".to_string(),
                time: "12:00".to_string(),
                description: "used".to_string(),
                created_at: "2024-02-01T12:00:00.000Z".to_string(),
            }],
            language: Language::Ur,
            ..LedgerState::default()
        };

        assert_eq!(decode(&encode(&state).unwrap()).unwrap(), state);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(decode("{\"persons\": [").is_err());
    }
}

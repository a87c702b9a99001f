#![allow(dead_code)]

use ledger_core::{
    ItemAdjustment, ItemAdjustmentType, Person, Transaction, TransactionType,
};

pub fn person(id: &str, name: &str) -> Person {
    Person {
        id: id.to_string(),
        name: name.to_string(),
        created_at: "2024-01-01T09:00:00.000Z".to_string(),
    }
}

pub fn transaction(id: &str, person_id: &str, kind: TransactionType, amount: f64) -> Transaction {
    Transaction {
        id: id.to_string(),
        person_id: person_id.to_string(),
        kind,
        amount,
        date: "2024-01-02".to_string(),
        time: "10:15".to_string(),
        description: String::new(),
        created_at: "2024-01-02T10:15:00.000Z".to_string(),
    }
}

pub fn adjustment(
    id: &str,
    person_id: &str,
    kind: ItemAdjustmentType,
    amount: f64,
) -> ItemAdjustment {
    ItemAdjustment {
        id: id.to_string(),
        person_id: person_id.to_string(),
        item_name: "Wheat flour".to_string(),
        amount,
        kind,
        date: "2024-01-03".to_string(),
        time: "18:40".to_string(),
        description: String::new(),
        created_at: "2024-01-03T18:40:00.000Z".to_string(),
    }
}

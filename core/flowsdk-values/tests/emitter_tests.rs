//! Emitting entities as generic objects.

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::*;
use flowsdk_values::prelude::*;
use pretty_assertions::assert_eq;

fn ada() -> Person {
    Person {
        id: "p1".into(),
        name: "Ada".into(),
        age: Some(37),
        active: true,
    }
}

fn line(id: &str, quantity: i64) -> Line {
    Line {
        id: id.into(),
        sku: format!("SKU-{id}"),
        quantity,
        price: None,
    }
}

#[test]
fn emits_scalars_in_declaration_order() {
    let object = parser().to_object(&ada()).unwrap();
    assert_eq!(
        object,
        MObject::new("Person", "p1")
            .with_property(Property::content("Name", "Ada"))
            .with_property(Property::content("Age", "37"))
            .with_property(Property::content("Active", "true"))
    );
}

#[test]
fn absent_number_and_date_time_emit_empty_content() {
    let order = Order {
        id: "o1".into(),
        ..Order::default()
    };
    let object = parser().to_object(&order).unwrap();

    assert_eq!(object.property("Placed At").unwrap().value, PropertyValue::Content(String::new()));
    assert_eq!(object.property("Total").unwrap().value, PropertyValue::Content(String::new()));
}

#[test]
fn absent_string_and_object_emit_null() {
    let account = Account {
        id: "a1".into(),
        ..Account::default()
    };
    let object = parser().to_object(&account).unwrap();
    assert!(object.property("Nickname").unwrap().value.is_null());

    let order = Order {
        id: "o1".into(),
        ..Order::default()
    };
    let object = parser().to_object(&order).unwrap();
    assert!(object.property("Customer").unwrap().value.is_null());
}

#[test]
fn empty_list_emits_no_objects() {
    let order = Order {
        id: "o1".into(),
        ..Order::default()
    };
    let object = parser().to_object(&order).unwrap();
    assert_eq!(
        object.property("Lines").unwrap().value,
        PropertyValue::Objects(vec![])
    );
}

#[test]
fn numbers_use_shortest_representation() {
    let account = Account {
        id: "a1".into(),
        weight: 2.0,
        rank: -4,
        ..Account::default()
    };
    let object = parser().to_object(&account).unwrap();
    assert_eq!(object.property("Weight").unwrap().value.as_content(), Some("2"));
    assert_eq!(object.property("Rank").unwrap().value.as_content(), Some("-4"));

    let order = Order {
        id: "o1".into(),
        total: Some(12.5),
        ..Order::default()
    };
    let object = parser().to_object(&order).unwrap();
    assert_eq!(object.property("Total").unwrap().value.as_content(), Some("12.5"));
}

#[test]
fn date_times_emit_rfc3339() {
    let placed_at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap();
    let order = Order {
        id: "o1".into(),
        placed_at: Some(placed_at),
        ..Order::default()
    };
    let object = parser().to_object(&order).unwrap();
    assert_eq!(
        object.property("Placed At").unwrap().value.as_content(),
        Some("2024-03-01T12:00:00+02:00")
    );

    let account = Account {
        id: "a1".into(),
        created: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
        ..Account::default()
    };
    let object = parser().to_object(&account).unwrap();
    assert_eq!(
        object.property("Created").unwrap().value.as_content(),
        Some("2024-03-01T10:00:00+00:00")
    );
}

#[test]
fn emits_nested_object_and_list() {
    let order = Order {
        id: "o1".into(),
        customer: Some(ada()),
        lines: vec![line("l1", 1), line("l2", 2)],
        ..Order::default()
    };
    let object = parser().to_object(&order).unwrap();

    let customer = object.property("Customer").unwrap().value.as_objects().unwrap();
    assert_eq!(customer.len(), 1);
    assert_eq!(customer[0].developer_name, "Person");
    assert_eq!(customer[0].external_id, "p1");

    let lines = object.property("Lines").unwrap().value.as_objects().unwrap();
    let ids: Vec<&str> = lines.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["l1", "l2"]);
    assert_eq!(
        lines[1].property("Quantity").unwrap().value.as_content(),
        Some("2")
    );
}

#[test]
fn entity_without_constructor_can_be_emitted() {
    let receipt = Receipt {
        id: "r1".into(),
        amount: 9.5,
    };
    let object = parser().to_object(&receipt).unwrap();
    assert_eq!(object.developer_name, "Receipt");
    assert_eq!(object.property("Amount").unwrap().value.as_content(), Some("9.5"));
}

#[test]
fn mismatched_binding_fails_to_emit() {
    let counter = Counter {
        id: "c1".into(),
        count: true,
    };
    let err = parser().to_object(&counter).unwrap_err();
    assert!(matches!(err, ValueError::TypePropertyMismatch { .. }));
}

#[test]
fn emit_depth_is_bounded() {
    let parser = parser_with(BinderConfig {
        max_depth: 1,
        ..BinderConfig::default()
    });
    let deep = Node {
        id: "n0".into(),
        children: vec![Node {
            id: "n1".into(),
            children: vec![Node {
                id: "n2".into(),
                children: vec![],
            }],
        }],
    };
    let err = parser.to_object(&deep).unwrap_err();
    assert!(matches!(err.root_cause(), ValueError::DepthExceeded { max_depth: 1, .. }));
}

#[test]
fn to_objects_keeps_order() {
    let lines = vec![line("l1", 1), line("l2", 2), line("l3", 3)];
    let objects = parser().to_objects(&lines).unwrap();
    let ids: Vec<&str> = objects.iter().map(|o| o.external_id.as_str()).collect();
    assert_eq!(ids, vec!["l1", "l2", "l3"]);
}

#[test]
fn parse_after_emit_restores_the_entity() {
    let parser = parser();
    let order = Order {
        id: "o1".into(),
        customer: Some(ada()),
        lines: vec![line("l1", 1), line("l2", 2), line("l3", 3)],
        placed_at: Some(DateTime::parse_from_rfc3339("2024-03-01T12:00:00-05:00").unwrap()),
        notes: "fragile".into(),
        total: Some(99.95),
    };

    let object = parser.to_object(&order).unwrap();
    let restored: Order = parser.from_object(&object).unwrap();
    assert_eq!(restored, order);
}

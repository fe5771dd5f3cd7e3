//! Shared entities and helpers for value binding tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, Utc};
use flowsdk_values::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: Option<i32>,
    pub active: bool,
}

impl Entity for Person {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::new("Person")
            .identifier(field!(Person, id))
            .property("Name", ContentType::String, field!(Person, name))
            .property("Age", ContentType::Number, field!(Person, age))
            .property("Active", ContentType::Boolean, field!(Person, active))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub id: String,
    pub sku: String,
    pub quantity: i64,
    pub price: Option<f64>,
}

impl Entity for Line {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::new("Line")
            .identifier(field!(Line, id))
            .property("Sku", ContentType::String, field!(Line, sku))
            .property("Quantity", ContentType::Number, field!(Line, quantity))
            .property("Price", ContentType::Number, field!(Line, price))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer: Option<Person>,
    pub lines: Vec<Line>,
    pub placed_at: Option<DateTime<FixedOffset>>,
    pub notes: String,
    pub total: Option<f64>,
}

impl Entity for Order {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::new("Order")
            .identifier(field!(Order, id))
            .property("Customer", ContentType::Object, field!(Order, customer))
            .property("Lines", ContentType::List, field!(Order, lines))
            .property("Placed At", ContentType::DateTime, field!(Order, placed_at))
            .property("Notes", ContentType::Content, field!(Order, notes))
            .property("Total", ContentType::Number, field!(Order, total))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub id: String,
    pub api_key: String,
    pub secret: String,
    pub nickname: Option<String>,
    pub weight: f32,
    pub rank: i16,
    pub created: Option<DateTime<Utc>>,
}

impl Entity for Account {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::new("Account")
            .identifier(field!(Account, id))
            .property("API Key", ContentType::Encrypted, field!(Account, api_key))
            .property("Secret", ContentType::Password, field!(Account, secret))
            .property("Nickname", ContentType::String, field!(Account, nickname))
            .property("Weight", ContentType::Number, field!(Account, weight))
            .property("Rank", ContentType::Number, field!(Account, rank))
            .property("Created", ContentType::DateTime, field!(Account, created))
    }
}

/// A `bool` field declared as a number.
#[derive(Debug, Default)]
pub struct Counter {
    pub id: String,
    pub count: bool,
}

impl Entity for Counter {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::new("Counter")
            .identifier(field!(Counter, id))
            .property("Count", ContentType::Number, field!(Counter, count))
    }
}

/// An entity that can be emitted but not parsed.
#[derive(Debug)]
pub struct Receipt {
    pub id: String,
    pub amount: f64,
}

impl Entity for Receipt {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::without_constructor("Receipt")
            .identifier(field!(Receipt, id))
            .property("Amount", ContentType::Number, field!(Receipt, amount))
    }
}

/// A self-referencing chain, for depth limits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: String,
    pub children: Vec<Node>,
}

impl Entity for Node {
    fn declare() -> EntityDeclaration<Self> {
        EntityDeclaration::new("Node")
            .identifier(field!(Node, id))
            .property("Children", ContentType::List, field!(Node, children))
    }
}

pub fn registry() -> Arc<TypeRegistry> {
    Arc::new(
        TypeRegistry::builder()
            .register::<Person>()
            .register::<Line>()
            .register::<Order>()
            .register::<Account>()
            .register::<Counter>()
            .register::<Receipt>()
            .register::<Node>()
            .build()
            .unwrap(),
    )
}

pub fn parser() -> ValueParser {
    ValueParser::new(registry())
}

pub fn parser_with(config: BinderConfig) -> ValueParser {
    ValueParser::with_config(registry(), config)
}

pub fn person_object(id: &str, name: &str, age: &str, active: &str) -> MObject {
    MObject::new("Person", id)
        .with_property(Property::content("Name", name))
        .with_property(Property::content("Age", age))
        .with_property(Property::content("Active", active))
}

pub fn line_object(id: &str, sku: &str, quantity: &str) -> MObject {
    MObject::new("Line", id)
        .with_property(Property::content("Sku", sku))
        .with_property(Property::content("Quantity", quantity))
}

/// Builds a chain of `depth` nested nodes below the root.
pub fn node_chain(depth: usize) -> MObject {
    let mut node = MObject::new("Node", format!("n{depth}"));
    for level in (0..depth).rev() {
        node = MObject::new("Node", format!("n{level}"))
            .with_property(Property::objects("Children", vec![node]));
    }
    node
}

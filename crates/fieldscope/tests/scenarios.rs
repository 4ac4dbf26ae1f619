//! End-to-end scenarios: validation and serialization of concrete objects

use std::cell::RefCell;
use std::rc::Rc;

use fieldscope::prelude::*;
use fieldscope::{
    ConstraintSpec, FieldDecl, ObjectRef, RawAccess, Scalar, Serializer, SerializerConfig, TypeDecl,
    TypeRegistry, ValueKind,
};
use pretty_assertions::assert_eq;

/// Hand-written implementation with camel-case field names
struct Talker {
    speed: i64,
    can_speak: bool,
}

static TALKER: TypeDecl = TypeDecl {
    name: "Talker",
    path: concat!(module_path!(), "::Talker"),
    parent: None,
    fields: &[
        FieldDecl::new("speed", ValueKind::Int).min(0.0).max(200.0),
        FieldDecl::new("canSpeak", ValueKind::Bool),
    ],
    capabilities: &[],
};

impl Introspect for Talker {
    fn declaration(&self) -> &'static TypeDecl {
        &TALKER
    }

    fn field_value(&self, name: &str, _access: RawAccess) -> Option<FieldValue<'_>> {
        match name {
            "speed" => Some(FieldValue::Int(self.speed)),
            "canSpeak" => Some(FieldValue::Bool(self.can_speak)),
            _ => None,
        }
    }
}

introspectable! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Desk implements ["cascade-validation"] {
        pub height: i32 => [min: 0],
    }
}

introspectable! {
    #[derive(Debug, Clone)]
    pub struct Room {
        pub name: String,
        pub list: Vec<Desk>,
    }
}

introspectable! {
    #[derive(Debug, Clone)]
    pub struct Cockatoo {
        pub crest: i32 => [min: 0, max: 10],
        mood: f64 => [min: -1.0, max: 1.0],
    }
}

introspectable! {
    #[derive(Debug, Clone)]
    pub struct Aviary {
        pub bird: Cockatoo,
        pub desks: Vec<Desk>,
        pub label: Option<String>,
    }
}

introspectable! {
    pub struct Vault implements ["opaque"] {
        combination: String,
    }
}

introspectable! {
    pub struct Bank {
        pub name: String,
        pub vault: Vault,
    }
}

introspectable! {
    pub struct Label {
        pub text: String => [min: 0, max: 1],
        pub parts: Vec<i32> => [max: 0],
        pub desk: Desk => [min: 5],
    }
}

introspectable! {
    pub struct Caption {
        pub text: String,
        pub size: i32,
    }
}

/// Linked node that can point back at itself
struct Node {
    label: String,
    next: RefCell<Option<Rc<Node>>>,
}

static NODE: TypeDecl = TypeDecl {
    name: "ScenarioNode",
    path: concat!(module_path!(), "::Node"),
    parent: None,
    fields: &[
        FieldDecl::new("label", ValueKind::String),
        FieldDecl::new("next", ValueKind::Object),
    ],
    capabilities: &[],
};

impl Introspect for Node {
    fn declaration(&self) -> &'static TypeDecl {
        &NODE
    }

    fn field_value(&self, name: &str, _access: RawAccess) -> Option<FieldValue<'_>> {
        match name {
            "label" => Some(self.label.as_field_value()),
            "next" => Some(match self.next.borrow().as_ref() {
                Some(next) => {
                    let shared: Rc<dyn Introspect> = Rc::clone(next) as Rc<dyn Introspect>;
                    FieldValue::Object(ObjectRef::Shared(shared))
                }
                None => FieldValue::Null,
            }),
            _ => None,
        }
    }
}

fn node(label: &str) -> Rc<Node> {
    Rc::new(Node {
        label: label.to_string(),
        next: RefCell::new(None),
    })
}

#[test]
fn test_speed_out_of_range() {
    let talker = Talker {
        speed: 250,
        can_speak: true,
    };

    let violations = validate(&talker);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field_name, "speed");
    assert_eq!(violations[0].object_type_name, "Talker");
    assert_eq!(violations[0].actual_value, Scalar::Int(250));
    assert_eq!(violations[0].actual_value.to_string(), "250");

    assert_eq!(serialize(&talker).unwrap(), "{speed: 250, canSpeak: true}");
}

#[test]
fn test_speed_in_range() {
    let talker = Talker {
        speed: 200,
        can_speak: false,
    };
    assert!(validate(&talker).is_empty());
    assert_eq!(serialize(&talker).unwrap(), "{speed: 200, canSpeak: false}");
}

#[test]
fn test_nested_sequence_of_objects_keeps_order() {
    let room = Room {
        name: "Lily".to_string(),
        list: vec![Desk { height: 10 }, Desk { height: 20 }],
    };

    assert_eq!(
        serialize(&room).unwrap(),
        r#"{name: "Lily", list: [{height: 10}, {height: 20}]}"#
    );
}

#[test]
fn test_hidden_fields_are_validated_and_serialized() {
    let bird = Cockatoo { crest: 4, mood: -3.5 };

    let violations = validate(&bird);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field_name, "mood");
    assert_eq!(violations[0].actual_value, Scalar::Float(-3.5));

    assert_eq!(serialize(&bird).unwrap(), "{crest: 4, mood: -3.5}");
}

#[test]
fn test_cascade_only_into_opted_in_types() {
    let aviary = Aviary {
        bird: Cockatoo { crest: 99, mood: 0.0 },
        desks: vec![Desk { height: 5 }, Desk { height: -1 }, Desk { height: -2 }],
        label: None,
    };

    let violations = validate(&aviary);
    let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, ["desks[1].height", "desks[2].height"]);
    assert!(violations.iter().all(|v| v.object_type_name == "Desk"));
}

#[test]
fn test_check_turns_violations_into_error() {
    let desk = Desk { height: -1 };
    let failure = fieldscope::Validator::new().check(&desk).unwrap_err();
    assert_eq!(failure.violations.len(), 1);

    assert!(fieldscope::Validator::new().check(&Desk { height: 0 }).is_ok());
}

#[test]
fn test_null_and_nested_object_rendering() {
    let aviary = Aviary {
        bird: Cockatoo { crest: 1, mood: 0.5 },
        desks: vec![],
        label: None,
    };

    assert_eq!(
        serialize(&aviary).unwrap(),
        "{bird: {crest: 1, mood: 0.5}, desks: [], label: null}"
    );
}

#[test]
fn test_opaque_objects_hide_their_fields() {
    let bank = Bank {
        name: "First \"Federal\"".to_string(),
        vault: Vault {
            combination: "12-34-56".to_string(),
        },
    };

    assert_eq!(
        serialize(&bank).unwrap(),
        r#"{name: "First \"Federal\"", vault: <Vault>}"#
    );
}

#[test]
fn test_self_reference_hits_depth_guard() {
    let looped = node("loop");
    *looped.next.borrow_mut() = Some(Rc::clone(&looped));

    let err = serialize(&*looped).unwrap_err();
    assert!(matches!(
        err,
        FieldscopeError::CycleOrDepthExceeded { ref type_name, limit: 64 } if type_name == "ScenarioNode"
    ));

    let shallow = Serializer::new().with_config(SerializerConfig { max_depth: 3 });
    assert!(shallow.serialize(&*looped).is_err());

    // Break the cycle so the test does not leak
    looped.next.borrow_mut().take();
}

#[test]
fn test_acyclic_chain_serializes() {
    let tail = node("c");
    let middle = node("b");
    *middle.next.borrow_mut() = Some(tail);
    let head = node("a");
    *head.next.borrow_mut() = Some(middle);

    assert_eq!(
        serialize(&*head).unwrap(),
        r#"{label: "a", next: {label: "b", next: {label: "c", next: null}}}"#
    );

    let tight = Serializer::new().with_config(SerializerConfig { max_depth: 2 });
    assert!(tight.serialize(&*head).is_err());
}

#[test]
fn test_constraints_on_non_numeric_fields_are_ignored() {
    let label = Label {
        text: "abc".to_string(),
        parts: vec![1, 2, 3],
        desk: Desk { height: 1 },
    };

    assert!(validate(&label).is_empty());
    assert_eq!(
        serialize(&label).unwrap(),
        r#"{text: "abc", parts: [1, 2, 3], desk: {height: 1}}"#
    );
}

#[test]
fn test_registered_constraint_on_string_field_is_ignored() {
    let caption = Caption {
        text: "a long caption".to_string(),
        size: 12,
    };

    let descriptor = TypeRegistry::global()
        .register(
            caption.declaration(),
            &[
                ConstraintSpec::new("text", Some(0.0), Some(1.0)),
                ConstraintSpec::new("size", None, Some(10.0)),
            ],
        )
        .unwrap();
    assert!(descriptor.field("text").unwrap().constraint.is_some());

    let violations = validate(&caption);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field_name, "size");
}

//! Sample types exercised by the demo

use fieldscope::{capabilities, introspectable, Introspect};

introspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct Animal implements ["walkable"] {
        pub age: i32 => [min: 0],
    }
}

introspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct Parrot extends Animal(animal) {
        pub fly_speed: i32 => [min: 0, max: 150],
        can_talk: bool,
        pub pet_name: Option<String>,
    }
}

impl Parrot {
    pub fn talking(can_talk: bool) -> Self {
        Self {
            can_talk,
            ..Default::default()
        }
    }

    pub fn set_fly_speed(&mut self, fly_speed: i32) {
        self.fly_speed = fly_speed;
    }

    pub fn set_can_talk(&mut self, can_talk: bool) {
        self.can_talk = can_talk;
    }
}

introspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct Desk implements ["cascade-validation"] {
        pub height: i32 => [min: 0],
    }
}

impl Desk {
    pub fn new(height: i32) -> Self {
        Self { height }
    }
}

introspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct JsonModel {
        pub name: String,
        pub age: u32,
        pub parrot: Parrot,
        pub letters: Vec<String>,
        pub parrots: Vec<Parrot>,
        pub desks: Vec<Desk>,
    }
}

/// Names accepted by `describe` and `read`
pub const TYPE_NAMES: &[&str] = &["Animal", "Parrot", "Desk", "JsonModel"];

/// A talking parrot called "wuwu"
pub fn sample_parrot() -> Parrot {
    let mut parrot = Parrot::default();
    parrot.set_fly_speed(100);
    parrot.set_can_talk(true);
    parrot.pet_name = Some("wuwu".to_string());
    parrot
}

pub fn sample_model() -> JsonModel {
    JsonModel {
        name: "Lily".to_string(),
        age: 20,
        parrot: Parrot::default(),
        letters: vec!["a".to_string(), "b".to_string()],
        parrots: vec![Parrot::talking(true), sample_parrot()],
        desks: vec![Desk::new(10), Desk::new(20)],
    }
}

/// A representative instance of the named type
pub fn sample(type_name: &str) -> Option<Box<dyn Introspect>> {
    let value: Box<dyn Introspect> = match type_name {
        "Animal" => Box::new(Animal { age: 3 }),
        "Parrot" => Box::new(sample_parrot()),
        "Desk" => Box::new(Desk::new(75)),
        "JsonModel" => Box::new(sample_model()),
        _ => return None,
    };
    Some(value)
}

/// Tags worth checking in the capabilities demo
pub const INTERESTING_TAGS: &[&str] = &["walkable", capabilities::CASCADE_VALIDATION];

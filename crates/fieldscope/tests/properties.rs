//! Property tests for cache stability, validation and determinism

use std::sync::Arc;

use fieldscope::prelude::*;
use proptest::prelude::*;

introspectable! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Gauge {
        pub level: i64 => [min: 0],
        pub name: String,
        pub enabled: bool,
    }
}

introspectable! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Plain {
        pub count: i32,
        pub ratio: f64,
        pub tags: Vec<String>,
    }
}

fn gauge() -> impl Strategy<Value = Gauge> {
    (any::<i64>(), ".{0,12}", any::<bool>()).prop_map(|(level, name, enabled)| Gauge { level, name, enabled })
}

proptest! {
    #[test]
    fn describe_is_stable(g in gauge()) {
        let first = describe_type(&g);
        let second = describe_type(&g.clone());
        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(first.fields(), second.fields());
    }

    #[test]
    fn negative_level_is_one_violation(mut g in gauge(), level in i64::MIN..0) {
        g.level = level;
        let violations = validate(&g);
        prop_assert_eq!(violations.len(), 1);
        prop_assert_eq!(&violations[0].field_name, "level");
    }

    #[test]
    fn non_negative_level_is_clean(mut g in gauge(), level in 0..=i64::MAX) {
        g.level = level;
        prop_assert!(validate(&g).is_empty());
    }

    #[test]
    fn unconstrained_objects_never_violate(
        count in any::<i32>(),
        ratio in any::<f64>(),
        tags in prop::collection::vec(".{0,6}", 0..4),
    ) {
        let plain = Plain { count, ratio, tags };
        prop_assert!(validate(&plain).is_empty());
    }

    #[test]
    fn equal_values_serialize_identically(g in gauge()) {
        let copy = g.clone();
        prop_assert_eq!(serialize(&g).unwrap(), serialize(&copy).unwrap());
    }

    #[test]
    fn different_values_serialize_differently(a in gauge(), b in gauge()) {
        prop_assume!(a != b);
        prop_assert_ne!(serialize(&a).unwrap(), serialize(&b).unwrap());
    }
}

//! Declarative macro for introspectable structs

/// Declare a struct together with its introspection metadata.
///
/// `pub` fields are visible; all others need privileged access. A parent
/// type is embedded as a public field and its declared fields are
/// inherited. Range bounds follow `=>` in brackets.
///
/// ```
/// use fieldscope::introspectable;
///
/// introspectable! {
///     #[derive(Debug, Default)]
///     pub struct Animal implements ["walkable"] {
///         pub age: i32 => [min: 0],
///     }
/// }
///
/// introspectable! {
///     #[derive(Debug, Default)]
///     pub struct Parrot extends Animal(animal) {
///         pub fly_speed: i32 => [min: 0, max: 150],
///         can_talk: bool,
///         pub pet_name: Option<String>,
///     }
/// }
///
/// let parrot = Parrot { fly_speed: 200, ..Default::default() };
/// assert_eq!(fieldscope::validate(&parrot).len(), 1);
/// ```
#[macro_export]
macro_rules! introspectable {
    // Helper: read a field the type does not declare itself
    (@inherited $self:ident, $name:ident, $access:ident, $pfield:ident) => {
        $crate::Introspect::field_value(&$self.$pfield, $name, $access)
    };

    (@inherited $self:ident, $name:ident, $access:ident) => {{
        let _ = ($name, $access);
        ::std::option::Option::None
    }};

    // Helper: parent declaration
    (@parent $parent:ident) => {
        ::std::option::Option::Some(&<$parent as $crate::Declared>::DECL)
    };

    (@parent) => {
        ::std::option::Option::None
    };

    // Helper: bound keyword
    (@bound min) => { $crate::Bound::Min };
    (@bound max) => { $crate::Bound::Max };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident
        $(extends $parent:ident ( $pfield:ident ))?
        $(implements [ $($cap:literal),* $(,)? ])?
        {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ftype:ty $(=> [ $($bound:ident : $value:expr),+ $(,)? ])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(pub $pfield: $parent,)?
            $(
                $(#[$fmeta])*
                $fvis $field: $ftype,
            )*
        }

        impl $crate::Declared for $name {
            const DECL: $crate::TypeDecl = {
                const FIELDS: &[$crate::FieldDecl] = &[
                    $(
                        $crate::FieldDecl::new(
                            stringify!($field),
                            <$ftype as $crate::AsFieldValue>::KIND,
                        )
                        .visible(!stringify!($fvis).is_empty())
                        $(.bounds(&[$(($crate::introspectable!(@bound $bound), ($value) as f64)),+]))?
                    ),*
                ];

                $crate::TypeDecl {
                    name: stringify!($name),
                    path: concat!(module_path!(), "::", stringify!($name)),
                    parent: $crate::introspectable!(@parent $($parent)?),
                    fields: FIELDS,
                    capabilities: &[$($($cap),*)?],
                }
            };
        }

        impl $crate::Introspect for $name {
            fn declaration(&self) -> &'static $crate::TypeDecl {
                static DECL: $crate::TypeDecl = <$name as $crate::Declared>::DECL;
                &DECL
            }

            fn field_value(
                &self,
                name: &str,
                access: $crate::RawAccess,
            ) -> ::std::option::Option<$crate::FieldValue<'_>> {
                match name {
                    $(
                        stringify!($field) => ::std::option::Option::Some(
                            $crate::AsFieldValue::as_field_value(&self.$field),
                        ),
                    )*
                    _ => $crate::introspectable!(@inherited self, name, access $(, $pfield)?),
                }
            }
        }

        impl $crate::AsFieldValue for $name {
            const KIND: $crate::ValueKind = $crate::ValueKind::Object;

            fn as_field_value(&self) -> $crate::FieldValue<'_> {
                $crate::FieldValue::Object($crate::ObjectRef::Borrowed(self))
            }
        }
    };
}

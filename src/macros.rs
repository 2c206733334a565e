/// Implements [`Scannable`](crate::traits::Scannable) and
/// [`ScanFields`](crate::traits::ScanFields) for a struct.
///
/// Entries are listed in declaration order and each takes one of these forms:
///
/// - `field`: column named after the lower-cased field name
/// - `field: "column"`: explicit column name
/// - `embed field` / `embed_opt field`: struct (or `Option<Box<_>>`) whose
///   fields are matched as if they were declared on the parent
/// - `nest field` / `nest_opt field`, optionally `: "prefix"`: struct whose
///   fields are matched as `"<prefix>.<column>"`
///
/// `_opt` fields are allocated with `Default::default()` when a column is
/// written through them. Fields left out of the list are never written.
///
/// # Example
/// ```
/// use std::time::SystemTime;
///
/// #[derive(Default)]
/// struct Entity {
///     id: String,
///     created_at: Option<SystemTime>,
///     some_data: String,
/// }
///
/// pgscan::scannable!(Entity {
///     id,
///     created_at: "created_at",
///     some_data: "some_data",
/// });
/// ```
#[macro_export]
macro_rules! scannable {
    (@munch $ty:ident; [$(($def:ident $access:ident $field:ident $tag:expr))*];) => {
        impl $crate::traits::Scannable for $ty {
            fn fields() -> ::std::vec::Vec<$crate::mapping::Field> {
                ::std::vec![
                    $(
                        $crate::mapping::Field::$def(
                            ::std::stringify!($field),
                            $tag,
                            |value: &$ty| &value.$field,
                        ),
                    )*
                ]
            }
        }

        impl $crate::traits::ScanFields for $ty {
            #[allow(unused_assignments)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::std::option::Option<$crate::traits::FieldMut<'_>> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return ::std::option::Option::Some(
                            $crate::traits::FieldMut::$access(&mut self.$field),
                        );
                    }
                    position += 1;
                )*
                ::std::option::Option::None
            }
        }
    };

    (@munch $ty:ident; [$($acc:tt)*]; embed $field:ident $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (embed nested $field ::std::option::Option::None)];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; embed_opt $field:ident $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (embed_opt nested_opt $field ::std::option::Option::None)];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; nest $field:ident : $tag:literal $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (nest nested $field ::std::option::Option::Some($tag))];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; nest $field:ident $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (nest nested $field ::std::option::Option::None)];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; nest_opt $field:ident : $tag:literal $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (nest_opt nested_opt $field ::std::option::Option::Some($tag))];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; nest_opt $field:ident $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (nest_opt nested_opt $field ::std::option::Option::None)];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; $field:ident : $tag:literal $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (value value $field ::std::option::Option::Some($tag))];
            $($($rest)*)?
        );
    };
    (@munch $ty:ident; [$($acc:tt)*]; $field:ident $(, $($rest:tt)*)?) => {
        $crate::scannable!(
            @munch $ty;
            [$($acc)* (value value $field ::std::option::Option::None)];
            $($($rest)*)?
        );
    };

    ($ty:ident { $($body:tt)* }) => {
        $crate::scannable!(@munch $ty; []; $($body)*);
    };
}

#[cfg(test)]
mod tests {
    use crate::mapping::FieldKind;
    use crate::traits::{FieldMut, ScanFields, Scannable};

    #[derive(Default)]
    struct Inner {
        flag: bool,
    }

    crate::scannable!(Inner { flag });

    #[derive(Default)]
    struct Outer {
        id: i64,
        inner: Inner,
        extra: Option<Box<Inner>>,
        label: String,
    }

    crate::scannable!(Outer {
        id: "outer_id",
        embed inner,
        nest_opt extra: "x",
        label,
    });

    #[test]
    fn test_fields_follow_declaration_order() {
        let fields = Outer::fields();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "inner", "extra", "label"]);
        assert_eq!(fields[0].tag, Some("outer_id"));
        assert_eq!(fields[2].tag, Some("x"));
        assert_eq!(fields[3].tag, None);
        assert!(matches!(fields[0].kind, FieldKind::Value));
        assert!(matches!(fields[1].kind, FieldKind::Embedded(_)));
        assert!(matches!(fields[2].kind, FieldKind::Nested(_)));
    }

    #[test]
    fn test_field_mut_matches_fields() {
        let mut outer = Outer::default();
        assert!(matches!(outer.field_mut(0), Some(FieldMut::Value(_))));
        assert!(matches!(outer.field_mut(1), Some(FieldMut::Nested(_))));
        assert!(matches!(outer.field_mut(3), Some(FieldMut::Value(_))));
        assert!(outer.field_mut(4).is_none());
    }

    #[test]
    fn test_opt_field_is_allocated_on_access() {
        let mut outer = Outer::default();
        assert!(outer.extra.is_none());
        assert!(matches!(outer.field_mut(2), Some(FieldMut::Nested(_))));
        assert!(outer.extra.is_some());
    }
}

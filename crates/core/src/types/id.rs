//! Newtype IDs for type-safe entity references.
//!
//! WordPress identifies every record by an integer `databaseId`. Use the
//! `define_id!` macro to create wrappers that prevent mixing a product ID with
//! a post ID.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use dainam_core::define_id;
/// define_id!(ProductId);
/// define_id!(PostId);
///
/// let product_id = ProductId::new(1);
/// let post_id = PostId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = post_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from a WordPress `databaseId`.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(PostId);
define_id!(ProjectId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::new(4521);
        assert_eq!(serde_json::to_string(&id).unwrap(), "4521");

        let parsed: ProductId = serde_json::from_str("4521").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = PostId::from(17);
        assert_eq!(id.to_string(), "17");
        assert_eq!(i64::from(id), 17);
        assert_eq!(id.as_i64(), 17);
    }
}

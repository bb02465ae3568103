//! Logical document type names.
//!
//! A `TypeName` is only ever used as a tag on the wire (`"type": "comment"`).
//! It is derived either from a marker type implementing [`DocumentType`] or
//! from a literal string. There is no runtime reflection: the marker states
//! its wire name up front.
use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

/// Maps a caller-chosen marker type to the type name it is indexed under.
pub trait DocumentType {
    /// `None` for markers that carry no type (see [`Untyped`]).
    const TYPE_NAME: Option<&'static str>;
}

/// Marker for builders that are not scoped to a document type.
#[derive(Debug, Clone, Copy)]
pub enum Untyped {}

impl DocumentType for Untyped {
    const TYPE_NAME: Option<&'static str> = None;
}

/// Implement [`DocumentType`] for one or more marker types.
///
/// ```
/// struct Comment;
/// search_dsl::document_type!(Comment => "comment");
/// assert_eq!(search_dsl::TypeName::of::<Comment>().unwrap().as_str(), "comment");
/// ```
#[macro_export]
macro_rules! document_type {
    ($($marker:ty => $name:literal),* $(,)?) => {
        $(
            impl $crate::DocumentType for $marker {
                const TYPE_NAME: Option<&'static str> = Some($name);
            }
        )*
    };
}

impl TypeName {
    /// Literal names. An empty string means "no type", same as leaving it unset.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() { None } else { Some(Self(name)) }
    }
    pub fn of<T: DocumentType>() -> Option<Self> {
        T::TYPE_NAME.and_then(Self::try_new)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product;
    struct Nameless;
    crate::document_type!(Product => "product", Nameless => "");

    #[test]
    fn derives_name_from_marker() {
        assert_eq!(TypeName::of::<Product>(), TypeName::try_new("product"));
        assert_eq!(TypeName::of::<Untyped>(), None);
        assert_eq!(TypeName::of::<Nameless>(), None);
    }

    #[test]
    fn equality_is_by_string() {
        let a = TypeName::try_new("comment").unwrap();
        assert_eq!(a, "comment");
        assert_eq!(a, TypeName::try_new(String::from("comment")).unwrap());
        assert_eq!(TypeName::try_new(""), None);
    }
}

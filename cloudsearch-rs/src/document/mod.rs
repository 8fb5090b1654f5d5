//! Document types and their field tables.
//!
//! A document is any `Default` struct with a string id and a table of
//! field descriptors. The table replaces runtime reflection: each entry knows
//! the wire name of a field, what kind of value it holds, how to read it for
//! an add batch and how to fill it from the service's string-per-value hit
//! format. The [`search_document!`](crate::search_document) macro writes the
//! table for you.
//!
//! ```
//! use cloudsearch::search_document;
//! use cloudsearch::document::SearchDocument;
//!
//! search_document! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Movie {
//!         pub title: String,
//!         pub year: i64,
//!         pub actor: Vec<String>,
//!     }
//! }
//!
//! assert_eq!(Movie::field_names(), vec!["title", "year", "actor"]);
//! ```

mod field_type;
mod schema;

pub use field_type::{parse_date, FieldKind, FieldType};
pub use schema::fields_of;

/// One entry of a document's field table.
pub struct FieldDescriptor<D> {
    /// Wire name of the field.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Read the field as a JSON value for an add batch.
    pub get: fn(&D) -> serde_json::Value,
    /// Overwrite the field from the wire values of a hit.
    pub set: fn(&mut D, &[String]),
}

impl<D> FieldDescriptor<D> {
    pub fn new(
        name: &'static str,
        kind: FieldKind,
        get: fn(&D) -> serde_json::Value,
        set: fn(&mut D, &[String]),
    ) -> Self {
        Self {
            name,
            kind,
            get,
            set,
        }
    }
}

impl<D> Clone for FieldDescriptor<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for FieldDescriptor<D> {}

impl<D> std::fmt::Debug for FieldDescriptor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A document stored in and returned by the search service.
pub trait SearchDocument: Default + Send + Sync + 'static {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Build the field table. Called at most once per type; use
    /// [`SearchDocument::fields`] to read the memoized table.
    fn describe_fields() -> Vec<FieldDescriptor<Self>>;

    /// The memoized field table for this type.
    fn fields() -> &'static [FieldDescriptor<Self>] {
        fields_of::<Self>()
    }

    /// Names of every field, in declaration order.
    fn field_names() -> Vec<&'static str> {
        Self::fields().iter().map(|field| field.name).collect()
    }

    /// The document's fields as a JSON object, skipping null values.
    fn to_fields_map(&self) -> serde_json::Map<String, serde_json::Value> {
        Self::fields()
            .iter()
            .filter_map(|field| {
                let value = (field.get)(self);
                (!value.is_null()).then(|| (field.name.to_string(), value))
            })
            .collect()
    }
}

/// Declare a document struct and implement [`SearchDocument`] for it.
///
/// A `pub id: String` field is added in front of the declared fields. Every
/// declared field must implement [`FieldType`].
#[macro_export]
macro_rules! search_document {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            pub id: ::std::string::String,
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::document::SearchDocument for $name {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: ::std::string::String) {
                self.id = id;
            }

            fn describe_fields() -> ::std::vec::Vec<$crate::document::FieldDescriptor<Self>> {
                ::std::vec![
                    $(
                        $crate::document::FieldDescriptor::new(
                            stringify!($field),
                            <$ty as $crate::document::FieldType>::KIND,
                            |doc: &Self| $crate::document::FieldType::to_json(&doc.$field),
                            |doc: &mut Self, values: &[::std::string::String]| {
                                doc.$field = <$ty as $crate::document::FieldType>::from_wire(values);
                            },
                        ),
                    )*
                ]
            }
        }
    };
}

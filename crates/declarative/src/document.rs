//! Typed request documents
//!
//! A request document is a tree whose object nodes are instances of a closed
//! set of document types. The set is declared once with
//! [`document_schema!`](crate::document_schema), which generates one struct
//! per type plus an enum over all of them implementing [`DocumentSchema`].
//! The transformer instantiates types by name through that enum and assigns
//! fields by name, so an unknown type or field is reported as a schema error
//! instead of being silently dropped.

/// A node of a request document under construction
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue<N> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<DocValue<N>>),
    Object(N),
}

impl<N> DocValue<N> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Why a field assignment was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The type declares no field with this name
    Unknown,
    /// The value does not fit the declared field type
    Mismatch {
        /// Description of the declared type
        expected: String,
    },
}

/// A closed set of document types
///
/// Implemented by the enum that [`document_schema!`](crate::document_schema)
/// generates; implement it by hand only for tests or unusual schemas.
pub trait DocumentSchema: Sized {
    /// Create an empty instance of the named type
    fn instantiate(type_name: &str) -> Option<Self>;

    /// Name of this node's type
    fn type_name(&self) -> &'static str;

    /// Assign a field by name
    fn set_field(&mut self, field: &str, value: DocValue<Self>) -> Result<(), FieldError>;
}

/// Conversion from a document node into a statically typed field value
pub trait FromDoc<N>: Sized {
    /// Human-readable name of the accepted shape
    fn expected() -> String;

    /// Convert, or `None` if the node has the wrong shape
    fn from_doc(value: DocValue<N>) -> Option<Self>;
}

impl<N> FromDoc<N> for String {
    fn expected() -> String {
        "a string".to_string()
    }

    fn from_doc(value: DocValue<N>) -> Option<Self> {
        match value {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl<N> FromDoc<N> for bool {
    fn expected() -> String {
        "a boolean".to_string()
    }

    fn from_doc(value: DocValue<N>) -> Option<Self> {
        match value {
            DocValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl<N> FromDoc<N> for i64 {
    fn expected() -> String {
        "an integer".to_string()
    }

    fn from_doc(value: DocValue<N>) -> Option<Self> {
        match value {
            DocValue::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl<N> FromDoc<N> for f64 {
    fn expected() -> String {
        "a number".to_string()
    }

    fn from_doc(value: DocValue<N>) -> Option<Self> {
        match value {
            DocValue::Float(f) => Some(f),
            DocValue::Int(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl<N, T: FromDoc<N>> FromDoc<N> for Vec<T> {
    fn expected() -> String {
        format!("a list of {}", T::expected())
    }

    fn from_doc(value: DocValue<N>) -> Option<Self> {
        match value {
            DocValue::List(items) => items.into_iter().map(T::from_doc).collect(),
            _ => None,
        }
    }
}

/// Assign a converted value to an optional field; `Null` leaves it unset
pub fn assign<N, T: FromDoc<N>>(slot: &mut Option<T>, value: DocValue<N>) -> Result<(), FieldError> {
    if value.is_null() {
        *slot = None;
        return Ok(());
    }

    match T::from_doc(value) {
        Some(converted) => {
            *slot = Some(converted);
            Ok(())
        }
        None => Err(FieldError::Mismatch {
            expected: T::expected(),
        }),
    }
}

/// Field name as written in configuration (`r#type` → `type`)
pub fn field_key(ident: &'static str) -> &'static str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Declare a closed set of document types.
///
/// Every listed struct gets `Option` fields, `Default`, and a camelCase
/// `Serialize` that omits unset fields. The leading enum names the schema:
/// it implements [`DocumentSchema`] over all listed structs, and each struct
/// implements [`FromDoc`] for it so it can appear as a field of another.
///
/// ```ignore
/// declarative::document_schema! {
///     pub enum NodeSchema;
///
///     struct Node {
///         name: String,
///         os_disk: OsDisk,
///         zones: Vec<String>,
///     }
///
///     struct OsDisk {
///         size_g_b: i64,
///         r#type: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! document_schema {
    (
        $(#[$schema_meta:meta])*
        $vis:vis enum $schema:ident;

        $(
            $(#[$meta:meta])*
            struct $name:ident {
                $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
            }
        )+
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize)]
            #[serde(rename_all = "camelCase")]
            $vis struct $name {
                $(
                    $(#[$field_meta])*
                    #[serde(skip_serializing_if = "Option::is_none")]
                    pub $field: Option<$ty>,
                )*
            }

            impl $crate::FromDoc<$schema> for $name {
                fn expected() -> String {
                    format!("an object ({})", stringify!($name))
                }

                fn from_doc(value: $crate::DocValue<$schema>) -> Option<Self> {
                    match value {
                        $crate::DocValue::Object($schema::$name(inner)) => Some(*inner),
                        _ => None,
                    }
                }
            }
        )+

        $(#[$schema_meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $schema {
            $( $name(Box<$name>), )+
        }

        impl $crate::DocumentSchema for $schema {
            fn instantiate(type_name: &str) -> Option<Self> {
                match type_name {
                    $( stringify!($name) => Some(Self::$name(Box::default())), )+
                    _ => None,
                }
            }

            fn type_name(&self) -> &'static str {
                match self {
                    $( Self::$name(_) => stringify!($name), )+
                }
            }

            fn set_field(
                &mut self,
                field: &str,
                value: $crate::DocValue<Self>,
            ) -> ::core::result::Result<(), $crate::FieldError> {
                match self {
                    $(
                        Self::$name(node) => {
                            $(
                                if field == $crate::document::field_key(stringify!($field)) {
                                    return $crate::document::assign(&mut node.$field, value);
                                }
                            )*
                            let _ = (node, value);
                            Err($crate::FieldError::Unknown)
                        }
                    )+
                }
            }
        }

        impl ::serde::Serialize for $schema {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
                match self {
                    $( Self::$name(node) => node.serialize(serializer), )+
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Node, OsDisk, TestSchema};

    #[test]
    fn test_instantiate_known_and_unknown() {
        let node = TestSchema::instantiate("OsDisk").unwrap();
        assert_eq!(node.type_name(), "OsDisk");
        assert!(TestSchema::instantiate("Missing").is_none());
    }

    #[test]
    fn test_set_field_by_name() {
        let mut node = TestSchema::instantiate("OsDisk").unwrap();
        node.set_field("size_g_b", DocValue::Int(64)).unwrap();
        node.set_field("type", DocValue::String("Standard_LRS".into()))
            .unwrap();

        let disk = OsDisk::from_doc(DocValue::Object(node)).unwrap();
        assert_eq!(disk.size_g_b, Some(64));
        assert_eq!(disk.r#type.as_deref(), Some("Standard_LRS"));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut node = TestSchema::instantiate("OsDisk").unwrap();
        assert_eq!(
            node.set_field("sizeGB", DocValue::Int(1)),
            Err(FieldError::Unknown)
        );
        // Raw identifier prefix is not part of the field name
        assert_eq!(
            node.set_field("r#type", DocValue::String("x".into())),
            Err(FieldError::Unknown)
        );
    }

    #[test]
    fn test_set_field_type_mismatch() {
        let mut node = TestSchema::instantiate("OsDisk").unwrap();
        let err = node
            .set_field("size_g_b", DocValue::String("64".into()))
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::Mismatch {
                expected: "an integer".into()
            }
        );
    }

    #[test]
    fn test_null_leaves_field_unset() {
        let mut node = TestSchema::instantiate("Node").unwrap();
        node.set_field("name", DocValue::String("n1".into())).unwrap();
        node.set_field("name", DocValue::Null).unwrap();

        let node = Node::from_doc(DocValue::Object(node)).unwrap();
        assert_eq!(node.name, None);
    }

    #[test]
    fn test_vec_conversion() {
        let value: DocValue<TestSchema> = DocValue::List(vec![
            DocValue::String("1".into()),
            DocValue::String("2".into()),
        ]);
        assert_eq!(
            Vec::<String>::from_doc(value),
            Some(vec!["1".to_string(), "2".to_string()])
        );

        let mixed: DocValue<TestSchema> =
            DocValue::List(vec![DocValue::String("1".into()), DocValue::Int(2)]);
        assert_eq!(Vec::<String>::from_doc(mixed), None);
        assert_eq!(<Vec<i64> as FromDoc<TestSchema>>::expected(), "a list of an integer");
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(f64::from_doc(DocValue::<TestSchema>::Int(2)), Some(2.0));
        assert_eq!(i64::from_doc(DocValue::<TestSchema>::Float(2.0)), None);
    }

    #[test]
    fn test_serialize_camel_case_skips_unset() {
        let disk = OsDisk {
            size_g_b: Some(30),
            r#type: None,
        };
        let json = serde_json::to_value(&disk).unwrap();
        assert_eq!(json, serde_json::json!({"sizeGB": 30}));
    }

    #[test]
    fn test_field_key() {
        assert_eq!(field_key("r#type"), "type");
        assert_eq!(field_key("name"), "name");
    }
}

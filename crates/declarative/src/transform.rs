//! Tree-to-document transformer
//!
//! Walks a configuration tree (`serde_json::Value`) and builds the typed
//! request document. Scalars and null pass through, lists are transformed
//! element-wise with the same lexical context, and every mapping becomes an
//! instance of the type the [`TypeRegistry`] resolves for its path.

use crate::document::{DocValue, DocumentSchema, FieldError, FromDoc};
use crate::error::{Error, Result};
use crate::path::FieldPath;
use crate::registry::TypeRegistry;
use serde_json::{Map, Number, Value};
use std::marker::PhantomData;

/// Converts configuration trees into documents of schema `S`
pub struct Transformer<'a, S> {
    registry: &'a TypeRegistry,
    _schema: PhantomData<fn() -> S>,
}

impl<'a, S: DocumentSchema> Transformer<'a, S> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            _schema: PhantomData,
        }
    }

    /// Transform one node of the tree
    ///
    /// `field_name` is the key this node is stored under and `current_path`
    /// the path of the mapping holding it (`None` for the root call).
    pub fn transform(
        &self,
        node: &Value,
        field_name: &str,
        current_path: Option<&FieldPath>,
    ) -> Result<DocValue<S>> {
        match node {
            Value::Null => Ok(DocValue::Null),
            Value::Bool(b) => Ok(DocValue::Bool(*b)),
            Value::Number(n) => Ok(number(n)),
            Value::String(s) => Ok(DocValue::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| self.transform(item, field_name, current_path))
                .collect::<Result<Vec<_>>>()
                .map(DocValue::List),
            Value::Object(map) => self.transform_object(map, field_name, current_path),
        }
    }

    fn transform_object(
        &self,
        map: &Map<String, Value>,
        field_name: &str,
        current_path: Option<&FieldPath>,
    ) -> Result<DocValue<S>> {
        let path = match current_path {
            Some(parent) => parent.child(field_name),
            None => FieldPath::root(field_name),
        };

        let type_name = self.registry.resolve(&path, field_name);
        let mut object = S::instantiate(&type_name).ok_or_else(|| Error::UnknownType {
            path: path.clone(),
            type_name: type_name.to_string(),
        })?;
        log::trace!("{path} -> {type_name}");

        let object_type = object.type_name();
        for (key, value) in map {
            let converted = self.transform(value, key, Some(&path))?;
            object
                .set_field(key, converted)
                .map_err(|err| match err {
                    FieldError::Unknown => Error::UnknownField {
                        path: path.clone(),
                        type_name: object_type,
                        field: key.clone(),
                    },
                    FieldError::Mismatch { expected } => Error::FieldType {
                        path: path.child(key.as_str()),
                        expected,
                    },
                })?;
        }

        Ok(DocValue::Object(object))
    }

    /// Transform a whole tree rooted at `root_field` into its document type
    pub fn build<T: FromDoc<S>>(&self, tree: &Value, root_field: &str) -> Result<T> {
        let value = self.transform(tree, root_field, None)?;
        T::from_doc(value).ok_or_else(|| Error::FieldType {
            path: FieldPath::root(root_field),
            expected: T::expected(),
        })
    }
}

fn number<S>(n: &Number) -> DocValue<S> {
    if let Some(i) = n.as_i64() {
        DocValue::Int(i)
    } else {
        // u64 beyond i64::MAX and true floats both land here
        DocValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Compute, Node, OsDisk, Tag, TestSchema, test_registry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn build(tree: &Value) -> Result<Node> {
        let registry = test_registry();
        Transformer::<TestSchema>::new(&registry).build(tree, "node")
    }

    #[test]
    fn test_scalars_pass_through() {
        let registry = test_registry();
        let transformer = Transformer::<TestSchema>::new(&registry);

        assert_eq!(transformer.transform(&json!(null), "x", None).unwrap(), DocValue::Null);
        assert_eq!(transformer.transform(&json!(true), "x", None).unwrap(), DocValue::Bool(true));
        assert_eq!(transformer.transform(&json!(7), "x", None).unwrap(), DocValue::Int(7));
        assert_eq!(transformer.transform(&json!(1.5), "x", None).unwrap(), DocValue::Float(1.5));
        assert_eq!(
            transformer.transform(&json!("s"), "x", None).unwrap(),
            DocValue::String("s".into())
        );
    }

    #[test]
    fn test_builds_nested_document() {
        let tree = json!({
            "name": "n1",
            "region": "eastus",
            "resource_group_name": "rg1",
            "compute": {
                "os": "Linux",
                "zones": ["1", "2"],
                "os_disk": {"size_g_b": 30, "type": "Standard_LRS"},
                "tags": [
                    {"tag_key": "env", "tag_value": "prod"},
                    {"tag_key": "team", "tag_value": "infra"}
                ]
            }
        });

        let node = build(&tree).unwrap();

        assert_eq!(
            node,
            Node {
                name: Some("n1".into()),
                region: Some("eastus".into()),
                resource_group_name: Some("rg1".into()),
                compute: Some(Compute {
                    os: Some("Linux".into()),
                    zones: Some(vec!["1".into(), "2".into()]),
                    os_disk: Some(OsDisk {
                        size_g_b: Some(30),
                        r#type: Some("Standard_LRS".into()),
                    }),
                    tags: Some(vec![
                        Tag {
                            tag_key: Some("env".into()),
                            tag_value: Some("prod".into()),
                        },
                        Tag {
                            tag_key: Some("team".into()),
                            tag_value: Some("infra".into()),
                        },
                    ]),
                }),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_structure_preserved_in_wire_form() {
        let tree = json!({
            "name": "n1",
            "compute": {
                "zones": [],
                "tags": [{"tag_key": "a"}],
                "os_disk": {"size_g_b": 1}
            }
        });

        let node = build(&tree).unwrap();
        let wire = serde_json::to_value(&node).unwrap();

        assert_eq!(
            wire,
            json!({
                "name": "n1",
                "compute": {
                    "zones": [],
                    "tags": [{"tagKey": "a"}],
                    "osDisk": {"sizeGB": 1}
                }
            })
        );
    }

    #[test]
    fn test_null_stays_unset() {
        let node = build(&json!({"name": "n1", "description": null})).unwrap();
        assert_eq!(node.description, None);
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"name": "n1"}));
    }

    #[test]
    fn test_list_members_use_collection_path() {
        // `tags` resolves through the registry; the default rule would give `Tags`
        let registry = TypeRegistry::new();
        let err = Transformer::<TestSchema>::new(&registry)
            .build::<Node>(&json!({"compute": {"tags": [{"tag_key": "a"}]}}), "node")
            .unwrap_err();

        match err {
            Error::UnknownType { path, type_name } => {
                assert_eq!(path.to_string(), "node.compute.tags");
                assert_eq!(type_name, "Tags");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_substituted_registry_changes_types() {
        let registry = test_registry().with_object_type(
            FieldPath::parse("node.compute.os_disk").unwrap(),
            "Tag",
        );
        let err = Transformer::<TestSchema>::new(&registry)
            .build::<Node>(&json!({"compute": {"os_disk": {"size_g_b": 1}}}), "node")
            .unwrap_err();

        assert!(
            matches!(err, Error::UnknownField { type_name: "Tag", ref field, .. } if field == "size_g_b")
        );
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let err = build(&json!({"name": "n1", "compute": {"gpu": true}})).unwrap_err();
        match err {
            Error::UnknownField {
                path,
                type_name,
                field,
            } => {
                assert_eq!(path.to_string(), "node.compute");
                assert_eq!(type_name, "Compute");
                assert_eq!(field, "gpu");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch_is_fatal() {
        let err = build(&json!({"compute": {"os_disk": {"size_g_b": "big"}}})).unwrap_err();
        match err {
            Error::FieldType { path, expected } => {
                assert_eq!(path.to_string(), "node.compute.os_disk.size_g_b");
                assert_eq!(expected, "an integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mapping_where_scalar_expected() {
        let err = build(&json!({"name": {"first": "n"}})).unwrap_err();
        assert!(matches!(err, Error::UnknownType { ref type_name, .. } if type_name == "Name"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = build(&json!("n1")).unwrap_err();
        assert!(matches!(err, Error::FieldType { ref path, .. } if path.to_string() == "node"));
    }
}

//! Path-keyed type registry
//!
//! Most object nodes get their document type from their own field name
//! (`os_disk` → `OsDisk`). That breaks down for collections (`data_disks`
//! holds `DataDisk` members) and for names reused at several depths, so the
//! registry maps exact paths to type names. Two tables are kept: one for
//! object-valued fields and one for fields whose collection members need
//! disambiguation. The object table wins when both hold a path.

use crate::error::Result;
use crate::path::FieldPath;
use std::borrow::Cow;
use std::collections::HashMap;

/// Exact-match `FieldPath → type name` overrides
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    object_types: HashMap<FieldPath, String>,
    member_types: HashMap<FieldPath, String>,
}

impl TypeRegistry {
    /// Create an empty registry (naming convention only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from dotted-path tables
    pub fn from_tables(objects: &[(&str, &str)], members: &[(&str, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (path, type_name) in objects {
            registry
                .object_types
                .insert(FieldPath::parse(path)?, (*type_name).to_string());
        }
        for (path, type_name) in members {
            registry
                .member_types
                .insert(FieldPath::parse(path)?, (*type_name).to_string());
        }
        Ok(registry)
    }

    /// Add an object-field override
    pub fn with_object_type(mut self, path: FieldPath, type_name: impl Into<String>) -> Self {
        self.object_types.insert(path, type_name.into());
        self
    }

    /// Add a collection-member override
    pub fn with_member_type(mut self, path: FieldPath, type_name: impl Into<String>) -> Self {
        self.member_types.insert(path, type_name.into());
        self
    }

    /// Merge another registry's entries into this one
    pub fn extend(&mut self, other: TypeRegistry) {
        self.object_types.extend(other.object_types);
        self.member_types.extend(other.member_types);
    }

    /// Override for this exact path, if any
    pub fn lookup(&self, path: &FieldPath) -> Option<&str> {
        self.object_types
            .get(path)
            .or_else(|| self.member_types.get(path))
            .map(String::as_str)
    }

    /// Type name for an object node: override first, then naming convention
    pub fn resolve<'a>(&'a self, path: &FieldPath, field_name: &str) -> Cow<'a, str> {
        match self.lookup(path) {
            Some(type_name) => Cow::Borrowed(type_name),
            None => Cow::Owned(pascal_case(field_name)),
        }
    }

    /// All type names named by overrides
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.object_types
            .values()
            .chain(self.member_types.values())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.object_types.len() + self.member_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_types.is_empty() && self.member_types.is_empty()
    }
}

/// Convert a snake_case field name to its PascalCase type name
///
/// Every `_`-separated word gets an upper-case first character and a
/// lower-case remainder, so `size_g_b` becomes `SizeGB`.
pub fn pascal_case(field_name: &str) -> String {
    field_name
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

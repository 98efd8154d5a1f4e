//! Identity resolution
//!
//! Decides which single operation an invocation performs and which id it
//! targets, from the requested presence, the uniqueness strategy, an
//! optional explicit id and (for name uniqueness) a snapshot of existing
//! resources.
//!
//! | state   | by   | explicit id | name matches | result          |
//! |---------|------|-------------|--------------|-----------------|
//! | present | id   | no          |              | create          |
//! | present | id   | yes         |              | update(id)      |
//! | present | name |             | 0            | create          |
//! | present | name |             | 1            | update(match)   |
//! | absent  | id   | yes         |              | delete(id)      |
//! | absent  | id   | no          |              | error           |
//! | absent  | name |             | 1            | delete(match)   |
//! | absent  | name |             | 0            | error           |
//! | *       | name |             | >1           | error           |

use crate::error::{Error, RemoteError, Result};
use crate::types::{Operation, Presence, RemoteRecord, Resolution, UniquenessBy};
use serde_json::Value;

/// Resolve the operation and target id
///
/// `lookup` is called at most once, and only for name uniqueness.
pub fn resolve<F>(
    desired_state: &Value,
    explicit_id: Option<&str>,
    uniqueness_by: UniquenessBy,
    state: Presence,
    lookup: F,
) -> Result<Resolution>
where
    F: FnOnce() -> std::result::Result<Vec<RemoteRecord>, RemoteError>,
{
    let resolution = match uniqueness_by {
        UniquenessBy::Id => by_id(explicit_id, state)?,
        UniquenessBy::Name => {
            if explicit_id.is_some() {
                log::debug!("uniqueness is by name, ignoring explicit id");
            }
            let name = desired_state
                .get("name")
                .and_then(Value::as_str)
                .ok_or(Error::MissingName)?;
            let records = lookup().map_err(Error::Lookup)?;
            by_name(name, &records, state)?
        }
    };

    match &resolution.id {
        Some(id) => log::info!("resolved {} for '{id}'", resolution.operation),
        None => log::info!("resolved {}", resolution.operation),
    }
    Ok(resolution)
}

fn by_id(explicit_id: Option<&str>, state: Presence) -> Result<Resolution> {
    match (state, explicit_id) {
        (Presence::Present, None) => Ok(Resolution::create()),
        (Presence::Present, Some(id)) => Ok(Resolution::update(id)),
        (Presence::Absent, Some(id)) => Ok(Resolution::delete(id)),
        (Presence::Absent, None) => Err(Error::MissingId {
            operation: Operation::Delete,
        }),
    }
}

fn by_name(name: &str, records: &[RemoteRecord], state: Presence) -> Result<Resolution> {
    let matches: Vec<&RemoteRecord> = records.iter().filter(|r| r.name == name).collect();
    log::debug!(
        "{} of {} existing resources named '{name}'",
        matches.len(),
        records.len()
    );

    let operation = match state {
        Presence::Present => Operation::Update,
        Presence::Absent => Operation::Delete,
    };

    match (state, matches.as_slice()) {
        (Presence::Present, []) => Ok(Resolution::create()),
        (Presence::Present, [found]) => Ok(Resolution::update(found.id.as_str())),
        (Presence::Absent, [found]) => Ok(Resolution::delete(found.id.as_str())),
        (Presence::Absent, []) => Err(Error::NameNotFound {
            operation,
            name: name.to_string(),
        }),
        (_, many) => Err(Error::AmbiguousName {
            operation,
            name: name.to_string(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn desired() -> Value {
        json!({"name": "n1", "region": "eastus", "resource_group_name": "rg1"})
    }

    fn records(names: &[(&str, &str)]) -> Vec<RemoteRecord> {
        names
            .iter()
            .map(|(id, name)| RemoteRecord::new(*id, *name))
            .collect()
    }

    fn by_name_with(
        state: Presence,
        snapshot: Vec<RemoteRecord>,
    ) -> Result<Resolution> {
        resolve(&desired(), None, UniquenessBy::Name, state, move || {
            Ok(snapshot)
        })
    }

    fn no_lookup() -> std::result::Result<Vec<RemoteRecord>, RemoteError> {
        panic!("lookup must not run for id uniqueness")
    }

    #[test]
    fn test_present_by_id() {
        let r = resolve(&desired(), None, UniquenessBy::Id, Presence::Present, no_lookup).unwrap();
        assert_eq!(r, Resolution::create());

        let r = resolve(&desired(), Some("abc123"), UniquenessBy::Id, Presence::Present, no_lookup)
            .unwrap();
        assert_eq!(r, Resolution::update("abc123"));
    }

    #[test]
    fn test_absent_by_id() {
        let r = resolve(&desired(), Some("x"), UniquenessBy::Id, Presence::Absent, no_lookup).unwrap();
        assert_eq!(r, Resolution::delete("x"));

        let err = resolve(&desired(), None, UniquenessBy::Id, Presence::Absent, no_lookup).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingId {
                operation: Operation::Delete
            }
        ));
    }

    #[test]
    fn test_present_by_name() {
        let r = by_name_with(Presence::Present, records(&[("ssn-9", "other")])).unwrap();
        assert_eq!(r, Resolution::create());

        let r = by_name_with(Presence::Present, records(&[("ssn-1", "n1"), ("ssn-9", "other")]))
            .unwrap();
        assert_eq!(r, Resolution::update("ssn-1"));

        let err = by_name_with(Presence::Present, records(&[("ssn-1", "n1"), ("ssn-2", "n1")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot update: uniqueness is by name but 2 resources are named 'n1'"
        );
    }

    #[test]
    fn test_absent_by_name() {
        let r = by_name_with(Presence::Absent, records(&[("ssn-1", "n1")])).unwrap();
        assert_eq!(r, Resolution::delete("ssn-1"));

        let err = by_name_with(Presence::Absent, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::NameNotFound { ref name, .. } if name == "n1"));

        let err = by_name_with(
            Presence::Absent,
            records(&[("a", "n1"), ("b", "n1"), ("c", "n1")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousName {
                operation: Operation::Delete,
                count: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_name_match_is_exact_and_case_sensitive() {
        let r = by_name_with(
            Presence::Present,
            records(&[("a", "N1"), ("b", "n1 "), ("c", "n10")]),
        )
        .unwrap();
        assert_eq!(r, Resolution::create());
    }

    #[test]
    fn test_explicit_id_ignored_for_name_uniqueness() {
        let r = resolve(
            &desired(),
            Some("abc123"),
            UniquenessBy::Name,
            Presence::Present,
            || Ok(records(&[("ssn-1", "n1")])),
        )
        .unwrap();
        assert_eq!(r, Resolution::update("ssn-1"));
    }

    #[test]
    fn test_lookup_called_once() {
        let calls = Cell::new(0);
        let _ = resolve(&desired(), None, UniquenessBy::Name, Presence::Present, || {
            calls.set(calls.get() + 1);
            Ok(Vec::new())
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_missing_name() {
        let err = resolve(
            &json!({"region": "eastus"}),
            None,
            UniquenessBy::Name,
            Presence::Present,
            no_lookup,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingName));
    }

    #[test]
    fn test_lookup_failure() {
        let err = resolve(&desired(), None, UniquenessBy::Name, Presence::Present, || {
            Err(RemoteError::service("unauthorized"))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
        assert_eq!(err.to_string(), "failed to list existing resources: unauthorized");
    }
}

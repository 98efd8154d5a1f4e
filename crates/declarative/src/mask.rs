//! Field-exclusion mask
//!
//! Prunes dotted paths out of a copy of the desired state before an update.
//! Paths are applied longest-first: a deeper exclusion runs while its parent
//! still exists, and a shallower one applied later simply removes the whole
//! subtree. Paths whose parent is missing are no-ops.

use crate::path::FieldPath;
use serde_json::Value;

/// Return a copy of `tree` with every path in `exclusions` removed
///
/// Paths are relative to `tree`. The caller's tree is never modified.
pub fn apply_exclusions(tree: &Value, exclusions: &[FieldPath]) -> Value {
    let mut pruned = tree.clone();

    let mut ordered: Vec<&FieldPath> = exclusions.iter().collect();
    ordered.sort_by(|a, b| b.depth().cmp(&a.depth()));

    for path in ordered {
        remove_path(&mut pruned, path);
    }

    pruned
}

fn remove_path(tree: &mut Value, path: &FieldPath) {
    let mut node = tree;
    for segment in path.parent_segments() {
        match node.get_mut(segment.as_str()) {
            Some(child) => node = child,
            None => {
                log::debug!("exclusion '{path}' skipped: '{segment}' not present");
                return;
            }
        }
    }

    let Some(map) = node.as_object_mut() else {
        log::debug!("exclusion '{path}' skipped: parent is not a mapping");
        return;
    };

    if map.remove(path.last()).is_none() {
        log::debug!("exclusion '{path}' skipped: field not present");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_all;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paths(dotted: &[&str]) -> Vec<FieldPath> {
        parse_all(dotted).unwrap()
    }

    #[test]
    fn test_removes_top_level_field() {
        let tree = json!({"name": "n1", "region": "eastus", "resource_group_name": "rg1"});
        let pruned = apply_exclusions(&tree, &paths(&["resource_group_name"]));
        assert_eq!(pruned, json!({"name": "n1", "region": "eastus"}));
    }

    #[test]
    fn test_removes_nested_field_keeps_siblings() {
        let tree = json!({
            "compute": {
                "os": "Linux",
                "launch_specification": {"vm_name": "vm", "tags": [{"tag_key": "a"}]}
            }
        });
        let pruned = apply_exclusions(&tree, &paths(&["compute.launch_specification.vm_name"]));
        assert_eq!(
            pruned,
            json!({
                "compute": {
                    "os": "Linux",
                    "launch_specification": {"tags": [{"tag_key": "a"}]}
                }
            })
        );
    }

    #[test]
    fn test_parent_and_child_excluded_together() {
        let tree = json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}});

        // Order in the list does not matter
        for list in [["a.b", "a.b.c"], ["a.b.c", "a.b"]] {
            let pruned = apply_exclusions(&tree, &paths(&list));
            assert_eq!(pruned, json!({"a": {"e": 3}}));
        }
    }

    #[test]
    fn test_missing_parent_is_noop() {
        let tree = json!({"name": "n1"});
        let pruned = apply_exclusions(&tree, &paths(&["compute.os", "health.grace_period"]));
        assert_eq!(pruned, tree);
    }

    #[test]
    fn test_missing_leaf_is_noop() {
        let tree = json!({"compute": {"os": "Linux"}});
        let pruned = apply_exclusions(&tree, &paths(&["compute.zones"]));
        assert_eq!(pruned, tree);
    }

    #[test]
    fn test_non_mapping_parent_is_noop() {
        let tree = json!({"compute": {"zones": ["1", "2"]}, "name": "n1"});
        let pruned = apply_exclusions(&tree, &paths(&["compute.zones.first", "name.x"]));
        assert_eq!(pruned, tree);
    }

    #[test]
    fn test_idempotent() {
        let tree = json!({"a": {"b": {"c": 1}}, "x": {"y": 2, "z": 3}});
        let exclusions = paths(&["a.b.c", "x.y", "missing.path"]);

        let once = apply_exclusions(&tree, &exclusions);
        let twice = apply_exclusions(&once, &exclusions);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_original_untouched() {
        let tree = json!({"name": "n1", "region": "eastus"});
        let _ = apply_exclusions(&tree, &paths(&["name"]));
        assert_eq!(tree, json!({"name": "n1", "region": "eastus"}));
    }

    #[test]
    fn test_empty_exclusion_list() {
        let tree = json!({"name": "n1"});
        assert_eq!(apply_exclusions(&tree, &[]), tree);
    }
}

//! Entity registry — enumerates addressable entities and assigns stable ids.
//!
//! Ids are slash-joined ancestry paths ("Root/Arm/Hand"), so identical
//! snapshots always produce identical ids. Duplicate sibling names get an
//! occurrence suffix ("Enemy", "Enemy#2") to keep ids unique.

use std::collections::HashMap;

use crate::error::{GraphError, Result};
use crate::snapshot::{SceneEntity, Snapshot};

/// What part of the snapshot an operation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every entity under every scene root.
    WholeSnapshot,
    /// One entity, optionally with its descendants.
    SingleEntity {
        id: String,
        include_descendants: bool,
    },
}

/// One enumerable entity, with its resolved id and position in the tree.
#[derive(Debug, Clone)]
pub struct EntityDescriptor<'a> {
    pub id: String,
    pub display_name: String,
    pub parent: Option<String>,
    pub is_root: bool,
    pub entity: &'a SceneEntity,
}

/// Enumerate the entities visible in `scope`, in deterministic depth-first
/// order. Fails with `InvalidScope` if a `SingleEntity` scope names an id
/// that does not exist in the snapshot.
pub fn enumerate<'a>(snapshot: &'a Snapshot, scope: &Scope) -> Result<Vec<EntityDescriptor<'a>>> {
    let all = walk_snapshot(snapshot);

    match scope {
        Scope::WholeSnapshot => Ok(all),
        Scope::SingleEntity {
            id,
            include_descendants,
        } => {
            if !all.iter().any(|d| &d.id == id) {
                return Err(GraphError::InvalidScope(format!(
                    "no entity with id '{}' in snapshot",
                    id
                )));
            }
            let prefix = format!("{}/", id);
            Ok(all
                .into_iter()
                .filter(|d| {
                    &d.id == id || (*include_descendants && d.id.starts_with(&prefix))
                })
                .collect())
        }
    }
}

fn walk_snapshot(snapshot: &Snapshot) -> Vec<EntityDescriptor<'_>> {
    let mut out = Vec::new();
    let mut seen_roots: HashMap<&str, usize> = HashMap::new();
    for root in &snapshot.roots {
        let id = disambiguate(&mut seen_roots, &root.name);
        walk_entity(root, id, None, true, &mut out);
    }
    out
}

fn walk_entity<'a>(
    entity: &'a SceneEntity,
    id: String,
    parent: Option<String>,
    is_root: bool,
    out: &mut Vec<EntityDescriptor<'a>>,
) {
    out.push(EntityDescriptor {
        id: id.clone(),
        display_name: entity.name.clone(),
        parent,
        is_root,
        entity,
    });

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for child in &entity.children {
        let segment = disambiguate(&mut seen, &child.name);
        let child_id = format!("{}/{}", id, segment);
        walk_entity(child, child_id, Some(id.clone()), false, out);
    }
}

/// First occurrence keeps the bare name; repeats get "#2", "#3", ...
fn disambiguate<'a>(seen: &mut HashMap<&'a str, usize>, name: &'a str) -> String {
    let count = seen.entry(name).or_insert(0);
    *count += 1;
    if *count == 1 {
        name.to_string()
    } else {
        format!("{}#{}", name, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot::new(vec![SceneEntity::new("Root")
            .with_child(SceneEntity::new("Arm").with_child(SceneEntity::new("Hand")))
            .with_child(SceneEntity::new("Leg"))])
    }

    #[test]
    fn whole_snapshot_ids_are_ancestry_paths() {
        let snapshot = sample();
        let descriptors = enumerate(&snapshot, &Scope::WholeSnapshot).unwrap();
        let ids: Vec<&str> = descriptors.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["Root", "Root/Arm", "Root/Arm/Hand", "Root/Leg"]);
        assert!(descriptors[0].is_root);
        assert_eq!(descriptors[2].parent.as_deref(), Some("Root/Arm"));
    }

    #[test]
    fn duplicate_sibling_names_get_distinct_ids() {
        let snapshot = Snapshot::new(vec![SceneEntity::new("Root")
            .with_child(SceneEntity::new("Enemy"))
            .with_child(SceneEntity::new("Enemy"))
            .with_child(SceneEntity::new("Enemy"))]);

        let descriptors = enumerate(&snapshot, &Scope::WholeSnapshot).unwrap();
        let ids: Vec<&str> = descriptors.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["Root", "Root/Enemy", "Root/Enemy#2", "Root/Enemy#3"]
        );
        // Display names stay as authored
        assert!(descriptors[1..].iter().all(|d| d.display_name == "Enemy"));
    }

    #[test]
    fn single_entity_scope_with_descendants() {
        let snapshot = sample();
        let scope = Scope::SingleEntity {
            id: "Root/Arm".to_string(),
            include_descendants: true,
        };
        let descriptors = enumerate(&snapshot, &scope).unwrap();
        let ids: Vec<&str> = descriptors.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["Root/Arm", "Root/Arm/Hand"]);
    }

    #[test]
    fn single_entity_scope_without_descendants() {
        let snapshot = sample();
        let scope = Scope::SingleEntity {
            id: "Root/Arm".to_string(),
            include_descendants: false,
        };
        let descriptors = enumerate(&snapshot, &scope).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].id, "Root/Arm");
    }

    #[test]
    fn unknown_scope_id_is_invalid_scope() {
        let snapshot = sample();
        let scope = Scope::SingleEntity {
            id: "Root/Missing".to_string(),
            include_descendants: false,
        };
        let err = enumerate(&snapshot, &scope).unwrap_err();
        assert!(matches!(err, GraphError::InvalidScope(_)));
    }

    #[test]
    fn enumeration_is_deterministic() {
        let snapshot = sample();
        let a = enumerate(&snapshot, &Scope::WholeSnapshot).unwrap();
        let b = enumerate(&snapshot, &Scope::WholeSnapshot).unwrap();
        let ids_a: Vec<_> = a.iter().map(|d| &d.id).collect();
        let ids_b: Vec<_> = b.iter().map(|d| &d.id).collect();
        assert_eq!(ids_a, ids_b);
    }
}

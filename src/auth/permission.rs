//! Permission tree construction.
//!
//! Turns the flat, `(sort, id)`-ordered list of enabled permission records
//! into an ordered forest of menu nodes.
//!
//! The build is index based and iterative: nodes live in an arena addressed
//! by position, children are linked by index, and the forest is materialised
//! with an explicit stack. Only nodes reachable from a root (`parent_id == 0`)
//! are emitted, so a record whose parent is missing is dropped at every depth,
//! and a parent chain that loops back on itself never reaches a root and is
//! dropped too. Termination does not depend on input order.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::{PermissionKind, PermissionRecord};

/// A rendered node of the menu forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    /// Permission id.
    pub id: i64,
    /// Parent id, 0 for roots.
    pub parent_id: i64,
    /// Display name.
    pub name: String,
    /// Menu or operation.
    pub kind: PermissionKind,
    /// Frontend route.
    pub path: String,
    /// Backend route.
    pub backend_url: String,
    /// Icon name.
    pub icon: String,
    /// Sort key.
    pub sort: i64,
    /// Expanded by default; true for menus.
    pub open: bool,
    /// Selection hint for tree widgets; always false here.
    pub checked: bool,
    /// Child nodes in input order.
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    fn leaf(record: &PermissionRecord) -> Self {
        Self {
            id: record.id,
            parent_id: record.parent_id,
            name: record.name.clone(),
            kind: record.kind,
            path: record.frontend_url.clone(),
            backend_url: record.backend_url.clone(),
            icon: record.icon.clone(),
            sort: record.sort,
            open: record.kind == PermissionKind::Menu,
            checked: false,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

/// Build the menu forest from records already ordered by `(sort, id)`.
///
/// Roots keep input order, as do the children of each node. Records with a
/// missing parent are omitted along with their descendants. When an id occurs
/// twice, the first occurrence wins.
pub fn build_menu_tree(records: &[PermissionRecord]) -> Vec<MenuNode> {
    // Pass 1: id -> arena position.
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        index.entry(record.id).or_insert(pos);
    }

    // Pass 2: link each record under its parent, or into the root list.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (pos, record) in records.iter().enumerate() {
        if index.get(&record.id) != Some(&pos) {
            continue;
        }
        if record.parent_id == 0 {
            roots.push(pos);
        } else if let Some(&parent) = index.get(&record.parent_id) {
            children[parent].push(pos);
        }
    }

    // Materialise bottom-up: a node is built once all of its children are.
    let mut built: Vec<Option<MenuNode>> = vec![None; records.len()];
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&pos| (pos, false)).collect();
    while let Some((pos, expanded)) = stack.pop() {
        if expanded {
            let mut node = MenuNode::leaf(&records[pos]);
            node.children = children[pos]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[pos] = Some(node);
        } else {
            stack.push((pos, true));
            for &child in children[pos].iter().rev() {
                stack.push((child, false));
            }
        }
    }

    roots.into_iter().filter_map(|pos| built[pos].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RecordStatus;

    fn record(id: i64, parent_id: i64, name: &str) -> PermissionRecord {
        PermissionRecord {
            id,
            parent_id,
            name: name.to_string(),
            kind: PermissionKind::Menu,
            backend_url: String::new(),
            frontend_url: format!("/{}", name.to_lowercase()),
            icon: String::new(),
            sort: 0,
            status: RecordStatus::Enabled,
        }
    }

    fn names(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_orphan_is_dropped() {
        let records = vec![record(1, 0, "Sys"), record(2, 1, "Admins"), record(3, 99, "Orphan")];

        let tree = build_menu_tree(&records);
        assert_eq!(names(&tree), vec!["Sys"]);
        assert_eq!(names(&tree[0].children), vec!["Admins"]);
        assert!(tree[0].children[0].children.is_empty());
        assert_eq!(tree.iter().map(MenuNode::node_count).sum::<usize>(), 2);
    }

    #[test]
    fn test_orphan_subtree_dropped_at_depth() {
        let records = vec![
            record(1, 0, "Sys"),
            record(2, 1, "Admins"),
            record(3, 50, "Lost"),
            record(4, 3, "LostChild"),
            record(5, 2, "Create"),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].node_count(), 3);
        let admins = &tree[0].children[0];
        assert_eq!(names(&admins.children), vec!["Create"]);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            record(10, 0, "First"),
            record(3, 0, "Second"),
            record(7, 10, "A"),
            record(5, 10, "B"),
            record(6, 3, "C"),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(names(&tree), vec!["First", "Second"]);
        assert_eq!(names(&tree[0].children), vec!["A", "B"]);
        assert_eq!(names(&tree[1].children), vec!["C"]);
    }

    #[test]
    fn test_child_before_parent_in_input() {
        let records = vec![record(2, 1, "Child"), record(1, 0, "Parent")];

        let tree = build_menu_tree(&records);
        assert_eq!(names(&tree), vec!["Parent"]);
        assert_eq!(names(&tree[0].children), vec!["Child"]);
    }

    #[test]
    fn test_cycle_never_reached() {
        let records = vec![record(1, 0, "Root"), record(2, 3, "Loop A"), record(3, 2, "Loop B")];

        let tree = build_menu_tree(&records);
        assert_eq!(names(&tree), vec!["Root"]);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_self_parent_dropped() {
        let records = vec![record(1, 0, "Root"), record(2, 2, "Selfie")];
        let tree = build_menu_tree(&records);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].node_count(), 1);
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let records = vec![record(1, 0, "Root"), record(2, 1, "Kept"), record(2, 1, "Shadow")];
        let tree = build_menu_tree(&records);
        assert_eq!(names(&tree[0].children), vec!["Kept"]);
    }

    #[test]
    fn test_rendered_fields() {
        let mut op = record(2, 1, "Delete");
        op.kind = PermissionKind::Operation;
        op.backend_url = "/api/admin/admins/:id".to_string();
        let records = vec![record(1, 0, "Sys"), op];

        let tree = build_menu_tree(&records);
        let root = &tree[0];
        assert!(root.open);
        assert!(!root.checked);
        assert_eq!(root.path, "/sys");

        let leaf = &root.children[0];
        assert!(!leaf.open);
        assert_eq!(leaf.kind, PermissionKind::Operation);
        assert_eq!(leaf.backend_url, "/api/admin/admins/:id");
        assert_eq!(leaf.parent_id, 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = vec![
            record(1, 0, "Sys"),
            record(2, 1, "Admins"),
            record(3, 1, "Logs"),
            record(4, 2, "Create"),
            record(5, 0, "Content"),
        ];
        assert_eq!(build_menu_tree(&records), build_menu_tree(&records));
    }

    #[test]
    fn test_empty_input() {
        assert!(build_menu_tree(&[]).is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut records = vec![record(1, 0, "Root")];
        for id in 2..=1000 {
            records.push(record(id, id - 1, "Level"));
        }

        let tree = build_menu_tree(&records);
        assert_eq!(tree.len(), 1);
        let mut depth = 1;
        let mut node = &tree[0];
        while let Some(child) = node.children.first() {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, 1000);
    }
}

//! Navigation of the group tree: path resolution and child iteration.
//!
//! A KeePass group keeps its subgroups and entries in one ordered child list.
//! The helpers here project that list into groups or entries while keeping
//! the stored order, and address groups by [`GroupLocator`] (child indices
//! from the root) rather than by long-lived references.

use crate::models::PATH_SEPARATOR;
use keepass::db::{Entry, Group, Node};

/// Child-index path from the root group to a descendant group.
///
/// The empty locator addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupLocator(Vec<usize>);

impl GroupLocator {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// Split a group path into its non-empty segments.
///
/// `"temp//General"` and `"temp/General/"` both yield `["temp", "General"]`.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Direct subgroups of `group`, in stored order.
pub fn subgroups(group: &Group) -> impl Iterator<Item = &Group> {
    group.children.iter().filter_map(|node| match node {
        Node::Group(g) => Some(g),
        Node::Entry(_) => None,
    })
}

/// Entries stored directly in `group`, in stored order.
pub fn entries(group: &Group) -> impl Iterator<Item = &Entry> {
    group.children.iter().filter_map(|node| match node {
        Node::Entry(e) => Some(e),
        Node::Group(_) => None,
    })
}

/// Index into `group.children` of the first subgroup named exactly `name`.
fn subgroup_index(group: &Group, name: &str) -> Option<usize> {
    group
        .children
        .iter()
        .position(|node| matches!(node, Node::Group(g) if g.name == name))
}

fn child_group_mut(group: &mut Group, index: usize) -> &mut Group {
    match &mut group.children[index] {
        Node::Group(child) => child,
        Node::Entry(_) => unreachable!("child {index} was selected as a group"),
    }
}

fn walk_or_create<'g>(root: &'g mut Group, path: &str, trail: &mut Vec<usize>) -> &'g mut Group {
    let mut current = root;

    for segment in split_path(path) {
        let index = subgroup_index(current, segment).unwrap_or_else(|| {
            tracing::debug!("Creating group '{}' under '{}'", segment, current.name);
            current.children.push(Node::Group(Group::new(segment)));
            current.children.len() - 1
        });
        trail.push(index);
        current = child_group_mut(current, index);
    }

    current
}

/// Find the group at `path` below `root`, creating any missing groups.
///
/// Each segment matches the first direct subgroup with exactly that name
/// (case-sensitive). Missing groups are appended after the existing children.
/// An empty path resolves to `root`.
pub fn resolve_or_create<'g>(root: &'g mut Group, path: &str) -> &'g mut Group {
    walk_or_create(root, path, &mut Vec::new())
}

/// Like [`resolve_or_create`], but returns a locator for the group.
pub fn locate_or_create(root: &mut Group, path: &str) -> GroupLocator {
    let mut trail = Vec::new();
    walk_or_create(root, path, &mut trail);
    GroupLocator(trail)
}

/// Locate the group at `path` without modifying the tree.
pub fn locate(root: &Group, path: &str) -> Option<GroupLocator> {
    let mut current = root;
    let mut trail = Vec::new();

    for segment in split_path(path) {
        let index = subgroup_index(current, segment)?;
        trail.push(index);
        current = match &current.children[index] {
            Node::Group(child) => child,
            Node::Entry(_) => return None,
        };
    }

    Some(GroupLocator(trail))
}

pub fn group_at<'g>(root: &'g Group, locator: &GroupLocator) -> Option<&'g Group> {
    locator
        .0
        .iter()
        .try_fold(root, |group, &index| match group.children.get(index) {
            Some(Node::Group(child)) => Some(child),
            _ => None,
        })
}

pub fn group_at_mut<'g>(root: &'g mut Group, locator: &GroupLocator) -> Option<&'g mut Group> {
    locator
        .0
        .iter()
        .try_fold(root, |group, &index| match group.children.get_mut(index) {
            Some(Node::Group(child)) => Some(child),
            _ => None,
        })
}

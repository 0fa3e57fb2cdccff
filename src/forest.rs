//! Assembles the flat member table into nested [`TreeNode`]s.
//!
//! Members are kept in one slice (the arena) and child lists are derived from
//! `parent_id` through an index of slice positions. Nothing here owns a parent
//! pointer, and every walk uses an explicit stack, so deep trees cannot blow
//! the call stack and corrupt cyclic data cannot loop.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::model::{FamilyTree, Id, Member, RootPolicy, TreeNode};

/// Positions of each member's children in the arena, in arena order.
struct ChildIndex {
    children: HashMap<Id<Member>, Vec<usize>>,
}

impl ChildIndex {
    fn new(members: &[Member]) -> Self {
        let mut children: HashMap<Id<Member>, Vec<usize>> = HashMap::new();
        for (pos, member) in members.iter().enumerate() {
            if let Some(parent) = member.parent_id {
                children.entry(parent).or_default().push(pos);
            }
        }
        Self { children }
    }

    fn children_of(&self, id: Id<Member>) -> &[usize] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Builds the forest for the given members.
///
/// Roots are the members matching `policy`, in input order. Members whose
/// parent does not resolve are unreachable and left out of `roots`, but
/// `total_members` always counts every input member.
#[instrument(level = "debug", skip(members), fields(members = members.len()))]
pub fn build_forest(members: &[Member], policy: RootPolicy) -> FamilyTree {
    let index = ChildIndex::new(members);
    let mut placed = vec![false; members.len()];

    let roots: Vec<TreeNode> = (0..members.len())
        .filter(|&pos| policy.is_root(&members[pos]))
        .filter_map(|pos| assemble(members, &index, pos, &mut placed))
        .collect();

    let shown: usize = roots.iter().map(TreeNode::size).sum();
    debug!(roots = roots.len(), shown, "built forest");

    FamilyTree {
        roots,
        total_members: members.len(),
    }
}

/// The node for `id` with its whole descendant subtree, or `None` if `id`
/// is not among `members`.
pub fn build_subtree(members: &[Member], id: Id<Member>) -> Option<TreeNode> {
    let pos = members.iter().position(|m| m.id == id)?;
    let index = ChildIndex::new(members);
    let mut placed = vec![false; members.len()];
    assemble(members, &index, pos, &mut placed)
}

fn assemble(
    members: &[Member],
    index: &ChildIndex,
    root: usize,
    placed: &mut [bool],
) -> Option<TreeNode> {
    if placed[root] {
        return None;
    }

    // Pre-order walk; reversed so the first child is visited first.
    let mut order = Vec::new();
    let mut stack = vec![root];
    placed[root] = true;
    while let Some(pos) = stack.pop() {
        order.push(pos);
        for &child in index.children_of(members[pos].id).iter().rev() {
            if !placed[child] {
                placed[child] = true;
                stack.push(child);
            }
        }
    }

    // In reverse pre-order every descendant is finished before its ancestor.
    let mut built: HashMap<usize, TreeNode> = HashMap::with_capacity(order.len());
    for &pos in order.iter().rev() {
        let mut node = TreeNode::leaf(&members[pos]);
        node.children = index
            .children_of(members[pos].id)
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();
        built.insert(pos, node);
    }

    built.remove(&root)
}

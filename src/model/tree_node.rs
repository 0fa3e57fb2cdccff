use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::member::{AgeGroup, Member};

/// Presentation node: a member with its children nested inside.
/// Built fresh on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: Id<Member>,
    pub name: String,
    pub generation: u32,
    pub age_group: AgeGroup,
    pub parent_id: Option<Id<Member>>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            generation: member.generation,
            age_group: member.age_group,
            parent_id: member.parent_id,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// The whole forest plus the number of stored members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTree {
    pub roots: Vec<TreeNode>,
    pub total_members: usize,
}

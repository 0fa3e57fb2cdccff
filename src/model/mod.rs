pub mod ids;
pub mod member;
pub mod tree_node;

// Re-exports for convenience
pub use ids::Id;
pub use member::{AgeGroup, Member, NewMember, RootPolicy};
pub use tree_node::{FamilyTree, TreeNode};

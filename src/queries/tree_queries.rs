use rusqlite::Connection;

use crate::db::member_repo;
use crate::error::ReunionResult;
use crate::forest;
use crate::model::{FamilyTree, Id, Member, RootPolicy, TreeNode};

/// The whole forest as it is stored right now.
pub fn get_tree(conn: &Connection, policy: RootPolicy) -> ReunionResult<FamilyTree> {
    let members = member_repo::find_all(conn)?;
    Ok(forest::build_forest(&members, policy))
}

pub fn get_member(conn: &Connection, id: Id<Member>) -> ReunionResult<Option<Member>> {
    member_repo::find_by_id(conn, id)
}

/// One member with its current subtree.
pub fn get_node(conn: &Connection, id: Id<Member>) -> ReunionResult<Option<TreeNode>> {
    let members = member_repo::find_all(conn)?;
    Ok(forest::build_subtree(&members, id))
}

pub fn total_members(conn: &Connection) -> ReunionResult<usize> {
    member_repo::count(conn)
}

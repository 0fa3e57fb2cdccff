//! Structure-changing operations on the family tree.
//!
//! Every function runs inside one transaction: either all of its writes land
//! or none do. Input shape (blank names, unknown age groups) is checked by the
//! caller; these functions only check that referenced members exist and that
//! the tree stays acyclic.

use std::collections::HashSet;

use rusqlite::Connection;
use tracing::{debug, info, instrument};

use crate::db::member_repo;
use crate::error::{ReunionError, ReunionResult};
use crate::forest;
use crate::model::{AgeGroup, Id, Member, NewMember, TreeNode};

/// Adds a member, optionally under a parent.
///
/// The generation is `explicit_generation` if given, else one more than the
/// parent's, else 0.
#[instrument(level = "debug", skip(conn))]
pub fn add_member(
    conn: &Connection,
    name: &str,
    age_group: AgeGroup,
    parent_id: Option<Id<Member>>,
    explicit_generation: Option<u32>,
) -> ReunionResult<TreeNode> {
    let tx = conn.unchecked_transaction()?;

    let parent = match parent_id {
        Some(pid) => Some(require(&tx, pid)?),
        None => None,
    };

    let mut new_member = match &parent {
        Some(p) => NewMember::child_of(name.to_string(), age_group, p)?,
        None => NewMember::root(name.to_string(), age_group),
    };
    if let Some(generation) = explicit_generation {
        new_member.generation = generation;
    }

    let saved = member_repo::insert(&tx, &new_member)?;
    let node = node_for(&tx, saved.id)?;
    tx.commit()?;

    info!(member_id = %saved.id, parent_id = ?saved.parent_id, generation = saved.generation, "added member");
    Ok(node)
}

/// Adds a founder: a parentless, generation-0 member flagged as a tree root.
#[instrument(level = "debug", skip(conn))]
pub fn add_founder(conn: &Connection, name: &str, age_group: AgeGroup) -> ReunionResult<TreeNode> {
    let tx = conn.unchecked_transaction()?;
    let saved = member_repo::insert(&tx, &NewMember::founder(name.to_string(), age_group))?;
    let node = node_for(&tx, saved.id)?;
    tx.commit()?;

    info!(member_id = %saved.id, "added founder");
    Ok(node)
}

/// Replaces name and age group. The generation only changes when
/// `explicit_generation` is given; it is never recomputed from the parent and
/// descendants are left alone.
#[instrument(level = "debug", skip(conn))]
pub fn update_member(
    conn: &Connection,
    id: Id<Member>,
    name: &str,
    age_group: AgeGroup,
    explicit_generation: Option<u32>,
) -> ReunionResult<TreeNode> {
    let tx = conn.unchecked_transaction()?;
    let mut member = require(&tx, id)?;

    member.name = name.to_string();
    member.age_group = age_group;
    if let Some(generation) = explicit_generation {
        member.generation = generation;
    }

    member_repo::update(&tx, &member)?;
    let node = node_for(&tx, id)?;
    tx.commit()?;

    info!(member_id = %id, generation = member.generation, "updated member");
    Ok(node)
}

/// Reparents a member (`None` makes it a root) and rewrites the generation of
/// the member and of its whole subtree.
#[instrument(level = "debug", skip(conn))]
pub fn move_member(
    conn: &Connection,
    id: Id<Member>,
    new_parent_id: Option<Id<Member>>,
) -> ReunionResult<TreeNode> {
    let tx = conn.unchecked_transaction()?;
    let mut member = require(&tx, id)?;

    let new_parent = match new_parent_id {
        Some(pid) => Some(require(&tx, pid)?),
        None => None,
    };

    if let Some(parent) = &new_parent {
        if is_self_or_descendant(&tx, parent, id)? {
            return Err(ReunionError::CycleDetected {
                member_id: id.to_string(),
                new_parent_id: parent.id.to_string(),
            });
        }
    }

    member.parent_id = new_parent.as_ref().map(|p| p.id);
    member.generation = match &new_parent {
        Some(p) => p.child_generation()?,
        None => 0,
    };
    if member.parent_id.is_some() {
        // Founders are parentless by definition.
        member.is_founder = false;
    }
    member_repo::update(&tx, &member)?;

    let rewritten = rewrite_descendant_generations(&tx, &member)?;
    let node = node_for(&tx, id)?;
    tx.commit()?;

    info!(
        member_id = %id,
        new_parent_id = ?member.parent_id,
        generation = member.generation,
        descendants = rewritten,
        "moved member"
    );
    Ok(node)
}

/// Deletes a member together with all of its descendants.
/// Returns how many members were removed.
#[instrument(level = "debug", skip(conn))]
pub fn delete_member(conn: &Connection, id: Id<Member>) -> ReunionResult<usize> {
    let tx = conn.unchecked_transaction()?;
    require(&tx, id)?;

    let removed = member_repo::delete_subtree(&tx, id)?;
    tx.commit()?;

    info!(member_id = %id, removed, "deleted member subtree");
    Ok(removed)
}

fn require(conn: &Connection, id: Id<Member>) -> ReunionResult<Member> {
    member_repo::find_by_id(conn, id)?.ok_or_else(|| ReunionError::member_not_found(id))
}

fn node_for(conn: &Connection, id: Id<Member>) -> ReunionResult<TreeNode> {
    let members = member_repo::find_all(conn)?;
    forest::build_subtree(&members, id).ok_or_else(|| ReunionError::member_not_found(id))
}

/// True if `candidate` is `ancestor` itself or sits somewhere below it.
fn is_self_or_descendant(
    conn: &Connection,
    candidate: &Member,
    ancestor: Id<Member>,
) -> ReunionResult<bool> {
    let mut seen = HashSet::new();
    let mut current = Some(candidate.clone());

    while let Some(member) = current {
        if member.id == ancestor {
            return Ok(true);
        }
        if !seen.insert(member.id) {
            // Already-corrupt chain; it does not lead to `ancestor`.
            return Ok(false);
        }
        current = match member.parent_id {
            Some(pid) => member_repo::find_by_id(conn, pid)?,
            None => None,
        };
    }

    Ok(false)
}

/// Depth-first over the stored subtree, setting each descendant's generation
/// to its parent's plus one. Every descendant row is written.
fn rewrite_descendant_generations(conn: &Connection, root: &Member) -> ReunionResult<usize> {
    let mut stack = vec![root.clone()];
    let mut seen = HashSet::from([root.id]);
    let mut rewritten = 0;

    while let Some(parent) = stack.pop() {
        let children = member_repo::find_children(conn, parent.id)?;
        if children.is_empty() {
            continue;
        }
        let generation = parent.child_generation()?;
        for mut child in children.into_iter().rev() {
            if !seen.insert(child.id) {
                continue;
            }
            member_repo::update_generation(conn, child.id, generation)?;
            debug!(member_id = %child.id, from = child.generation, to = generation, "rewrote generation");
            rewritten += 1;
            child.generation = generation;
            stack.push(child);
        }
    }

    Ok(rewritten)
}

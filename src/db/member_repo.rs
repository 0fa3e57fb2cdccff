use std::collections::HashSet;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use tracing::{instrument, trace};

use crate::error::{ReunionError, ReunionResult};
use crate::model::{AgeGroup, Id, Member, NewMember, RootPolicy};

const COLUMNS: &str =
    "id, name, age_group, parent_id, generation, is_founder, created_at, updated_at";

#[instrument(level = "trace", skip(conn))]
pub fn insert(conn: &Connection, member: &NewMember) -> ReunionResult<Member> {
    conn.execute(
        "INSERT INTO family_members (name, age_group, parent_id, generation, is_founder)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            member.name,
            member.age_group.as_str(),
            member.parent_id.map(|p| p.value),
            member.generation,
            member.is_founder as i32,
        ],
    )?;

    let id = Id::new(conn.last_insert_rowid());
    find_by_id(conn, id)?.ok_or_else(|| ReunionError::member_not_found(id))
}

#[instrument(level = "trace", skip(conn))]
pub fn update(conn: &Connection, member: &Member) -> ReunionResult<()> {
    let changed = conn.execute(
        "UPDATE family_members SET name = ?1, age_group = ?2, parent_id = ?3, generation = ?4,
         is_founder = ?5, updated_at = datetime('now')
         WHERE id = ?6",
        params![
            member.name,
            member.age_group.as_str(),
            member.parent_id.map(|p| p.value),
            member.generation,
            member.is_founder as i32,
            member.id.value,
        ],
    )?;
    if changed == 0 {
        return Err(ReunionError::member_not_found(member.id));
    }
    Ok(())
}

#[instrument(level = "trace", skip(conn))]
pub fn update_generation(conn: &Connection, id: Id<Member>, generation: u32) -> ReunionResult<()> {
    conn.execute(
        "UPDATE family_members SET generation = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![generation, id.value],
    )?;
    Ok(())
}

#[instrument(level = "trace", skip(conn))]
pub fn find_by_id(conn: &Connection, id: Id<Member>) -> ReunionResult<Option<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM family_members WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.value], |row| Ok(row_to_member(row)));

    match result {
        Ok(member) => Ok(Some(member?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every member in insertion order.
#[instrument(level = "trace", skip(conn))]
pub fn find_all(conn: &Connection) -> ReunionResult<Vec<Member>> {
    query_members(
        conn,
        &format!("SELECT {COLUMNS} FROM family_members ORDER BY id"),
        params![],
    )
}

#[instrument(level = "trace", skip(conn))]
pub fn find_roots(conn: &Connection, policy: RootPolicy) -> ReunionResult<Vec<Member>> {
    let predicate = match policy {
        RootPolicy::Founders => "is_founder = 1",
        RootPolicy::Parentless => "parent_id IS NULL",
    };
    query_members(
        conn,
        &format!("SELECT {COLUMNS} FROM family_members WHERE {predicate} ORDER BY id"),
        params![],
    )
}

#[instrument(level = "trace", skip(conn))]
pub fn find_children(conn: &Connection, parent_id: Id<Member>) -> ReunionResult<Vec<Member>> {
    query_members(
        conn,
        &format!("SELECT {COLUMNS} FROM family_members WHERE parent_id = ?1 ORDER BY id"),
        params![parent_id.value],
    )
}

#[instrument(level = "trace", skip(conn))]
pub fn count(conn: &Connection) -> ReunionResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM family_members", [], |row| row.get(0))?;
    Ok(n as usize)
}

/// Ids of the member and all its descendants, parents before children.
#[instrument(level = "trace", skip(conn))]
pub fn subtree_ids(conn: &Connection, root: Id<Member>) -> ReunionResult<Vec<Id<Member>>> {
    let mut stmt = conn.prepare("SELECT id FROM family_members WHERE parent_id = ?1 ORDER BY id")?;
    let mut ids = vec![root];
    let mut seen = HashSet::from([root]);
    let mut next = 0;

    while next < ids.len() {
        let current = ids[next];
        next += 1;
        let children = stmt
            .query_map(params![current.value], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for child in children {
            let child = Id::new(child);
            // Stored cycles would otherwise loop forever.
            if seen.insert(child) {
                ids.push(child);
            }
        }
    }

    Ok(ids)
}

/// Removes the member and every member whose parent chain includes it.
/// Returns the number of rows removed.
#[instrument(level = "trace", skip(conn))]
pub fn delete_subtree(conn: &Connection, root: Id<Member>) -> ReunionResult<usize> {
    let ids = subtree_ids(conn, root)?;
    let mut removed = 0;

    // Leaves first, so the foreign key cascade never has anything left to do.
    for id in ids.iter().rev() {
        removed += conn.execute("DELETE FROM family_members WHERE id = ?1", params![id.value])?;
        trace!(member_id = %id, "deleted row");
    }

    Ok(removed)
}

fn query_members(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> ReunionResult<Vec<Member>> {
    let mut stmt = conn.prepare(sql)?;

    let members = stmt
        .query_map(params, |row| Ok(row_to_member(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(members)
}

fn row_to_member(row: &rusqlite::Row) -> ReunionResult<Member> {
    let age_str: String = row.get(2).map_err(rusqlite::Error::from)?;
    let parent_id: Option<i64> = row.get(3).map_err(rusqlite::Error::from)?;
    let created_str: String = row.get(6).map_err(rusqlite::Error::from)?;
    let updated_str: String = row.get(7).map_err(rusqlite::Error::from)?;

    Ok(Member {
        id: Id::new(row.get(0).map_err(rusqlite::Error::from)?),
        name: row.get(1).map_err(rusqlite::Error::from)?,
        age_group: age_str.parse::<AgeGroup>()?,
        parent_id: parent_id.map(Id::new),
        generation: row.get(4).map_err(rusqlite::Error::from)?,
        is_founder: row.get::<_, i32>(5).map_err(rusqlite::Error::from)? != 0,
        created_at: parse_timestamp(&created_str)?,
        updated_at: parse_timestamp(&updated_str)?,
    })
}

fn parse_timestamp(s: &str) -> ReunionResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| ReunionError::Other(format!("Invalid timestamp '{}': {}", s, e)))
}

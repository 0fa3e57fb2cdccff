#![allow(dead_code)]

use std::sync::Once;

use reunion::db::{member_repo, schema};
use reunion::model::*;
use reunion::ops::member_ops;
use rusqlite::Connection;
use tracing_subscriber::{fmt, EnvFilter};

static TEST_SETUP: Once = Once::new();

pub fn init_test_logging() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn setup() -> Connection {
    init_test_logging();
    schema::test_connection()
}

pub fn founder(conn: &Connection, name: &str) -> TreeNode {
    member_ops::add_founder(conn, name, AgeGroup::Adult).unwrap()
}

pub fn child(conn: &Connection, name: &str, parent: Id<Member>) -> TreeNode {
    member_ops::add_member(conn, name, AgeGroup::Child, Some(parent), None).unwrap()
}

pub fn stored(conn: &Connection, id: Id<Member>) -> Member {
    member_repo::find_by_id(conn, id).unwrap().unwrap()
}

/// Checks the generation rule for every stored member.
pub fn assert_generations_consistent(conn: &Connection) {
    let members = member_repo::find_all(conn).unwrap();
    for m in &members {
        match m.parent_id {
            None => assert_eq!(m.generation, 0, "root {} should be generation 0", m.name),
            Some(pid) => {
                let parent = members
                    .iter()
                    .find(|p| p.id == pid)
                    .unwrap_or_else(|| panic!("parent of {} missing", m.name));
                assert_eq!(
                    m.generation,
                    parent.generation + 1,
                    "{} should be one below {}",
                    m.name,
                    parent.name
                );
            }
        }
    }
}

//! Demo family used to populate an empty store.

use rusqlite::Connection;
use tracing::info;

use crate::db::member_repo;
use crate::error::ReunionResult;
use crate::model::{AgeGroup, Member, NewMember};

struct Branch {
    head: &'static str,
    /// Each child of the head with that child's own children.
    children: &'static [(&'static str, &'static [&'static str])],
}

const FOUNDERS: [&str; 2] = ["Wesley Tumblin", "Esther Tumblin"];

const BRANCHES: &[Branch] = &[
    Branch {
        head: "Gail Tumblin",
        children: &[
            ("Alan", &["Aeson", "Anasiya"]),
            ("Alana", &["Azael", "Alfie"]),
            ("Kristy", &["Kalah", "Darinam"]),
            ("Candace", &["Oren", "Chad", "Austin"]),
        ],
    },
    Branch {
        head: "Wesley Tumblin II",
        children: &[
            ("Wesley III", &["Kierra"]),
            ("Thomas", &["Deontia", "Jalanrique"]),
            ("Justin", &["Duri", "Brooklyn"]),
            ("Jessica", &["Paloma"]),
        ],
    },
    Branch {
        head: "Norris Tumblin",
        children: &[
            ("Torey", &["Braionna", "Dejia"]),
            ("Michael", &["Nasir", "Zamia"]),
            ("Norris Jr", &["Kaetyla", "Malika"]),
            ("Ahmad", &["Majir", "Josephine"]),
            ("Aishah", &["Leona", "Malei"]),
            ("Surah", &[]),
        ],
    },
    Branch {
        head: "Michael Tumblin",
        children: &[("Michelle", &["Niorielle", "Milewisee", "Ely"])],
    },
    Branch {
        head: "Cheryl Tumblin",
        children: &[
            ("Kendrick", &[]),
            ("Derrick", &["Ariel", "Malachi", "Isaiah"]),
            ("Kiera", &["Christian", "Tyler", "Leeah"]),
        ],
    },
    Branch {
        head: "Stephen Tumblin",
        children: &[
            ("Trina", &["Patrick", "Preston"]),
            ("Tina", &["Elijah", "Jose"]),
            ("Toriano", &["Toriano Jr", "Brinae"]),
            ("Chris", &["Melody"]),
            ("Casey", &["James", "Dominic"]),
            ("Cameron", &[]),
            ("Kayla", &[]),
        ],
    },
    Branch {
        head: "Kendra Tumblin",
        children: &[
            ("Byron", &["Kajia", "Layza"]),
            ("Dinez", &["Logan", "Ragia"]),
            ("Brandon", &["Ramario"]),
        ],
    },
    Branch {
        head: "Wendell Tumblin",
        children: &[
            ("Wendell Jr", &["Kitan"]),
            ("Wendy", &["Madison"]),
            ("Tony", &["Allure"]),
            ("Corea", &[]),
        ],
    },
    Branch {
        head: "Donald Tumblin",
        children: &[
            ("Ashaunta", &["Avery", "Ada", "Leona"]),
            ("Diondra", &["Bernard", "Benjamin", "Bentley"]),
            ("Dana", &["Dain", "Emari", "Berkell", "Bailey"]),
        ],
    },
    Branch {
        head: "Myra Tumblin",
        children: &[
            ("Daillyn", &["Jasir", "Jazmyn"]),
            ("Angelisha", &["Aiden", "Amartrez"]),
        ],
    },
    Branch {
        head: "Chantell Tumblin",
        children: &[
            ("Donald", &["Rada", "Kaylei", "Syli"]),
            ("Danielle", &["Juvonna", "Jaynai", "Anthony Jr"]),
            ("Joy", &["Nehemiah", "Kason", "Trinity"]),
        ],
    },
];

/// Creates the demo family if the store is empty. Returns the number of
/// members created (0 when there was already data).
///
/// Everything is inserted in one transaction, so a failure leaves the store
/// empty. Branch heads hang off the first founder and every generation is
/// derived from the parent (0 to 3).
pub fn seed_if_empty(conn: &Connection) -> ReunionResult<usize> {
    if member_repo::count(conn)? > 0 {
        info!("store already has members, skipping seed");
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;

    let founders: Vec<Member> = FOUNDERS
        .iter()
        .map(|name| member_repo::insert(&tx, &NewMember::founder(name.to_string(), AgeGroup::Adult)))
        .collect::<ReunionResult<_>>()?;
    let mut created = founders.len();
    let Some(patriarch) = founders.first() else {
        return Ok(0);
    };

    for branch in BRANCHES {
        let head = insert_child(&tx, branch.head, AgeGroup::Adult, patriarch)?;
        created += 1;

        for (child, grandchildren) in branch.children {
            let child = insert_child(&tx, child, AgeGroup::Adult, &head)?;
            created += 1;

            for grandchild in grandchildren.iter() {
                insert_child(&tx, grandchild, AgeGroup::Child, &child)?;
                created += 1;
            }
        }
    }

    tx.commit()?;
    info!(created, "seeded demo family");
    Ok(created)
}

fn insert_child(
    conn: &Connection,
    name: &str,
    age_group: AgeGroup,
    parent: &Member,
) -> ReunionResult<Member> {
    member_repo::insert(conn, &NewMember::child_of(name.to_string(), age_group, parent)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;

    fn expected_size() -> usize {
        FOUNDERS.len()
            + BRANCHES
                .iter()
                .map(|b| 1 + b.children.iter().map(|(_, g)| 1 + g.len()).sum::<usize>())
                .sum::<usize>()
    }

    #[test]
    fn seeds_empty_store_once() {
        let conn = schema::test_connection();
        let created = seed_if_empty(&conn).unwrap();
        assert_eq!(created, expected_size());
        assert_eq!(member_repo::count(&conn).unwrap(), created);

        assert_eq!(seed_if_empty(&conn).unwrap(), 0);
        assert_eq!(member_repo::count(&conn).unwrap(), created);
    }

    #[test]
    fn seeded_generations_follow_parents() {
        let conn = schema::test_connection();
        seed_if_empty(&conn).unwrap();

        let members = member_repo::find_all(&conn).unwrap();
        for m in &members {
            match m.parent_id {
                None => assert_eq!(m.generation, 0),
                Some(pid) => {
                    let parent = members.iter().find(|p| p.id == pid).unwrap();
                    assert_eq!(m.generation, parent.generation + 1, "{}", m.name);
                }
            }
        }
        assert_eq!(members.iter().map(|m| m.generation).max(), Some(3));
    }

    #[test]
    fn failed_seed_leaves_store_empty_and_can_be_retried() {
        let conn = schema::test_connection();
        conn.execute_batch(
            "CREATE TRIGGER refuse_norris BEFORE INSERT ON family_members
             WHEN NEW.name = 'Norris Tumblin'
             BEGIN SELECT RAISE(ABORT, 'refused'); END;",
        )
        .unwrap();

        assert!(seed_if_empty(&conn).is_err());
        assert_eq!(member_repo::count(&conn).unwrap(), 0);

        conn.execute_batch("DROP TRIGGER refuse_norris;").unwrap();
        assert_eq!(seed_if_empty(&conn).unwrap(), expected_size());
    }
}

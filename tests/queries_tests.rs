mod common;

use reunion::db::member_repo;
use reunion::model::*;
use reunion::ops::member_ops;
use reunion::queries::tree_queries;
use rstest::rstest;

use common::{child, founder, setup};

#[test]
fn empty_store_gives_empty_tree() {
    let conn = setup();
    let tree = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();

    assert!(tree.roots.is_empty());
    assert_eq!(tree.total_members, 0);
}

#[test]
fn founders_are_roots_in_insertion_order() {
    let conn = setup();
    founder(&conn, "Wesley Tumblin");
    founder(&conn, "Esther Tumblin");

    let tree = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    assert_eq!(tree.roots.len(), 2);
    assert_eq!(tree.roots[0].name, "Wesley Tumblin");
    assert_eq!(tree.roots[0].generation, 0);
    assert_eq!(tree.roots[1].name, "Esther Tumblin");
    assert_eq!(tree.total_members, 2);
}

#[test]
fn nested_hierarchy_is_returned() {
    let conn = setup();
    let wesley = founder(&conn, "Wesley Tumblin");
    let gail = child(&conn, "Gail Tumblin", wesley.id);
    child(&conn, "Alan", gail.id);
    child(&conn, "Aeson", gail.id);

    let tree = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    assert_eq!(tree.roots.len(), 1);
    let wesley_node = &tree.roots[0];
    assert_eq!(wesley_node.children.len(), 1);
    assert_eq!(wesley_node.children[0].name, "Gail Tumblin");
    let names: Vec<_> = wesley_node.children[0].children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["Alan", "Aeson"]);
    assert_eq!(tree.total_members, 4);
}

#[test]
fn added_member_appears_in_tree() {
    let conn = setup();
    let wesley = founder(&conn, "Wesley Tumblin");
    member_ops::add_member(&conn, "New Kid", AgeGroup::Child, Some(wesley.id), None).unwrap();

    let tree = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    assert_eq!(tree.roots[0].children.len(), 1);
    assert_eq!(tree.roots[0].children[0].name, "New Kid");
    assert_eq!(tree.roots[0].children[0].parent_id, Some(wesley.id));
    assert_eq!(tree.total_members, 2);
}

#[rstest]
#[case(RootPolicy::Founders, 1)]
#[case(RootPolicy::Parentless, 2)]
fn parentless_non_founder_is_counted_but_shown_only_as_parentless_root(
    #[case] policy: RootPolicy,
    #[case] expected_roots: usize,
) {
    let conn = setup();
    founder(&conn, "Wesley");
    member_ops::add_member(&conn, "Drifter", AgeGroup::Adult, None, None).unwrap();

    let tree = tree_queries::get_tree(&conn, policy).unwrap();
    assert_eq!(tree.roots.len(), expected_roots);
    assert_eq!(tree.total_members, 2);
}

#[test]
fn orphan_with_dangling_parent_is_counted_but_not_shown() {
    let conn = setup();
    let wesley = founder(&conn, "Wesley");

    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         INSERT INTO family_members (name, age_group, parent_id, generation) VALUES ('Lost', 'CHILD', 999, 1);
         PRAGMA foreign_keys = ON;",
    )
    .unwrap();

    for policy in [RootPolicy::Founders, RootPolicy::Parentless] {
        let tree = tree_queries::get_tree(&conn, policy).unwrap();
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].id, wesley.id);
        assert_eq!(tree.roots[0].size(), 1);
        assert_eq!(tree.total_members, 2);
    }
}

#[test]
fn building_twice_gives_identical_output() {
    let conn = setup();
    reunion::seed::seed_if_empty(&conn).unwrap();

    let first = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    let second = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn seeded_tree_shows_every_member_under_the_founders() {
    let conn = setup();
    let created = reunion::seed::seed_if_empty(&conn).unwrap();

    let tree = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    assert_eq!(tree.roots.len(), 2);
    let shown: usize = tree.roots.iter().map(TreeNode::size).sum();
    assert_eq!(shown, created);
    assert_eq!(tree.total_members, created);
}

#[test]
fn tree_serializes_with_camel_case_fields() {
    let conn = setup();
    let wesley = founder(&conn, "Wesley");
    child(&conn, "Gail", wesley.id);

    let tree = tree_queries::get_tree(&conn, RootPolicy::Founders).unwrap();
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["totalMembers"], 2);
    assert_eq!(json["roots"][0]["ageGroup"], "ADULT");
    assert!(json["roots"][0]["parentId"].is_null());
    assert_eq!(json["roots"][0]["children"][0]["parentId"], wesley.id.value);
    assert_eq!(json["roots"][0]["children"][0]["ageGroup"], "CHILD");
}

#[test]
fn get_node_returns_subtree_and_get_member_returns_row() {
    let conn = setup();
    let wesley = founder(&conn, "Wesley");
    let gail = child(&conn, "Gail", wesley.id);
    child(&conn, "Alan", gail.id);

    let node = tree_queries::get_node(&conn, gail.id).unwrap().unwrap();
    assert_eq!(node.size(), 2);

    let member = tree_queries::get_member(&conn, gail.id).unwrap().unwrap();
    assert_eq!(member, member_repo::find_by_id(&conn, gail.id).unwrap().unwrap());
    assert!(tree_queries::get_node(&conn, Id::new(999)).unwrap().is_none());
    assert_eq!(tree_queries::total_members(&conn).unwrap(), 3);
}

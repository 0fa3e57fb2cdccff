use serde_json::json;
use termtree::Tree;

use crate::cli::context::CLIContext;
use crate::error::{ReunionError, ReunionResult};
use crate::model::*;
use crate::ops::member_ops;
use crate::queries::tree_queries;
use crate::{seed, validation};

pub fn tree(ctx: &CLIContext) -> ReunionResult<()> {
    let family = tree_queries::get_tree(&ctx.conn, ctx.policy)?;
    ctx.emit(&family, |f| {
        if f.roots.is_empty() {
            return format!(
                "No roots to show ({} members stored). Use 'add-founder' or 'seed' to start.",
                f.total_members
            );
        }
        let mut out = String::new();
        for root in &f.roots {
            out.push_str(&to_display_tree(root).to_string());
        }
        out.push_str(&format!("{} members", f.total_members));
        out
    })
}

pub fn show(ctx: &CLIContext, id: i64) -> ReunionResult<()> {
    let id = Id::new(id);
    let member = tree_queries::get_member(&ctx.conn, id)?
        .ok_or_else(|| ReunionError::member_not_found(id))?;
    let node = tree_queries::get_node(&ctx.conn, id)?
        .ok_or_else(|| ReunionError::member_not_found(id))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&node)?);
        return Ok(());
    }

    println!();
    println!("Name: {}", member.name);
    println!("Age group: {}", member.age_group);
    println!("Generation: {}", member.generation);
    println!(
        "Parent: {}",
        member.parent_id.map(|p| p.to_string()).unwrap_or_else(|| "(none)".into())
    );
    println!("Founder: {}", if member.is_founder { "yes" } else { "no" });
    println!("Added: {}", member.created_at.format("%Y-%m-%d %H:%M"));
    println!("Descendants: {}", node.size() - 1);
    println!();
    print!("{}", to_display_tree(&node));
    Ok(())
}

pub fn add(
    ctx: &CLIContext,
    name: &str,
    age_group: &str,
    parent: Option<i64>,
    generation: Option<u32>,
) -> ReunionResult<()> {
    let (name, age) = validation::member_input(name, age_group)?;
    let node = member_ops::add_member(&ctx.conn, &name, age, parent.map(Id::new), generation)?;
    ctx.emit(&node, |n| format!("Added {} (id {}, generation {})", n.name, n.id, n.generation))
}

pub fn add_founder(ctx: &CLIContext, name: &str, age_group: &str) -> ReunionResult<()> {
    let (name, age) = validation::member_input(name, age_group)?;
    let node = member_ops::add_founder(&ctx.conn, &name, age)?;
    ctx.emit(&node, |n| format!("Added founder {} (id {})", n.name, n.id))
}

pub fn update(
    ctx: &CLIContext,
    id: i64,
    name: &str,
    age_group: &str,
    generation: Option<u32>,
) -> ReunionResult<()> {
    let (name, age) = validation::member_input(name, age_group)?;
    let node = member_ops::update_member(&ctx.conn, Id::new(id), &name, age, generation)?;
    ctx.emit(&node, |n| {
        format!("Updated {} (id {}, {}, generation {})", n.name, n.id, n.age_group, n.generation)
    })
}

pub fn move_to(ctx: &CLIContext, id: i64, parent: Option<i64>) -> ReunionResult<()> {
    let node = member_ops::move_member(&ctx.conn, Id::new(id), parent.map(Id::new))?;
    ctx.emit(&node, |n| match n.parent_id {
        Some(p) => format!("Moved {} under {} (generation {})", n.name, p, n.generation),
        None => format!("Moved {} to the top level (generation 0)", n.name),
    })
}

pub fn delete(ctx: &CLIContext, id: i64) -> ReunionResult<()> {
    let removed = member_ops::delete_member(&ctx.conn, Id::new(id))?;
    ctx.emit(&json!({ "id": id, "removed": removed }), |_| {
        format!("Deleted member {} and {} descendant(s)", id, removed - 1)
    })
}

pub fn seed(ctx: &CLIContext) -> ReunionResult<()> {
    let created = seed::seed_if_empty(&ctx.conn)?;
    ctx.emit(&json!({ "created": created }), |_| {
        if created == 0 {
            "Database already has members; nothing seeded.".to_string()
        } else {
            format!("Seeded {} members.", created)
        }
    })
}

fn label(node: &TreeNode) -> String {
    format!("{} [#{} gen {} {}]", node.name, node.id, node.generation, node.age_group)
}

fn to_display_tree(node: &TreeNode) -> Tree<String> {
    // Pre-order walk; reversed so the first child is visited first.
    let mut order = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        order.push(current);
        stack.extend(current.children.iter().rev());
    }

    // In reverse pre-order a node's subtrees sit on top of `built`, first
    // child topmost.
    let mut built: Vec<Tree<String>> = Vec::with_capacity(order.len());
    for current in order.into_iter().rev() {
        let split = built.len() - current.children.len();
        let leaves: Vec<_> = built.drain(split..).rev().collect();
        built.push(Tree::new(label(current)).with_leaves(leaves));
    }

    built.pop().unwrap_or_else(|| Tree::new(label(node)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, name: &str, generation: u32, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            id: Id::new(id),
            name: name.into(),
            generation,
            age_group: AgeGroup::Adult,
            parent_id: None,
            children,
        }
    }

    #[test]
    fn display_tree_nests_children() {
        let root = node(1, "Wesley", 0, vec![node(2, "Gail", 1, vec![])]);

        let text = to_display_tree(&root).to_string();
        assert!(text.starts_with("Wesley [#1 gen 0 ADULT]"));
        assert!(text.contains("Gail [#2 gen 1 ADULT]"));
    }

    #[test]
    fn display_tree_keeps_child_order_at_every_level() {
        let gail = node(2, "Gail", 1, vec![node(4, "Alan", 2, vec![]), node(5, "Alana", 2, vec![])]);
        let norris = node(3, "Norris", 1, vec![node(6, "Torey", 2, vec![])]);
        let root = node(1, "Wesley", 0, vec![gail, norris]);

        let tree = to_display_tree(&root);
        let names: Vec<_> = tree.leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(names, ["Gail [#2 gen 1 ADULT]", "Norris [#3 gen 1 ADULT]"]);
        let grandchildren: Vec<_> = tree.leaves[0].leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(grandchildren, ["Alan [#4 gen 2 ADULT]", "Alana [#5 gen 2 ADULT]"]);
        assert_eq!(tree.leaves[1].leaves.len(), 1);
    }

    #[test]
    fn display_tree_handles_deep_chains() {
        let depth = 2_000;
        let mut chain = node(depth, "leaf", depth as u32, vec![]);
        for id in (1..depth).rev() {
            chain = node(id, "m", id as u32, vec![chain]);
        }

        let tree = to_display_tree(&chain);
        let mut levels = 1;
        let mut current = &tree;
        while let Some(next) = current.leaves.first() {
            levels += 1;
            current = next;
        }
        assert_eq!(levels, depth as usize);
        assert_eq!(current.root, "leaf [#2000 gen 2000 ADULT]");
    }
}

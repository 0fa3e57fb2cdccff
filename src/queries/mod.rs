pub mod tree_queries;

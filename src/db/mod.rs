pub mod member_repo;
pub mod schema;

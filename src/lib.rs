pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod forest;
pub mod ops;
pub mod queries;
pub mod config;
pub mod seed;
pub mod cli;

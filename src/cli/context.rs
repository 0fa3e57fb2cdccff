use rusqlite::Connection;
use serde::Serialize;

use crate::error::ReunionResult;
use crate::model::RootPolicy;

pub struct CLIContext {
    pub conn: Connection,
    pub policy: RootPolicy,
    pub json: bool,
}

impl CLIContext {
    pub fn new(conn: Connection, policy: RootPolicy, json: bool) -> Self {
        Self { conn, policy, json }
    }

    /// Print `value` as pretty JSON when `--json` is set, otherwise print the
    /// text produced by `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> ReunionResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

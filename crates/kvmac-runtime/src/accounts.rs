//! Group membership via `id` and `usermod`.

use async_trait::async_trait;
use kvmac_core::ToolError;
use kvmac_core::ports::AccountManager;

use crate::command::{command, run_captured};

#[derive(Debug, Clone, Default)]
pub struct UsermodAccounts;

/// Split `id -nG` output into group names.
pub fn parse_group_list(output: &str) -> Vec<String> {
    output.split_whitespace().map(str::to_string).collect()
}

#[async_trait]
impl AccountManager for UsermodAccounts {
    async fn groups_of(&self, user: &str) -> Result<Vec<String>, ToolError> {
        let output = run_captured("id", command("id", ["-nG", user])).await?;
        Ok(parse_group_list(&output))
    }

    async fn add_to_group(&self, user: &str, group: &str) -> Result<(), ToolError> {
        run_captured("usermod", command("usermod", ["-aG", group, user])).await?;
        Ok(())
    }
}

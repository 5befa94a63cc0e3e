//! Group manager - grants the invoking user device access.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{MembershipOutcome, missing_groups};
use crate::ports::{AccountManager, Operator};

/// Service adding the invoking user to the groups it lacks.
pub struct GroupManager {
    accounts: Arc<dyn AccountManager>,
    operator: Arc<dyn Operator>,
}

impl GroupManager {
    pub fn new(accounts: Arc<dyn AccountManager>, operator: Arc<dyn Operator>) -> Self {
        Self { accounts, operator }
    }

    /// Add `user` to every group in `required` it does not belong to yet.
    ///
    /// One addition is issued per missing group. A failed addition is
    /// recorded and the remaining groups are still attempted.
    pub async fn ensure(&self, user: &str, required: &[String]) -> MembershipOutcome {
        let current = match self.accounts.groups_of(user).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(user, error = %e, "Could not list groups, attempting all additions");
                Vec::new()
            }
        };

        let mut outcome = MembershipOutcome::default();
        let missing = missing_groups(required, &current);
        if missing.is_empty() {
            self.operator
                .info(&format!("✓ {user} already belongs to {}", required.join(", ")));
            return outcome;
        }

        for group in missing {
            match self.accounts.add_to_group(user, &group).await {
                Ok(()) => {
                    info!(user, group = %group, "Added user to group");
                    self.operator.info(&format!("✓ Added {user} to {group}"));
                    outcome.added.push(group);
                }
                Err(e) => {
                    warn!(user, group = %group, error = %e, "Group addition failed");
                    self.operator
                        .warn(&format!("Could not add {user} to {group}: {e}"));
                    outcome.failed.push((group, e.to_string()));
                }
            }
        }

        if !outcome.added.is_empty() {
            self.operator
                .info("Log out and back in for new group memberships to take effect.");
        }
        outcome
    }
}

//! Who invoked the tool, and with which privileges.
//!
//! The process normally runs through `sudo`; the user to configure is the
//! one named by `SUDO_USER`, not root.

use kvmac_core::HostIdentity;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Failed to look up user {user}: {reason}")]
    Lookup { user: String, reason: String },

    #[error("User {0} does not exist")]
    UnknownUser(String),

    #[error("Host identity detection is only supported on Unix")]
    Unsupported,
}

/// Pick the name of the invoking user from the elevation state and
/// `SUDO_USER`. `None` means "the effective user".
pub fn sudo_invoker(elevated: bool, sudo_user: Option<&str>) -> Option<String> {
    if !elevated {
        return None;
    }
    sudo_user
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "root")
        .map(str::to_string)
}

/// Detect the invoking user, their home directory and the privilege state.
#[cfg(unix)]
pub fn detect_identity() -> Result<HostIdentity, IdentityError> {
    use nix::unistd::{User, geteuid};

    let euid = geteuid();
    let elevated = euid.is_root();
    let sudo_user = std::env::var("SUDO_USER").ok();

    let user = match sudo_invoker(elevated, sudo_user.as_deref()) {
        Some(name) => User::from_name(&name)
            .map_err(|e| IdentityError::Lookup {
                user: name.clone(),
                reason: e.to_string(),
            })?
            .ok_or(IdentityError::UnknownUser(name))?,
        None => User::from_uid(euid)
            .map_err(|e| IdentityError::Lookup {
                user: euid.to_string(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| IdentityError::UnknownUser(euid.to_string()))?,
    };

    debug!(user = %user.name, home = %user.dir.display(), elevated, "Detected host identity");
    Ok(HostIdentity::new(user.name, user.dir, elevated))
}

#[cfg(not(unix))]
pub fn detect_identity() -> Result<HostIdentity, IdentityError> {
    Err(IdentityError::Unsupported)
}

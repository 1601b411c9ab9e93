//! Identity of the process holding the change-log lock.

use serde::{Deserialize, Serialize};

/// Host identity recorded in `LOCKEDBY` when the lock is granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostIdentity {
    pub hostname: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_address")]
    pub address: String,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

impl HostIdentity {
    pub fn new(
        hostname: impl Into<String>,
        description: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            description: description.into(),
            address: address.into(),
        }
    }

    /// Identity of the current process, taken from `HOSTNAME` (or
    /// `COMPUTERNAME` on Windows) and falling back to `localhost`.
    pub fn from_env() -> Self {
        let hostname = std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| "localhost".to_string());
        Self::new(hostname, String::new(), default_address())
    }

    /// The `LOCKEDBY` value: `"{hostname} {description} ({address})"`.
    pub fn lock_holder(&self) -> String {
        format!("{} {} ({})", self.hostname, self.description, self.address)
    }
}

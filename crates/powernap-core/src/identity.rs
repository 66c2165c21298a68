//! The target host's identity.

use std::fmt;

use crate::ids::{IdentityError, MacAddr};

/// Everything needed to address one host: where to reach its management API,
/// which NIC to wake, and the bearer credential for API calls.
///
/// Constructed once from configuration and never mutated; a monitor run that
/// needs a different host gets a new identity. Deliberately not serializable:
/// the credential only ever enters through startup configuration.
#[derive(Clone)]
pub struct HostIdentity {
    address: String,
    mac: MacAddr,
    api_key: String,
}

impl HostIdentity {
    /// Build a host identity, validating the address up front.
    ///
    /// The address must be a bare hostname or IP; schemes, paths, and
    /// whitespace are rejected here so the monitor loop never starts with a
    /// target it cannot reach.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Address`] if the address is empty or contains
    /// `/` or whitespace.
    pub fn new(
        address: impl Into<String>,
        mac: MacAddr,
        api_key: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let address = address.into();
        if address.is_empty() {
            return Err(IdentityError::Address {
                reason: "address is empty",
            });
        }
        if address.contains('/') {
            return Err(IdentityError::Address {
                reason: "address must be a bare hostname or IP, not a URL",
            });
        }
        if address.chars().any(char::is_whitespace) {
            return Err(IdentityError::Address {
                reason: "address contains whitespace",
            });
        }
        Ok(Self {
            address,
            mac,
            api_key: api_key.into(),
        })
    }

    /// The host's address (IP or hostname).
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The MAC address of the interface that receives the magic packet.
    #[must_use]
    pub const fn mac(&self) -> MacAddr {
        self.mac
    }

    /// The bearer token for management API calls.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// The API key is a live credential; keep it out of logs and panics.
impl fmt::Debug for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostIdentity")
            .field("address", &self.address)
            .field("mac", &self.mac)
            .field("api_key", &"*****")
            .finish()
    }
}

//! MAC address parsing and validation.
//!
//! The wake path only ever needs the six raw bytes, so `MacAddr` stores them
//! directly and keeps string handling at the configuration boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors produced while validating host identity inputs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The MAC string did not contain exactly six groups.
    #[error("invalid MAC address: expected 6 octets, got {got}")]
    MacLength {
        /// Number of octet groups found.
        got: usize,
    },

    /// One of the MAC octet groups was not a two-digit hex byte.
    #[error("invalid MAC address: bad octet {octet:?}")]
    MacOctet {
        /// The offending group, as written.
        octet: String,
    },

    /// The host address was empty or contained characters that cannot
    /// appear in a bare hostname or IP.
    #[error("invalid host address: {reason}")]
    Address {
        /// Why the address was rejected.
        reason: &'static str,
    },
}

/// A MAC-48 hardware address, the target of the Wake-on-LAN magic packet.
///
/// Accepts `aa:bb:cc:00:11:22` and `aa-bb-cc-00-11-22` on input and always
/// displays as lowercase colon-separated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    /// Create a `MacAddr` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Return the bytes by value, for building wire payloads.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddr {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sep = if s.contains('-') { '-' } else { ':' };
        let groups: Vec<&str> = s.split(sep).collect();
        if groups.len() != 6 {
            return Err(IdentityError::MacLength { got: groups.len() });
        }

        let mut out = [0u8; 6];
        for (i, group) in groups.iter().enumerate() {
            if group.len() != 2 {
                return Err(IdentityError::MacOctet {
                    octet: (*group).to_string(),
                });
            }
            out[i] = u8::from_str_radix(group, 16).map_err(|_| IdentityError::MacOctet {
                octet: (*group).to_string(),
            })?;
        }
        Ok(Self(out))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddr({self})")
    }
}

impl TryFrom<String> for MacAddr {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddr> for String {
    fn from(mac: MacAddr) -> Self {
        mac.to_string()
    }
}

//! OSGi-style component versions.
//!
//! Live components advertise versions of the form
//! `major[.minor[.micro[.qualifier]]]`. Missing numeric parts default to zero,
//! so `1.0` and `1.0.0` denote the same version.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized component version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentVersion {
    major: u64,
    minor: u64,
    micro: u64,
    qualifier: String,
}

impl ComponentVersion {
    /// Creates a version without a qualifier.
    #[must_use]
    pub const fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Returns a copy of this version carrying the given qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Parses a version string. An empty string is `0.0.0`.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let invalid = |reason: String| Error::InvalidVersion {
            input: s.to_string(),
            reason,
        };

        let mut parts = trimmed.splitn(4, '.');
        let mut numeric = [0u64; 3];
        for (index, slot) in numeric.iter_mut().enumerate() {
            match parts.next() {
                Some(part) => {
                    *slot = part
                        .parse()
                        .map_err(|_| invalid(format!("segment {} '{part}' is not a number", index + 1)))?;
                }
                None => break,
            }
        }

        let qualifier = match parts.next() {
            Some("") => return Err(invalid("qualifier is empty".to_string())),
            Some(q) => {
                if !q.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
                    return Err(invalid(format!("qualifier '{q}' has invalid characters")));
                }
                q.to_string()
            }
            None => String::new(),
        };

        Ok(Self {
            major: numeric[0],
            minor: numeric[1],
            micro: numeric[2],
            qualifier,
        })
    }

    #[must_use]
    pub const fn major(&self) -> u64 {
        self.major
    }

    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.minor
    }

    #[must_use]
    pub const fn micro(&self) -> u64 {
        self.micro
    }

    #[must_use]
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for ComponentVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ComponentVersion {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ComponentVersion> for String {
    fn from(v: ComponentVersion) -> Self {
        v.to_string()
    }
}

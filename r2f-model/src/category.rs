use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A section of a feature that the diff collaborator can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffCategory {
    Bundles,
    Configurations,
    FrameworkProperties,
    Extensions,
}

impl DiffCategory {
    pub const ALL: [DiffCategory; 4] = [
        DiffCategory::Bundles,
        DiffCategory::Configurations,
        DiffCategory::FrameworkProperties,
        DiffCategory::Extensions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffCategory::Bundles => "bundles",
            DiffCategory::Configurations => "configurations",
            DiffCategory::FrameworkProperties => "framework-properties",
            DiffCategory::Extensions => "extensions",
        }
    }
}

impl fmt::Display for DiffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiffCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown diff category: {s}"))
    }
}

//! Live configuration → declarative configuration record.

use crate::runtime::LiveConfiguration;
use r2f_model::Configuration;

/// Copies a live configuration entry verbatim into a configuration record.
///
/// Pids (plain or factory-qualified) and property values are kept as-is,
/// including their runtime value types.
pub fn map_configuration(live: &LiveConfiguration) -> Configuration {
    Configuration {
        pid: live.pid.clone(),
        properties: live.properties.clone(),
    }
}

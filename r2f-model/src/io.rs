//! JSON reader and writer for features.
//!
//! Output is deterministic: bundles are written in identity order and
//! configurations in pid order, so writing the same feature twice yields the
//! same bytes.

use crate::{Feature, ModelError, ModelResult};
use std::io::{Read, Write};
use std::path::Path;

/// Reads a feature from `reader`. `location` only labels errors.
pub fn read_feature<R: Read>(reader: R, location: &str) -> ModelResult<Feature> {
    serde_json::from_reader(reader).map_err(|source| ModelError::Parse {
        location: location.to_string(),
        source,
    })
}

/// Reads a feature from an in-memory JSON document.
pub fn read_feature_str(json: &str, location: &str) -> ModelResult<Feature> {
    serde_json::from_str(json).map_err(|source| ModelError::Parse {
        location: location.to_string(),
        source,
    })
}

/// Reads a feature file from disk.
pub fn read_feature_file(path: &Path) -> ModelResult<Feature> {
    let file = std::fs::File::open(path)?;
    read_feature(std::io::BufReader::new(file), &path.display().to_string())
}

/// Writes a feature as pretty-printed JSON.
pub fn write_feature<W: Write>(feature: &Feature, writer: W) -> ModelResult<()> {
    serde_json::to_writer_pretty(writer, feature)?;
    Ok(())
}

/// Renders a feature as a pretty-printed JSON string.
pub fn to_json_string(feature: &Feature) -> ModelResult<String> {
    Ok(serde_json::to_string_pretty(feature)?)
}

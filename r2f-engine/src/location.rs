//! Data-file location resolution and resource reading.
//!
//! A data file (such as the identity table) is located through framework
//! properties, tried in order:
//! 1. `sling.feature.apiregions.resource.<name>`: explicit per-resource location
//! 2. `sling.feature.apiregions.location` + `/<name>`: shared base location
//!
//! A location is a URL, a `classloader://` path resolved against the
//! configured resource directory, or a bare filesystem path.

use crate::{CallContext, EngineConfig, ReconcileError, ReconcileResult};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Prefix of per-resource location overrides.
pub const RESOURCE_PROPERTY_PREFIX: &str = "sling.feature.apiregions.resource.";

/// Base location shared by all data files.
pub const LOCATION_PROPERTY: &str = "sling.feature.apiregions.location";

/// Pseudo-scheme for resources bundled with the process.
pub const CLASSLOADER_SCHEME: &str = "classloader://";

/// Errors that can occur while reading a resolved resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("not a local file: {0}")]
    NotAFile(Url),
}

/// Resolves the location of data file `name` to a URL.
pub fn resolve_data_file(config: &EngineConfig, name: &str) -> ReconcileResult<Url> {
    let location = config
        .property(&format!("{RESOURCE_PROPERTY_PREFIX}{name}"))
        .map(str::to_string)
        .or_else(|| {
            config
                .property(LOCATION_PROPERTY)
                .map(|base| join_location(base, name))
        })
        .ok_or_else(|| {
            ReconcileError::configuration_load(
                name,
                format!(
                    "no location configured; set '{RESOURCE_PROPERTY_PREFIX}{name}' or '{LOCATION_PROPERTY}'"
                ),
            )
        })?;

    debug!("Resolved {} location: {}", name, location);
    location_to_url(&location, config.resource_dir.as_deref())
        .map_err(|reason| ReconcileError::configuration_load(name, reason))
}

/// Appends `/<name>` to a base location. A bare scheme such as
/// `classloader://` keeps its `//`.
fn join_location(base: &str, name: &str) -> String {
    if base.ends_with("://") {
        return format!("{base}{name}");
    }
    format!("{}/{name}", base.trim_end_matches('/'))
}

/// Normalizes a location string to a URL.
pub fn location_to_url(location: &str, resource_dir: Option<&Path>) -> Result<Url, String> {
    if let Some(relative) = location.strip_prefix(CLASSLOADER_SCHEME) {
        let dir = resource_dir
            .ok_or_else(|| format!("no resource directory configured for {location}"))?;
        let path = dir.join(relative.trim_start_matches('/'));
        if !path.is_file() {
            return Err(format!("embedded resource {} does not exist", path.display()));
        }
        return file_url(&path);
    }

    if location.contains(':') {
        // single-letter schemes are drive letters, not URLs
        if let Ok(url) = Url::parse(location) {
            if url.scheme().len() > 1 {
                return Ok(url);
            }
        }
    }
    file_url(Path::new(location))
}

fn file_url(path: &Path) -> Result<Url, String> {
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| format!("cannot resolve relative path {}: {e}", path.display()))?
            .join(path)
    };
    Url::from_file_path(&absolute).map_err(|()| format!("invalid file path {}", absolute.display()))
}

/// Reads the full contents of a resource, honouring the call context.
pub async fn read_resource(url: &Url, ctx: &CallContext) -> ReconcileResult<Result<Vec<u8>, ResourceError>> {
    ctx.run(&format!("reading {url}"), fetch(url)).await
}

async fn fetch(url: &Url) -> Result<Vec<u8>, ResourceError> {
    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| ResourceError::NotAFile(url.clone()))?;
            Ok(tokio::fs::read(path).await?)
        }
        "http" | "https" => {
            let response = reqwest::get(url.clone()).await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
        other => Err(ResourceError::UnsupportedScheme(other.to_string())),
    }
}

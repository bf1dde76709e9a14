//! Identity resolution for live components.
//!
//! A live component is mapped to an artifact identity by, in order:
//! 1. the identity table (authoritative, tried first)
//! 2. the first readable `pom.properties` embedded under `/META-INF/maven`
//!
//! A component that yields no identity either way fails resolution. It is
//! never silently left out of a snapshot.

use crate::runtime::{LiveComponent, SYSTEM_COMPONENT_ID};
use crate::{CallContext, IdentityTable, Properties, ReconcileResult};
use r2f_model::Artifact;
use r2f_types::{ArtifactId, ComponentVersion};
use thiserror::Error;
use tracing::debug;

/// Directory searched (recursively) for embedded Maven metadata.
pub const MAVEN_METADATA_PATH: &str = "/META-INF/maven";

/// File name of embedded Maven metadata.
pub const POM_PROPERTIES: &str = "pom.properties";

const GROUP_ID: &str = "groupId";
const ARTIFACT_ID: &str = "artifactId";
const VERSION: &str = "version";
const CLASSIFIER: &str = "classifier";

/// Errors that can occur while resolving a live component's identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(
        "component {symbolic_name}-{version} is not in the identity table and embeds no /META-INF/maven/**/pom.properties"
    )]
    NotFound {
        symbolic_name: String,
        version: ComponentVersion,
    },

    #[error("could not read {resource} from component {symbolic_name}: {source}")]
    Unreadable {
        symbolic_name: String,
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("component {symbolic_name} does not embed valid Maven metadata in {resource}: {reason}")]
    InvalidMetadata {
        symbolic_name: String,
        resource: String,
        reason: String,
    },
}

/// Resolves live components against an identity table, falling back to
/// embedded metadata. Never writes back into the table.
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'a> {
    table: &'a IdentityTable,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(table: &'a IdentityTable) -> Self {
        Self { table }
    }

    /// Resolves the artifact identity of `component`.
    pub async fn resolve(
        &self,
        component: &dyn LiveComponent,
        ctx: &CallContext,
    ) -> ReconcileResult<ArtifactId> {
        let symbolic_name = component.symbolic_name();
        let version = component.version();

        if let Some(id) = self.table.get(symbolic_name, version) {
            debug!("Resolved {}-{} from identity table: {}", symbolic_name, version, id);
            return Ok(id.clone());
        }

        match read_pom_properties(component, ctx).await? {
            Some(id) => {
                debug!("Resolved {}-{} from embedded metadata: {}", symbolic_name, version, id);
                Ok(id)
            }
            None => Err(IdentityError::NotFound {
                symbolic_name: symbolic_name.to_string(),
                version: version.clone(),
            }
            .into()),
        }
    }

    /// Maps `component` to a bundle record, or `None` for the framework root.
    ///
    /// The start order comes from the live component.
    pub async fn to_artifact(
        &self,
        component: &dyn LiveComponent,
        ctx: &CallContext,
    ) -> ReconcileResult<Option<Artifact>> {
        if component.id() == SYSTEM_COMPONENT_ID {
            return Ok(None);
        }
        let id = self.resolve(component, ctx).await?;
        Ok(Some(Artifact::new(id).with_start_order(component.start_order())))
    }
}

async fn read_pom_properties(
    component: &dyn LiveComponent,
    ctx: &CallContext,
) -> ReconcileResult<Option<ArtifactId>> {
    let symbolic_name = component.symbolic_name();
    let unreadable = |resource: &str, source| IdentityError::Unreadable {
        symbolic_name: symbolic_name.to_string(),
        resource: resource.to_string(),
        source,
    };

    let candidates = ctx
        .run(
            &format!("listing metadata of {symbolic_name}"),
            component.list_entries(MAVEN_METADATA_PATH, POM_PROPERTIES),
        )
        .await?
        .map_err(|e| unreadable(MAVEN_METADATA_PATH, e))?;

    // first readable candidate wins; listing order breaks ties
    for resource in candidates {
        let read = ctx
            .run(
                &format!("reading {resource} of {symbolic_name}"),
                component.read_entry(&resource),
            )
            .await?
            .map_err(|e| unreadable(&resource, e))?;

        let Some(bytes) = read else {
            continue;
        };
        return parse_metadata(symbolic_name, &resource, &Properties::from_bytes(&bytes)).map(Some);
    }
    Ok(None)
}

fn parse_metadata(
    symbolic_name: &str,
    resource: &str,
    properties: &Properties,
) -> ReconcileResult<ArtifactId> {
    let invalid = |reason: String| IdentityError::InvalidMetadata {
        symbolic_name: symbolic_name.to_string(),
        resource: resource.to_string(),
        reason,
    };

    if properties.is_empty() {
        return Err(invalid("no properties".to_string()).into());
    }
    let required = |key: &str| {
        properties
            .get_non_blank(key)
            .ok_or_else(|| invalid(format!("'{key}' is missing or blank")))
    };

    let group_id = required(GROUP_ID)?;
    let artifact_id = required(ARTIFACT_ID)?;
    let version = required(VERSION)?;
    let classifier = properties.get_non_blank(CLASSIFIER);

    Ok(ArtifactId::new(group_id, artifact_id, version, classifier, None))
}

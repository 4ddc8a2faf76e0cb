use crate::constants::{ORGANIZATIONS_ENTITY, PEOPLE_ENTITY};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which entity collection of the lookup API a run resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    Organizations,
    People,
}

impl EntityKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::Organizations => ORGANIZATIONS_ENTITY,
            EntityKind::People => PEOPLE_ENTITY,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// One resolved entity, written as a single CSV row. Field values are taken
/// verbatim from the API response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub id: String,
    pub name: String,
    pub link: String,
}

/// Raw HTTP outcome of a single lookup request, before classification.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Classification of a non-rate-limited lookup response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Resolved(ResolvedRecord),
    NotFound,
    UnexpectedShape,
}

/// Per-run counters reported after the last identifier is processed.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub total: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub unexpected_shape: usize,
    pub output_file: String,
}

/// Seam between the resolve loop and the remote lookup API.
#[async_trait::async_trait]
pub trait EntityApi: Send + Sync {
    /// Identifier for this API, used in logs and the run summary.
    fn api_name(&self) -> &'static str;

    /// Perform one lookup request and return the raw status and body.
    /// Transport failures are errors; any HTTP status is a success here.
    async fn fetch_entity(&self, id: &Uuid) -> Result<ApiResponse>;
}

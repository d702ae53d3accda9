use crate::catalog::{Catalog, IdSequence};
use crate::config::Config;
use crate::naming::{Clock, FilenameAssigner, SuffixRandom, SystemClock, ThreadRandom};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One uploaded video. Immutable after creation; serialized field names are
/// the service's wire format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "filename")]
    pub stored_filename: String,
    #[serde(rename = "path")]
    pub relative_path: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "uploadDate")]
    pub uploaded_at: DateTime<Utc>,
}

/// Shared per-process state, constructed once at startup and handed to every
/// request handler.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub ids: IdSequence,
    pub assigner: FilenameAssigner,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_sources(config, Arc::new(SystemClock), Arc::new(ThreadRandom))
    }

    /// Build state with explicit clock and random sources so tests can pin
    /// ids, timestamps, and filename suffixes.
    pub fn with_sources(
        config: Config,
        clock: Arc<dyn Clock>,
        random: Arc<dyn SuffixRandom>,
    ) -> Self {
        Self {
            catalog: Catalog::new(),
            ids: IdSequence::new(clock.clone()),
            assigner: FilenameAssigner::new(clock.clone(), random),
            clock,
            config,
        }
    }
}

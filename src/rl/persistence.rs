//! Checkpoint persistence for learned parameters
//!
//! A checkpoint is a single JSON document: metadata describing what was
//! saved, plus the values themselves. Saving overwrites the target file in
//! place; a crash mid-write can leave a truncated file behind.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// What a checkpoint holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Tabular Q-values keyed by (state, action)
    QTable,
    /// Linear weights keyed by feature name
    LinearWeights,
}

/// Metadata saved with the values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Kind of model the values belong to
    pub kind: ModelKind,

    /// Number of saved entries
    pub entries: usize,

    /// Crate version that wrote the checkpoint
    pub version: String,
}

impl CheckpointMetadata {
    /// Create new metadata
    pub fn new(kind: ModelKind, entries: usize) -> Self {
        Self {
            kind,
            entries,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A saved model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<T> {
    pub metadata: CheckpointMetadata,
    pub values: T,
}

/// Write `values` to `path`, creating parent directories if needed
pub fn save_checkpoint<T: Serialize>(
    path: &Path,
    kind: ModelKind,
    entries: usize,
    values: &T,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let checkpoint = Checkpoint {
        metadata: CheckpointMetadata::new(kind, entries),
        values,
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create checkpoint file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &checkpoint)
        .with_context(|| format!("Failed to serialize checkpoint to {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write checkpoint to {:?}", path))?;

    log::info!("Saved {} {:?} entries to {:?}", entries, kind, path);

    Ok(())
}

/// Read a checkpoint of the given kind from `path`
///
/// A missing file, malformed content or a checkpoint of another kind is an
/// error; nothing is substituted.
pub fn load_checkpoint<T: DeserializeOwned>(path: &Path, kind: ModelKind) -> Result<Checkpoint<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open checkpoint: {:?}", path))?;
    let reader = BufReader::new(file);

    let checkpoint: Checkpoint<T> = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize checkpoint from {:?}", path))?;

    if checkpoint.metadata.kind != kind {
        bail!(
            "Checkpoint {:?} holds {:?} values, expected {:?}",
            path,
            checkpoint.metadata.kind,
            kind
        );
    }

    log::info!(
        "Loaded {} {:?} entries from {:?} (written by version {})",
        checkpoint.metadata.entries,
        kind,
        path,
        checkpoint.metadata.version
    );

    Ok(checkpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_metadata_creation() {
        let metadata = CheckpointMetadata::new(ModelKind::QTable, 12);

        assert_eq!(metadata.kind, ModelKind::QTable);
        assert_eq!(metadata.entries, 12);
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = CheckpointMetadata::new(ModelKind::LinearWeights, 5);

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"linear_weights\""));

        let deserialized: CheckpointMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, metadata);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/weights.json");
        let values: BTreeMap<String, f64> = [("bias".to_string(), 1.5)].into_iter().collect();

        save_checkpoint(&path, ModelKind::LinearWeights, values.len(), &values).unwrap();
        let loaded: Checkpoint<BTreeMap<String, f64>> =
            load_checkpoint(&path, ModelKind::LinearWeights).unwrap();

        assert_eq!(loaded.values, values);
        assert_eq!(loaded.metadata.entries, 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let result: Result<Checkpoint<Vec<f64>>> = load_checkpoint(&path, ModelKind::QTable);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.json");
        std::fs::write(&path, "{\"metadata\": ").unwrap();

        let result: Result<Checkpoint<Vec<f64>>> = load_checkpoint(&path, ModelKind::QTable);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_wrong_kind_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("weights.json");
        let values: Vec<f64> = vec![1.0];
        save_checkpoint(&path, ModelKind::LinearWeights, 1, &values).unwrap();

        let result: Result<Checkpoint<Vec<f64>>> = load_checkpoint(&path, ModelKind::QTable);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("expected QTable"));
    }
}

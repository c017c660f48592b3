//! JSON output writer.
//!
//! Writes tapset trees, event listings and index summaries to JSON files
//! with proper formatting.

use crate::tapset::TapsetTree;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write any serializable value as pretty JSON
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_json<T: Serialize + ?Sized>(
    value: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;

    info!(
        "JSON written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Write a tapset tree snapshot
pub fn write_tree(tree: &TapsetTree, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(tree, output_path)
}

/// Read a tapset tree snapshot back
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_tree(input_path: impl AsRef<Path>) -> Result<TapsetTree, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading tree from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let tree: TapsetTree =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Tree loaded: version {}, {} functions",
        tree.version,
        tree.function_count()
    );

    Ok(tree)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tapset::TreeNode;
    use tempfile::NamedTempFile;

    fn create_test_tree() -> TapsetTree {
        let mut tree = TapsetTree::empty();
        let mut f = TreeNode::function("execname");
        f.add(TreeNode::parameter("pid", "function pid", "execname"));
        tree.root.add(f);
        tree.version = 3;
        tree.generated_at = "2024-01-01T00:00:00Z".to_string();
        tree
    }

    #[test]
    fn test_write_and_read_tree() {
        let tree = create_test_tree();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_tree(&tree, path).unwrap();
        let loaded = read_tree(path).unwrap();

        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_validate_output_path_empty() {
        let result = validate_output_path(Path::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/tree.json");

        write_tree(&create_test_tree(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}

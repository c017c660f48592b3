use crate::output::read_tree;
use crate::utils::config::TREE_SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a tapset tree JSON file
pub fn validate_tree_file(file_path: PathBuf) -> Result<()> {
    println!("Validating tree: {}", file_path.display());

    let tree = read_tree(&file_path)?;

    println!("✓ Valid tree JSON");
    println!("  Schema: {}", tree.schema_version);
    println!("  Version: {}", tree.version);
    println!("  Generated: {}", tree.generated_at);
    println!("  Functions: {}", tree.function_count());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("tracetap v{}", env!("CARGO_PKG_VERSION"));
    println!("Tree Schema: v{}", TREE_SCHEMA_VERSION);
    println!();
    println!("Seekable trace access and SystemTap tapset output parsing.");
}

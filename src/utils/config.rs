//! Configuration and constants for the library and CLI.

use std::path::PathBuf;

/// Number of events between two index checkpoints
pub const DEFAULT_INDEX_PAGE_SIZE: usize = 1000;

/// Current tree output schema version
pub const TREE_SCHEMA_VERSION: &str = "1.0.0";

/// Default SystemTap front end executable
pub const STAP_PROGRAM: &str = "stap";

// Pass-1 run used to list every tapset function: stap -v -p1 -e 'probe begin{}'
pub const FUNCTION_PASS_ARGS: &[&str] = &["-v", "-p1", "-e"];
pub const FUNCTION_PROBE_SCRIPT: &str = "probe begin{}";

/// Prefix of the locator string stored on parameter nodes
pub const DEFINITION_PREFIX: &str = "function ";

/// Regex template locating a probe definition; `{0}` is the escaped probe name
pub const PROBE_SEARCH_TEMPLATE: &str = r"(?m)^[ \t]*probe\s+{0}(?:\s|\+?=|\{|,|$)";

// Environment variables read by the CLI
pub const STAP_ENV: &str = "TRACETAP_STAP";
pub const TAPSETS_ENV: &str = "TRACETAP_TAPSETS";

/// Where and how to run the SystemTap front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapsetConfig {
    /// Executable to launch
    pub program: PathBuf,

    /// Extra tapset directories, each passed as `-I <dir>`
    pub tapsets: Vec<PathBuf>,
}

impl TapsetConfig {
    /// Build a config from a program and a `PATH`-style list of tapset directories
    pub fn from_path_list(program: impl Into<PathBuf>, tapsets: Option<&str>) -> Self {
        let tapsets = tapsets
            .map(|list| {
                std::env::split_paths(list)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            program: program.into(),
            tapsets,
        }
    }
}

impl Default for TapsetConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(STAP_PROGRAM),
            tapsets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_list_splits_and_skips_empty() {
        let list = std::env::join_paths(["/usr/share/tapsets", "", "/opt/tapsets"])
            .unwrap()
            .into_string()
            .unwrap();
        let config = TapsetConfig::from_path_list("stap", Some(&list));

        assert_eq!(
            config.tapsets,
            vec![
                PathBuf::from("/usr/share/tapsets"),
                PathBuf::from("/opt/tapsets")
            ]
        );
    }

    #[test]
    fn test_from_path_list_none() {
        let config = TapsetConfig::from_path_list("/usr/bin/stap", None);
        assert_eq!(config.program, PathBuf::from("/usr/bin/stap"));
        assert!(config.tapsets.is_empty());
    }
}

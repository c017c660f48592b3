//! Probe token extraction from `stap -L` style lines.

use crate::utils::config::PROBE_SEARCH_TEMPLATE;
use crate::utils::error::TapsetError;
use regex::Regex;
use std::fmt;

/// Identifying name of one probe plus the pattern locating its definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeNode {
    name: String,
}

impl ProbeNode {
    /// Name is everything before the first space, trimmed
    pub fn from_line(line: &str) -> Self {
        let name = match line.find(' ') {
            Some(idx) => &line[..idx],
            None => line,
        };
        Self {
            name: name.trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The search token is a regular expression
    pub fn is_regex_search(&self) -> bool {
        true
    }

    /// Search pattern for this probe's definition in tapset sources
    pub fn search_token(&self) -> String {
        PROBE_SEARCH_TEMPLATE.replace("{0}", &regex::escape(&self.name))
    }

    pub fn search_regex(&self) -> Result<Regex, TapsetError> {
        Ok(Regex::new(&self.search_token())?)
    }

    /// 1-based numbers of the lines of `text` defining this probe
    ///
    /// **Public** - definition lookup in tapset sources
    ///
    /// # Errors
    /// * `TapsetError::InvalidPattern` - the search token does not compile
    pub fn find_definitions(&self, text: &str) -> Result<Vec<usize>, TapsetError> {
        let re = self.search_regex()?;
        Ok(re
            .find_iter(text)
            .map(|m| text[..m.start()].matches('\n').count() + 1)
            .collect())
    }
}

impl fmt::Display for ProbeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.search_token())
    }
}

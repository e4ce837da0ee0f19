use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Report body written when every class matched
pub const SUCCESS_MARKER: &str = "Success!";

/// Outcome of checking one archive against a prefix list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub archive: PathBuf,
    pub prefixes: Vec<String>,
    /// Fully-qualified names matching no prefix, kept sorted
    pub non_matching: BTreeSet<String>,
    pub classes_checked: usize,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.non_matching.is_empty()
    }

    /// Text written to the report file (and to stderr on failure)
    pub fn render(&self) -> String {
        if self.passed() {
            return SUCCESS_MARKER.to_string();
        }

        let mut out = format!(
            "Failed to validate {}. Found classes that did not match expected prefixes [{}]:\n",
            self.archive.display(),
            self.prefixes.join(", ")
        );
        for name in &self.non_matching {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

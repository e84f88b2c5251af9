use std::io::Read;

use regex::Regex;
use tracing::debug;

use super::source::SourceTree;
use crate::error::{MockforgeError, Result};

const TEST_FILE_SUFFIX: &str = "_test.go";

/// Scans the package's Go files for exported methods declared against the
/// receiver type (by value or by pointer) and returns their raw signatures.
///
/// The result is lexicographically sorted and deduplicated, so downstream
/// stages see the same method list regardless of file enumeration order.
/// Per-file read failures are collected; if any file failed the aggregate
/// error is returned and no signatures are (fail-closed).
pub fn extract_signatures(
    tree: &dyn SourceTree,
    package: &str,
    type_name: &str,
) -> Result<Vec<String>> {
    let package_clause = Regex::new(&format!(r"(?m)^package\s+{}\b", regex::escape(package)))?;

    // Line-anchored: a declaration, a single receiver of the target type, an
    // exported name, then everything up to the opening brace.
    let signature = Regex::new(&format!(
        r"(?m)^func \([a-zA-Z][a-zA-Z0-9_]* \*?{}\) ([A-Z][a-zA-Z0-9_]*[^{{]*)\{{",
        regex::escape(type_name)
    ))?;

    let mut raw: Vec<String> = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for name in tree.list("*.go")? {
        if name.ends_with(TEST_FILE_SUFFIX) {
            continue;
        }

        let mut contents = String::new();
        let read = tree
            .open(&name)
            .and_then(|mut f| f.read_to_string(&mut contents));
        if let Err(e) = read {
            failures.push(format!("failed to process '{name}': {e}"));
            continue;
        }

        if !package_clause.is_match(&contents) {
            debug!(file = %name, "skipping file outside target package");
            continue;
        }

        for caps in signature.captures_iter(&contents) {
            raw.push(caps[1].trim().to_string());
        }
    }

    if !failures.is_empty() {
        return Err(MockforgeError::Extraction(failures));
    }

    raw.sort();
    raw.dedup();
    Ok(raw)
}

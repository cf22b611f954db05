// Public suffix list parsing

use crate::error::{AllowlistError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const WILDCARD_PREFIX: &str = "*.";

/// A multi-label PSL entry and the domain derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    suffix: String,
    root_domain: String,
}

impl Candidate {
    /// The entry exactly as listed, e.g. `*.hosted.app`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The entry with any wildcard marker removed, e.g. `hosted.app`.
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }
}

/// Parse public suffix list text into unique candidates.
///
/// Comments, exception rules and single-label suffixes are skipped. When two
/// entries share a root domain (case-insensitively) the first one is kept, and
/// the output follows first-seen order.
pub fn parse_psl(psl_text: &str) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for line in psl_text.lines() {
        let Some(candidate) = parse_line(line) else {
            continue;
        };

        if seen.insert(candidate.root_domain.to_lowercase()) {
            candidates.push(candidate);
        }
    }

    candidates
}

fn parse_line(line: &str) -> Option<Candidate> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") || line.starts_with('!') {
        return None;
    }

    // Only multi-label suffixes
    if !line.contains('.') {
        return None;
    }

    let root = line.strip_prefix(WILDCARD_PREFIX).unwrap_or(line);
    if root.contains(' ') || !root.contains('.') {
        return None;
    }

    Some(Candidate {
        suffix: line.to_string(),
        root_domain: root.to_string(),
    })
}

/// Read and parse a suffix list file.
pub fn load_psl(path: &Path) -> Result<Vec<Candidate>> {
    let content = fs::read_to_string(path).map_err(|source| AllowlistError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_psl(&content))
}

/// Lowercased root domains to probe, capped at `limit` when given.
pub fn select_roots(candidates: &[Candidate], limit: Option<usize>) -> Vec<String> {
    let take = limit.unwrap_or(candidates.len());
    candidates
        .iter()
        .take(take)
        .map(|c| c.root_domain.to_lowercase())
        .collect()
}

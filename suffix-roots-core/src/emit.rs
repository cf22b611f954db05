//! Allowlist normalization and output rendering.
//!
//! Every sink goes through the same normalization step, so the Rust module,
//! the JSON allowlist and the debug map always agree on how a domain is
//! spelled.

use crate::error::{AllowlistError, Result};
use crate::probe::Allowlist;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const GENERATOR_NAME: &str = "generate_suffix_root_allowlist";
pub const CONST_NAME: &str = "ALWAYS_NAVIGATE_SUFFIX_ROOTS";

/// How domains are spelled in the emitted artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// IDNA ASCII (punycode), lowercased.
    #[default]
    IdnaAscii,
    /// Lowercase only; Unicode labels are kept as-is.
    Lowercase,
}

/// Destinations for each output sink. Unset paths are skipped.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub rust_out: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
    pub debug_out: Option<PathBuf>,
}

impl OutputPaths {
    /// The debug map alone is not a usable result.
    pub fn validate(&self) -> Result<()> {
        if self.rust_out.is_none() && self.json_out.is_none() {
            return Err(AllowlistError::NoOutputRequested);
        }
        Ok(())
    }
}

pub fn normalize_domain(domain: &str, normalization: Normalization) -> String {
    match normalization {
        Normalization::IdnaAscii => match idna::domain_to_ascii(domain) {
            Ok(ascii) => ascii.to_lowercase(),
            Err(e) => {
                warn!("IDNA conversion failed for {}: {:?}", domain, e);
                domain.to_lowercase()
            }
        },
        Normalization::Lowercase => domain.to_lowercase(),
    }
}

pub fn normalize_domains<'a, I>(domains: I, normalization: Normalization) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    domains
        .into_iter()
        .map(|d| normalize_domain(d, normalization))
        .collect()
}

pub fn render_rust_module(domains: &BTreeSet<String>, normalization: Normalization) -> String {
    let mut module = String::new();
    module.push_str(&format!("// @generated by {}\n", GENERATOR_NAME));
    module.push_str("// Do not edit by hand.\n\n");
    module.push_str(&format!("pub const {}: &[&str] = &[\n", CONST_NAME));
    for domain in normalize_domains(domains, normalization) {
        module.push_str(&format!("    {:?},\n", domain));
    }
    module.push_str("];\n");
    module
}

pub fn render_json_allowlist(
    domains: &BTreeSet<String>,
    normalization: Normalization,
) -> Result<String> {
    let sorted: Vec<String> = normalize_domains(domains, normalization)
        .into_iter()
        .collect();
    let mut json = serde_json::to_string_pretty(&sorted)?;
    json.push('\n');
    Ok(json)
}

pub fn render_debug_map(
    debug: &BTreeMap<String, String>,
    normalization: Normalization,
) -> Result<String> {
    // Spellings that normalize to the same key keep every message.
    let mut normalized: BTreeMap<String, String> = BTreeMap::new();
    for (domain, message) in debug {
        normalized
            .entry(normalize_domain(domain, normalization))
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(message);
            })
            .or_insert_with(|| message.clone());
    }
    let mut json = serde_json::to_string_pretty(&normalized)?;
    json.push('\n');
    Ok(json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| AllowlistError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every requested sink and return the paths written, in order.
pub fn write_outputs(
    allowlist: &Allowlist,
    paths: &OutputPaths,
    normalization: Normalization,
) -> Result<Vec<PathBuf>> {
    paths.validate()?;
    let mut written = Vec::new();

    if let Some(ref path) = paths.json_out {
        write_file(path, &render_json_allowlist(&allowlist.domains, normalization)?)?;
        info!("Wrote JSON allowlist to {}", path.display());
        written.push(path.clone());
    }

    if let Some(ref path) = paths.debug_out {
        write_file(path, &render_debug_map(&allowlist.debug, normalization)?)?;
        info!("Wrote debug info to {}", path.display());
        written.push(path.clone());
    }

    if let Some(ref path) = paths.rust_out {
        write_file(path, &render_rust_module(&allowlist.domains, normalization))?;
        info!("Wrote Rust allowlist to {}", path.display());
        written.push(path.clone());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(domains: &[&str]) -> BTreeSet<String> {
        domains.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_normalize_domain_idna() {
        assert_eq!(
            normalize_domain("müller.de", Normalization::IdnaAscii),
            "xn--mller-kva.de"
        );
        assert_eq!(
            normalize_domain("BlogSpot.COM", Normalization::IdnaAscii),
            "blogspot.com"
        );
    }

    #[test]
    fn test_normalize_domain_falls_back_to_lowercase_on_idna_error() {
        assert!(idna::domain_to_ascii("XN--ZZ.Com").is_err());
        assert_eq!(
            normalize_domain("XN--ZZ.Com", Normalization::IdnaAscii),
            "xn--zz.com"
        );
    }

    #[test]
    fn test_render_debug_map_keeps_colliding_messages() {
        let debug: BTreeMap<String, String> = [
            ("müller.de".to_string(), "m1".to_string()),
            ("xn--mller-kva.de".to_string(), "m2".to_string()),
        ]
        .into_iter()
        .collect();

        let json = render_debug_map(&debug, Normalization::IdnaAscii).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["xn--mller-kva.de"], "m1; m2");

        let json = render_debug_map(&debug, Normalization::Lowercase).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_normalize_domain_lowercase_keeps_unicode() {
        assert_eq!(
            normalize_domain("Müller.DE", Normalization::Lowercase),
            "müller.de"
        );
    }

    #[test]
    fn test_normalize_domains_dedups_after_normalizing() {
        let normalized = normalize_domains(
            &set(&["Example.com", "example.com", "b.org"]),
            Normalization::IdnaAscii,
        );
        assert_eq!(
            normalized.into_iter().collect::<Vec<_>>(),
            vec!["b.org", "example.com"]
        );
    }

    #[test]
    fn test_render_rust_module_layout() {
        let module = render_rust_module(
            &set(&["github.io", "blogspot.com"]),
            Normalization::IdnaAscii,
        );
        assert_eq!(
            module,
            "// @generated by generate_suffix_root_allowlist\n\
             // Do not edit by hand.\n\
             \n\
             pub const ALWAYS_NAVIGATE_SUFFIX_ROOTS: &[&str] = &[\n    \
             \"blogspot.com\",\n    \
             \"github.io\",\n\
             ];\n"
        );
    }

    #[test]
    fn test_render_rust_module_empty() {
        let module = render_rust_module(&BTreeSet::new(), Normalization::IdnaAscii);
        assert!(module.ends_with("&[\n];\n"));
    }

    #[test]
    fn test_output_paths_require_a_primary_sink() {
        let debug_only = OutputPaths {
            debug_out: Some(PathBuf::from("debug.json")),
            ..Default::default()
        };
        assert!(matches!(
            debug_only.validate(),
            Err(AllowlistError::NoOutputRequested)
        ));

        let json = OutputPaths {
            json_out: Some(PathBuf::from("allowlist.json")),
            ..Default::default()
        };
        assert!(json.validate().is_ok());
    }
}

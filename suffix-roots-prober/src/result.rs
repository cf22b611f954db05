use serde::{Deserialize, Serialize};

/// Outcome of probing a single domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub domain: String,
    pub is_html: bool,
    pub message: Option<String>,
}

impl ProbeResult {
    pub fn html(domain: String, message: String) -> Self {
        Self {
            domain,
            is_html: true,
            message: Some(message),
        }
    }

    pub fn not_html(domain: String, message: String) -> Self {
        Self {
            domain,
            is_html: false,
            message: Some(message),
        }
    }
}

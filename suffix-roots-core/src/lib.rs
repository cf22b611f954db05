pub mod config;
pub mod emit;
pub mod error;
pub mod probe;
pub mod psl;

pub use error::AllowlistError;
pub use probe::Allowlist;
pub use psl::Candidate;

pub mod config;
pub mod error;
pub mod prober;
pub mod result;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use prober::{Prober, looks_like_html};
pub use result::ProbeResult;

pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{GenerateArgs, GenerateSummary, generate_args_from_matches, handle_generate};

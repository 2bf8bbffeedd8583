//! CLI commands

mod classify;
mod completions;
mod init;
mod scan;
mod sign;

pub use classify::ClassifyCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use scan::ScanCommand;
pub use sign::SignCommand;

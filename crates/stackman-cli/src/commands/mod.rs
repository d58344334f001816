//! Command implementations.

mod pull;
mod push;
mod split;
mod unite;

pub use pull::PullCommand;
pub use push::PushCommand;
pub use split::SplitCommand;
pub use unite::UniteCommand;

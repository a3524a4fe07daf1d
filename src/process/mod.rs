//! Process module - Child processes behind the indicator's runners

mod launch;
mod query;
mod upgrade;

pub use launch::CommandUrlLauncher;
pub use query::ShellQuery;
pub use upgrade::TerminalUpgrade;

pub mod args;
pub mod completions;
pub mod list;
pub mod vars;

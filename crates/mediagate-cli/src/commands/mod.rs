pub mod assets;
pub mod common;
pub mod completions;
pub mod inspect;
pub mod resolve;
pub mod rewrite_rules;

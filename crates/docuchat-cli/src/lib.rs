//! Terminal chat UI for docuchat

mod ui;

pub use ui::{display_banner, handle_input_with_history, print_help};

// Re-export core types
pub use docuchat_core::{Error, Result};

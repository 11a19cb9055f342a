//! ReAct agent loop and chat session for docuchat
//!
//! The executor drives a plain-text Thought / Action / Observation loop
//! over a `ChatModel`, with tools dispatched through an explicit registry.
//! `ChatSession` owns the message history and feeds each user turn through
//! the executor.

mod executor;
mod parser;
mod prompt;
mod session;
mod tool;

pub use executor::{AgentExecutor, AgentOutcome};
pub use parser::{AgentStep, ParseError};
pub use prompt::ReactPrompt;
pub use session::ChatSession;
pub use tool::{RetrieveTool, Tool, ToolRegistry};

// Re-export core types for convenience
pub use docuchat_core::{ChatHistory, ChatMessage, ChatModel, Error, GenerationConfig, Result};

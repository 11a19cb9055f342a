//! Chat session state

use docuchat_core::{ChatHistory, ChatMessage, Result};

use crate::executor::{AgentExecutor, AgentOutcome};

/// An explicit, session-scoped conversation: the seed System message plus
/// every Human/Ai turn, windowed by `ChatHistory`. One of these exists per
/// interactive session; dropping it is the teardown.
pub struct ChatSession {
    executor: AgentExecutor,
    history: ChatHistory,
}

impl ChatSession {
    pub const DEFAULT_SYSTEM_PROMPT: &'static str =
        "You are a helpful, expert RAG assistant. Use the 'retrieve' tool to \
         find information before answering, if necessary.";

    pub fn new(executor: AgentExecutor) -> Self {
        Self {
            executor,
            history: ChatHistory::with_system(Self::DEFAULT_SYSTEM_PROMPT),
        }
    }

    pub fn with_history(mut self, history: ChatHistory) -> Self {
        self.history = history;
        self
    }

    /// Process one user turn: append the Human message, run the agent with
    /// the full (windowed) history, append and return the Ai answer.
    pub async fn ask(&mut self, input: &str) -> Result<AgentOutcome> {
        self.history.push(ChatMessage::Human(input.to_string()));
        let outcome = self.executor.run(input, &self.history).await?;
        self.history.push(ChatMessage::Ai(outcome.answer.clone()));
        Ok(outcome)
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }
}

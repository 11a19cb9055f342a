//! ReAct prompt template

use docuchat_core::ChatHistory;

use crate::tool::ToolRegistry;

/// Renders the ReAct prompt: available tools, the expected
/// Thought/Action/Observation format, the chat history, the question, and
/// the scratchpad of steps taken so far.
pub struct ReactPrompt;

impl ReactPrompt {
    /// Stop sequence handed to the model so it halts before inventing its
    /// own Observation line.
    pub const STOP_SEQUENCE: &'static str = "\nObservation:";

    pub fn render(
        tools: &ToolRegistry,
        history: &ChatHistory,
        input: &str,
        scratchpad: &str,
    ) -> String {
        format!(
            "Answer the following questions as best you can. You have access to the following tools:\n\
            \n\
            {tools}\n\
            \n\
            Use the following format:\n\
            \n\
            Question: the input question you must answer\n\
            Thought: you should always think about what to do\n\
            Action: the action to take, should be one of [{tool_names}]\n\
            Action Input: the input to the action\n\
            Observation: the result of the action\n\
            ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
            Thought: I now know the final answer\n\
            Final Answer: the final answer to the original input question\n\
            \n\
            Chat History:\n\
            {chat_history}\n\
            \n\
            Begin!\n\
            \n\
            Question: {input}\n\
            Thought:{scratchpad}",
            tools = tools.render_descriptions(),
            tool_names = tools.render_names(),
            chat_history = history.as_transcript(),
            input = input,
            scratchpad = scratchpad,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{Tool, ToolRegistry};
    use async_trait::async_trait;
    use docuchat_core::Result;

    struct DummyTool;

    #[async_trait]
    impl Tool for DummyTool {
        fn name(&self) -> &str {
            "retrieve"
        }

        fn description(&self) -> &str {
            "Retrieve information related to a query."
        }

        async fn call(&self, _input: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_prompt_contains_tools_history_and_question() {
        let mut registry = ToolRegistry::new();
        registry.register(std::sync::Arc::new(DummyTool));
        let history = ChatHistory::with_system("You are a helpful assistant.");

        let prompt = ReactPrompt::render(&registry, &history, "how many holidays?", "");
        assert!(prompt.contains("retrieve: Retrieve information related to a query."));
        assert!(prompt.contains("should be one of [retrieve]"));
        assert!(prompt.contains("system: You are a helpful assistant."));
        assert!(prompt.ends_with("Question: how many holidays?\nThought:"));
    }

    #[test]
    fn test_scratchpad_appended_after_thought() {
        let registry = ToolRegistry::new();
        let history = ChatHistory::with_system("s");
        let prompt = ReactPrompt::render(
            &registry,
            &history,
            "q",
            " I should look this up.\nAction: retrieve\nAction Input: q\nObservation: nothing\nThought:",
        );
        assert!(prompt.contains("Observation: nothing\nThought:"));
    }
}

//! Bounded ReAct agent executor

use std::sync::Arc;

use docuchat_core::{ChatHistory, ChatModel, GenerationConfig, Result};

use crate::parser::{parse_step, AgentStep};
use crate::prompt::ReactPrompt;
use crate::tool::ToolRegistry;

/// What a completed agent run produced.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub answer: String,
    /// Number of successful tool invocations. Tool use is advisory; zero is
    /// a perfectly good outcome.
    pub tool_calls: usize,
    pub steps: usize,
}

/// Drives the Thought / Action / Observation loop.
///
/// Each step renders the full prompt (history, question, scratchpad),
/// generates with the observation stop sequence, and parses the result.
/// Malformed output and unknown tool names become corrective observations
/// rather than failures; only model/tool transport errors abort the run.
/// Reaching the step limit is a forced stop with a fixed answer, not an
/// error.
pub struct AgentExecutor {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    generation: GenerationConfig,
    max_steps: usize,
}

impl AgentExecutor {
    pub const DEFAULT_MAX_STEPS: usize = 5;
    pub const STEP_LIMIT_ANSWER: &'static str =
        "I could not reach an answer within the allowed number of reasoning steps.";

    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry) -> Self {
        let generation = GenerationConfig {
            stop_sequences: vec![ReactPrompt::STOP_SEQUENCE.to_string()],
            ..Default::default()
        };
        Self {
            model,
            tools,
            generation,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_generation_config(mut self, mut config: GenerationConfig) -> Self {
        let stop = ReactPrompt::STOP_SEQUENCE.to_string();
        if !config.stop_sequences.contains(&stop) {
            config.stop_sequences.push(stop);
        }
        self.generation = config;
        self
    }

    /// Answer `input` given the session history.
    pub async fn run(&self, input: &str, history: &ChatHistory) -> Result<AgentOutcome> {
        let mut scratchpad = String::new();
        let mut tool_calls = 0;

        for step in 1..=self.max_steps {
            let prompt = ReactPrompt::render(&self.tools, history, input, &scratchpad);
            let output = self.model.generate(&prompt, &self.generation).await?;
            tracing::debug!(step, output = output.as_str(), "agent step");

            match parse_step(&output) {
                Ok(AgentStep::Finish { answer }) => {
                    return Ok(AgentOutcome {
                        answer,
                        tool_calls,
                        steps: step,
                    });
                }
                Ok(AgentStep::Act { tool, input: tool_input }) => {
                    let observation = match self.tools.get(&tool) {
                        Some(tool_impl) => {
                            tool_calls += 1;
                            let result = tool_impl.call(&tool_input).await?;
                            if result.is_empty() {
                                "No matching documents were found.".to_string()
                            } else {
                                result
                            }
                        }
                        None => format!(
                            "Error: unknown tool '{}'. Available tools: [{}].",
                            tool,
                            self.tools.render_names()
                        ),
                    };
                    Self::append_observation(&mut scratchpad, &output, &observation);
                }
                Err(parse_error) => {
                    tracing::debug!(correction = parse_error.correction.as_str(), "parse recovery");
                    Self::append_observation(&mut scratchpad, &output, &parse_error.correction);
                }
            }
        }

        Ok(AgentOutcome {
            answer: Self::STEP_LIMIT_ANSWER.to_string(),
            tool_calls,
            steps: self.max_steps,
        })
    }

    fn append_observation(scratchpad: &mut String, output: &str, observation: &str) {
        scratchpad.push_str(output.trim_end());
        scratchpad.push_str("\nObservation: ");
        scratchpad.push_str(observation);
        scratchpad.push_str("\nThought:");
    }
}

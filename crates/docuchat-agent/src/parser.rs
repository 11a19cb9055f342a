//! Parser for model output in the ReAct format

use regex::Regex;
use std::sync::OnceLock;

/// A parsed reasoning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    /// The model wants to invoke a tool.
    Act { tool: String, input: String },
    /// The model produced its final answer.
    Finish { answer: String },
}

/// Model output that fits neither an action nor a final answer. Carries a
/// corrective message that is fed back to the model as an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub correction: String,
}

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*:\s*(?P<tool>[^\n]+)\nAction\s+Input\s*:\s*(?P<input>.*)")
            .expect("action regex is valid")
    })
}

/// Parse one generation into a step.
///
/// A `Final Answer:` marker wins over an action if both appear: by the time
/// the model writes a final answer it is done acting. Everything else is a
/// `ParseError` with a corrective observation, never a session abort.
pub fn parse_step(output: &str) -> Result<AgentStep, ParseError> {
    if let Some(idx) = output.find("Final Answer:") {
        let answer = output[idx + "Final Answer:".len()..].trim().to_string();
        return Ok(AgentStep::Finish { answer });
    }

    if let Some(captures) = action_regex().captures(output) {
        let tool = captures["tool"].trim().to_string();
        // The input runs until the model's next format marker, if any.
        let raw_input = &captures["input"];
        let input = raw_input
            .split("\nThought:")
            .next()
            .unwrap_or(raw_input)
            .trim()
            .to_string();

        if tool.is_empty() {
            return Err(ParseError {
                correction: "The Action line was empty. Name exactly one tool after 'Action:'."
                    .to_string(),
            });
        }

        return Ok(AgentStep::Act { tool, input });
    }

    Err(ParseError {
        correction: "Invalid format. Either provide 'Action: <tool>' followed by \
                     'Action Input: <input>', or finish with 'Final Answer: <answer>'."
            .to_string(),
    })
}

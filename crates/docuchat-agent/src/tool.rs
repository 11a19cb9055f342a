//! Tool trait, registry, and the retrieval tool

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use docuchat_core::Result;
use docuchat_rag::Retriever;

/// A named capability the agent may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// One-line description rendered into the prompt.
    fn description(&self) -> &str;

    async fn call(&self, input: &str) -> Result<String>;
}

/// Explicit name -> tool mapping.
///
/// Dispatch always goes through `get`; an unknown name is a structured
/// error path for the executor, never a fuzzy match. BTreeMap keeps the
/// rendered tool list in a stable order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// `name: description` lines for the prompt's tool section.
    pub fn render_descriptions(&self) -> String {
        self.tools
            .values()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-separated tool names for the prompt's format section.
    pub fn render_names(&self) -> String {
        self.tools.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// The single retrieval tool: wraps the query-time retriever.
pub struct RetrieveTool {
    retriever: Retriever,
}

impl RetrieveTool {
    pub const NAME: &'static str = "retrieve";

    pub fn new(retriever: Retriever) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for RetrieveTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Retrieve information related to a query. Use this tool ONLY when you \
         need external context to answer the user's question."
    }

    async fn call(&self, input: &str) -> Result<String> {
        self.retriever.retrieve(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input."
        }

        async fn call(&self, input: &str) -> Result<String> {
            Ok(input.to_string())
        }
    }

    #[tokio::test]
    async fn test_registry_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let tool = registry.get("echo").expect("registered tool");
        assert_eq!(tool.call("hello").await.unwrap(), "hello");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_rendered_sections() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.render_names(), "echo");
        assert_eq!(registry.render_descriptions(), "echo: Echo the input.");
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use docuchat_agent::{AgentExecutor, ChatSession, RetrieveTool, ToolRegistry};
use docuchat_cli::{display_banner, handle_input_with_history, print_help};
use docuchat_ollama::OllamaClient;
use docuchat_rag::{
    DirectoryLoader, IngestPipeline, LoaderConfig, Retriever, SupabaseVectorStore, TextSplitter,
};
use docuchat_web::AppState;

#[derive(Parser)]
#[command(name = "docuchat")]
#[command(about = "Agentic RAG chat assistant over a folder of documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, chunk, embed, and store documents from a directory
    Ingest {
        /// Directory containing .pdf/.txt/.md documents
        #[arg(default_value = "documents")]
        dir: PathBuf,

        /// Only ingest the first N documents
        #[arg(short, long)]
        limit: Option<usize>,

        /// Maximum chunk size in characters
        #[arg(long, default_value_t = TextSplitter::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Characters shared between adjacent chunks
        #[arg(long, default_value_t = TextSplitter::DEFAULT_CHUNK_OVERLAP)]
        chunk_overlap: usize,

        /// Abort the whole load on the first unreadable file
        #[arg(long)]
        strict: bool,
    },

    /// Start an interactive chat session against the ingested documents
    Chat {
        /// Number of chunks the retrieve tool returns
        #[arg(long, default_value_t = Retriever::DEFAULT_TOP_K)]
        top_k: usize,

        /// Maximum reasoning steps per question
        #[arg(long, default_value_t = AgentExecutor::DEFAULT_MAX_STEPS)]
        max_steps: usize,
    },

    /// Run the demo web server (mock search, uploads, static frontend)
    Serve {
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        #[arg(long, default_value = "frontend")]
        frontend_dir: PathBuf,

        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest {
            dir,
            limit,
            chunk_size,
            chunk_overlap,
            strict,
        } => {
            init_tracing("info");
            ingest(dir, limit, chunk_size, chunk_overlap, strict).await
        }
        Command::Chat { top_k, max_steps } => {
            // Keep the interactive surface quiet unless asked otherwise.
            init_tracing("warn");
            chat(top_k, max_steps).await
        }
        Command::Serve {
            port,
            frontend_dir,
            upload_dir,
        } => {
            init_tracing("info");
            serve(port, frontend_dir, upload_dir).await
        }
    }
}

fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

async fn ingest(
    dir: PathBuf,
    limit: Option<usize>,
    chunk_size: usize,
    chunk_overlap: usize,
    strict: bool,
) -> Result<()> {
    let ollama = OllamaClient::from_env()?;
    ollama.ping().await?;
    let embedding_dim = ollama.config().embedding_dim;

    let store = Arc::new(SupabaseVectorStore::from_env()?);
    let loader = DirectoryLoader::with_config(LoaderConfig {
        skip_unreadable: !strict,
        limit,
    });
    let splitter = TextSplitter::new(chunk_size, chunk_overlap)?;

    let pipeline = IngestPipeline::new(loader, splitter, Arc::new(ollama), store, embedding_dim)?;

    println!("{} Ingesting documents from {}...", "📚".blue(), dir.display());
    let report = pipeline.run(&dir).await?;

    println!(
        "{} {} documents loaded, {} chunks indexed, {} failed",
        "✅".green(),
        report.documents_loaded,
        report.chunks_indexed,
        report.chunks_failed
    );
    for error in &report.errors {
        println!("  {} {}", "•".yellow(), error);
    }

    Ok(())
}

async fn chat(top_k: usize, max_steps: usize) -> Result<()> {
    let ollama = Arc::new(OllamaClient::from_env()?);
    ollama.ping().await?;
    let store = Arc::new(SupabaseVectorStore::from_env()?);

    let retriever = Retriever::new(ollama.clone(), store).with_top_k(top_k);
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(RetrieveTool::new(retriever)));

    let executor = AgentExecutor::new(ollama, tools).with_max_steps(max_steps);
    let mut session = ChatSession::new(executor);

    display_banner();

    let mut history = Vec::new();
    loop {
        let input = handle_input_with_history(&mut history).await?;

        if input.is_empty() {
            continue;
        }

        let input_lower = input.to_lowercase();
        if input_lower == "exit" || input_lower == "quit" {
            println!("{}", "👋 Goodbye!".green());
            break;
        }
        if input_lower == "help" {
            print_help();
            continue;
        }

        println!("{} Thinking...", "🤖".blue());
        match session.ask(&input).await {
            Ok(outcome) => {
                println!("{} {}", "→".green(), outcome.answer.bold());
                if outcome.tool_calls > 0 {
                    println!(
                        "{}",
                        format!("   (retrieved context {} time(s))", outcome.tool_calls).dimmed()
                    );
                }
            }
            Err(e) => {
                println!("{} {}", "❌".red(), e);
            }
        }
    }

    Ok(())
}

async fn serve(port: u16, frontend_dir: PathBuf, upload_dir: PathBuf) -> Result<()> {
    let state = Arc::new(AppState::new(frontend_dir, upload_dir));
    let app = docuchat_web::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "demo web server listening");
    println!("{} Demo server listening on http://{}", "🌐".blue(), addr);

    axum::serve(listener, app).await?;
    Ok(())
}

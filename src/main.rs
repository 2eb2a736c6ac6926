use agentfs::config::Config;
use agentfs::indexer::LogIndexer;
use agentfs::memory::{ChatMemoryStore, ChatMessage};
use agentfs::namespace::Namespace;
use agentfs::roles::UNKNOWN_OWNER;
use agentfs::tools;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "agentfs", version, about = "Sandboxed project folder and chat memory for agents")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Files(FileCommand),
    /// Inspect or edit persisted chat memory
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum FileCommand {
    /// Print the full project snapshot
    Tree,
    /// Print one file
    Read {
        /// Path relative to the project root
        path: String,
    },
    /// Create or overwrite a file
    Write {
        /// Path relative to the project root
        path: String,
        /// Content to write (omit when using --file)
        content: Option<String>,
        /// Read content from a local file instead. Use "-" for stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Owner the write is attributed to
        #[arg(long, default_value = UNKNOWN_OWNER)]
        owner: String,
    },
    /// Append to a file
    Append {
        path: String,
        content: String,
        #[arg(long, default_value = UNKNOWN_OWNER)]
        owner: String,
    },
    /// List the agent tool catalogue as JSON
    Tools,
}

#[derive(Subcommand, Debug)]
enum MemoryAction {
    /// List stored memory keys
    List,
    /// Print the messages stored under a key
    Show { key: String },
    /// Delete the messages stored under a key
    Clear { key: String },
    /// Append one message to a key, keeping the configured window
    Add {
        key: String,
        #[arg(long, value_enum, default_value_t = MessageRole::User)]
        role: MessageRole,
        text: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MessageRole {
    System,
    User,
    Ai,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let cli = Cli::parse();
    let cfg = Config::discover(cli.config.as_deref()).await?;
    info!(root = %cfg.root.display(), "configuration ready");

    match cli.command {
        Command::Memory { action } => run_memory(&cfg, action).await,
        Command::Files(command) => run_files(&cfg, command).await,
    }
}

async fn run_files(cfg: &Config, command: FileCommand) -> anyhow::Result<()> {
    let ns = Namespace::open_with_ignore_file(&cfg.root, &cfg.ignore_file)
        .with_context(|| format!("cannot open project folder {}", cfg.root.display()))?
        .with_indexer(Arc::new(LogIndexer));
    tools::init();

    let output = match command {
        FileCommand::Tree => tools::call_tool("list_project_files", &ns, json!({}), UNKNOWN_OWNER).await,
        FileCommand::Read { path } => {
            tools::call_tool("read_file", &ns, json!({ "path": path }), UNKNOWN_OWNER).await
        }
        FileCommand::Write {
            path,
            content,
            file,
            owner,
        } => {
            let content = match (content, file) {
                (_, Some(f)) if f.as_os_str() == "-" => {
                    use std::io::Read;
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    Some(buf)
                }
                (_, Some(f)) => Some(
                    tokio::fs::read_to_string(&f)
                        .await
                        .with_context(|| format!("failed to read {}", f.display()))?,
                ),
                (content, None) => content,
            };
            tools::call_tool("write_file", &ns, json!({ "path": path, "content": content }), &owner).await
        }
        FileCommand::Append {
            path,
            content,
            owner,
        } => {
            tools::call_tool("append_to_file", &ns, json!({ "path": path, "content": content }), &owner)
                .await
        }
        FileCommand::Tools => serde_json::to_string_pretty(&tools::list_tools())?,
    };

    println!("{output}");
    Ok(())
}

async fn run_memory(cfg: &Config, action: MemoryAction) -> anyhow::Result<()> {
    let store = Arc::new(ChatMemoryStore::open(cfg.memory_path())?);

    match action {
        MemoryAction::List => {
            for key in store.keys().await? {
                println!("{key}");
            }
        }
        MemoryAction::Show { key } => {
            let messages = store.get(Some(&key)).await?;
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        MemoryAction::Clear { key } => {
            store.delete(Some(&key)).await?;
            println!("Memory '{key}' cleared.");
        }
        MemoryAction::Add { key, role, text } => {
            let message = match role {
                MessageRole::System => ChatMessage::system(text),
                MessageRole::User => ChatMessage::user(text),
                MessageRole::Ai => ChatMessage::ai(text),
            };
            let memory = agentfs::ChatMemory::new(key, cfg.max_messages, store);
            memory.add(message).await?;
            println!("{} message(s) in memory '{}'.", memory.messages().await?.len(), memory.id());
        }
    }
    Ok(())
}

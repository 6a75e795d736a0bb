//! AgenticContext MCP Server: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use agentic_context::ContextConfig;
use agentic_context_mcp::catalog::{build_dispatcher, build_registry};
use agentic_context_mcp::config::resolve_timeout;
use agentic_context_mcp::protocol::ProtocolHandler;
use agentic_context_mcp::transport::StdioTransport;
use agentic_context_mcp::types::{
    PromptDefinition, ResourceDefinition, ResourceTemplateDefinition, ToolDefinition,
};

#[derive(Parser)]
#[command(
    name = "agentic-context-mcp",
    about = "MCP server for AgenticContext: tools, resources and prompts for AI clients",
    version
)]
struct Cli {
    /// Per-handler execution bound in milliseconds.
    /// Also reads from ACTX_TIMEOUT_MS env var.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP.
    #[cfg(feature = "sse")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = agentic_context_mcp::config::DEFAULT_ADDR)]
        addr: String,

        /// Bearer token for authentication.
        /// Also reads from AGENTIC_TOKEN env var.
        #[arg(long)]
        token: Option<String>,
    },

    /// Build the catalog and report what would be served.
    Validate,

    /// Print server capabilities and catalog as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   agentic-context-mcp completions bash > ~/.local/share/bash-completion/completions/agentic-context-mcp
    ///   agentic-context-mcp completions zsh > ~/.zfunc/_agentic-context-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ContextConfig::with_timeout(resolve_timeout(cli.timeout_ms));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let dispatcher = build_dispatcher(config)?;
            let handler = ProtocolHandler::new(dispatcher);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "sse")]
        Commands::ServeHttp { addr, token } => {
            use agentic_context_mcp::config::resolve_token;
            use agentic_context_mcp::transport::SseTransport;

            let effective_token = resolve_token(token.as_deref());
            let dispatcher = build_dispatcher(config)?;

            tracing::info!("AgenticContext MCP server");
            tracing::info!(
                "Handler timeout: {}ms",
                config.handler_timeout.as_millis()
            );
            if effective_token.is_some() {
                tracing::info!("Auth: bearer token required");
            }

            let transport = SseTransport::with_token(ProtocolHandler::new(dispatcher), effective_token);
            transport.run(&addr).await?;
        }

        Commands::Validate => match build_registry() {
            Ok(registry) => {
                println!("Catalog is valid");
                println!("  Tools: {}", registry.tool_count());
                println!("  Resources: {}", registry.resource_count());
                println!("  Prompts: {}", registry.prompt_count());
            }
            Err(e) => {
                eprintln!("Invalid catalog: {e}");
                std::process::exit(1);
            }
        },

        Commands::Info => {
            let capabilities = agentic_context_mcp::types::InitializeResult::default_result();
            let registry = build_registry()?;
            let resources = registry.resource_infos();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "handler_timeout_ms": config.handler_timeout.as_millis() as u64,
                "tools": registry.tool_infos().iter().map(ToolDefinition::from).collect::<Vec<_>>(),
                "resources": resources
                    .iter()
                    .filter(|r| !r.templated)
                    .map(ResourceDefinition::from)
                    .collect::<Vec<_>>(),
                "resource_templates": resources
                    .iter()
                    .filter(|r| r.templated)
                    .map(ResourceTemplateDefinition::from)
                    .collect::<Vec<_>>(),
                "prompts": registry.prompt_infos().iter().map(PromptDefinition::from).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "agentic-context-mcp",
                &mut std::io::stdout(),
            );
        }

        Commands::Repl => {
            let dispatcher = build_dispatcher(config)?;
            let handle = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || agentic_context_mcp::repl::run(dispatcher, handle))
                .await??;
        }
    }

    Ok(())
}

use std::process;
mod cli;
mod completions;
mod datasets;
mod error;
mod exit_codes;
mod logging;
mod notes;
mod runtime;

use clap::CommandFactory;
use cli::{Cli, Commands};
use error::{handle_cli_result, CliResult};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use runtime::Tools;

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse_args();

    // Fast path for help - avoid expensive initialization
    let Some(command) = cli.command.take() else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
            process::exit(EXIT_ERROR);
        }
        process::exit(EXIT_SUCCESS);
    };

    use is_terminal::IsTerminal;
    let is_mcp_mode = matches!(command, Commands::Serve) && !std::io::stdin().is_terminal();
    init_logging(&cli, is_mcp_mode);

    let exit_code = handle_cli_result(run_command(command, &cli).await);
    process::exit(exit_code);
}

fn init_logging(cli: &Cli, is_mcp_mode: bool) {
    use tracing::Level;

    let log_level = if is_mcp_mode {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::TRACE
    } else {
        Level::WARN
    };

    if is_mcp_mode {
        if let Some(guard) = open_mcp_log() {
            tracing_subscriber::fmt()
                .with_writer(move || guard.clone())
                .with_max_level(log_level)
                .with_ansi(false)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .init();
}

/// Open `~/.notegate/<NOTEGATE_LOG_FILE or mcp.log>` for appending
fn open_mcp_log() -> Option<logging::FileWriterGuard> {
    use std::sync::{Arc, Mutex};

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".notegate"))
        .unwrap_or_else(|| std::path::PathBuf::from(".notegate"));

    // No subscriber is installed yet, so report to stderr directly
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory {}: {e}", log_dir.display());
        return None;
    }

    let log_filename =
        std::env::var("NOTEGATE_LOG_FILE").unwrap_or_else(|_| "mcp.log".to_string());
    let log_file = log_dir.join(log_filename);

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
    {
        Ok(file) => Some(logging::FileWriterGuard::new(Arc::new(Mutex::new(file)))),
        Err(e) => {
            eprintln!("Failed to open log file {}, using stderr: {e}", log_file.display());
            None
        }
    }
}

async fn run_command(command: Commands, cli: &Cli) -> CliResult<i32> {
    let config = runtime::load_config(cli.config.as_deref(), cli.dataset.as_deref())?;

    match command {
        Commands::Serve => {
            tracing::info!("Starting MCP server");
            run_server(&config).await
        }
        Commands::Datasets { subcommand } => {
            let tools = Tools::from_config(&config)?;
            datasets::run_datasets_command(&tools, subcommand)
        }
        Commands::Search {
            query,
            note_type,
            limit,
            snippet_length,
        } => {
            let tools = Tools::from_config(&config)?;
            notes::run_search(&tools, query, note_type, limit, snippet_length).await
        }
        Commands::Get {
            note_id,
            max_length,
        } => {
            let tools = Tools::from_config(&config)?;
            notes::run_get(&tools, note_id, max_length).await
        }
        Commands::Notes {
            subject_id,
            note_type,
            limit,
        } => {
            let tools = Tools::from_config(&config)?;
            notes::run_notes(&tools, subject_id, note_type, limit).await
        }
        Commands::Completion { shell } => {
            completions::print_completion(shell);
            Ok(EXIT_SUCCESS)
        }
    }
}

async fn run_server(config: &notegate::Config) -> CliResult<i32> {
    use error::IntoCliResult;
    use notegate::mcp::McpServer;
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    let server = McpServer::new(config).cli_critical_error()?;
    tracing::info!(
        "MCP server created with {} tools, active dataset: {}",
        server.tool_names().len(),
        server.tool_context.datasets.active_name()
    );

    let ct = CancellationToken::new();
    let ct_clone = ct.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
        }
        ct_clone.cancel();
    });

    let running = serve_server(server, stdio()).await.map_err(|e| {
        error::CliError::new(format!("MCP server error: {e}"), exit_codes::EXIT_WARNING)
    })?;
    tracing::info!("MCP server started successfully");

    tokio::select! {
        quit = running.waiting() => match quit {
            Ok(reason) => tracing::info!("MCP server stopped: {:?}", reason),
            Err(e) => tracing::error!("MCP server task failed: {}", e),
        },
        _ = ct.cancelled() => tracing::info!("MCP server cancelled"),
    }

    Ok(EXIT_SUCCESS)
}

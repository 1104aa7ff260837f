use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "notegate")]
#[command(version)]
#[command(about = "Capability-gated clinical note search for LLM agents")]
#[command(long_about = "
notegate exposes clinical note corpora and their companion tabular data to
LLM agents through an MCP (Model Context Protocol) server. Every tool declares
the modalities it needs and is refused, with an explanation, when the active
dataset does not provide them.

Example usage:
  notegate serve                                   # Run as MCP server
  notegate datasets list                           # Show configured datasets
  notegate --dataset mimic-iv-note search sepsis   # Search notes from the shell
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Dataset to activate instead of the configured one
    #[arg(long, global = true, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Configuration file to load instead of the discovered notegate.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs notegate as an MCP server on stdin/stdout. The server exposes the note
tools (search_notes, get_note, list_patient_notes), the tabular tools
(get_database_schema, get_table_info, execute_query) and dataset management
(list_datasets, set_dataset).

Logs are written to ~/.notegate/mcp.log so they never interleave with the
protocol stream.

Example:
  notegate serve
  notegate --dataset mimic-iv-note serve
")]
    Serve,
    /// Inspect configured datasets
    Datasets {
        #[command(subcommand)]
        subcommand: DatasetsSubcommand,
    },
    /// Search note text for a keyword
    #[command(long_about = "
Case-insensitive keyword search across note tables. Each match is shown as a
snippet centred on the first occurrence of the query.

Examples:
  notegate --dataset mimic-iv-note search pneumonia
  notegate --dataset mimic-iv-note search \"chest pain\" --note-type radiology --limit 3
")]
    Search {
        /// Search term (case-insensitive substring)
        query: String,

        /// 'discharge', 'radiology', or 'all'
        #[arg(long, default_value = "all")]
        note_type: String,

        /// Maximum results per note type
        #[arg(long, default_value_t = 5)]
        limit: usize,

        /// Characters of context around each match
        #[arg(long, default_value_t = 300)]
        snippet_length: usize,
    },
    /// Print one note by identifier
    Get {
        /// Note identifier, e.g. 10000032-DS-21
        note_id: String,

        /// Truncate the note text to this many characters
        #[arg(long)]
        max_length: Option<usize>,
    },
    /// List the notes of one patient
    Notes {
        /// Patient identifier
        subject_id: i64,

        /// 'discharge', 'radiology', or 'all'
        #[arg(long, default_value = "all")]
        note_type: String,

        /// Maximum notes per note type
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate shell completion scripts
    #[command(long_about = "
Generates shell completion scripts for notegate.

Examples:
  notegate completion bash > ~/.local/share/bash-completion/completions/notegate
  notegate completion zsh > ~/.zfunc/_notegate
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum DatasetsSubcommand {
    /// List datasets with their modalities and database status
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show which tools each dataset supports
    Tools,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[allow(dead_code)]
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }
}

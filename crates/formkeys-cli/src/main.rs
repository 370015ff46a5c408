mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::normalize::NormalizeOptions;
use commands::{EXIT_FAILURE, EXIT_INPUT_ERROR, EXIT_SCHEMA_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "formkeys",
    version,
    about = "Rewrite bracket-less form keys to the bracket-suffixed names a schema declares"
)]
struct Cli {
    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a decoded request body against its schema.
    Normalize {
        /// Path to the JSON schema document.
        #[arg(long)]
        schema: PathBuf,
        /// JSON Pointer to the request-body schema inside the document.
        #[arg(long)]
        pointer: Option<String>,
        /// Content-Type header of the request (parameters are ignored).
        #[arg(long)]
        content_type: String,
        /// Path to a TOML config file with a [normalizer] table.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Maximum nesting depth to rewrite (overrides the config file).
        #[arg(long)]
        max_depth: Option<usize>,
        /// Print the result on a single line.
        #[arg(long, default_value_t = false)]
        compact: bool,
        /// Path to the decoded body as JSON; reads stdin when omitted or `-`.
        body: Option<PathBuf>,
    },
    /// List the bracket renames each object level of a schema licenses.
    Mappings {
        /// Path to the JSON schema document.
        #[arg(long)]
        schema: PathBuf,
        /// JSON Pointer to the request-body schema inside the document.
        #[arg(long)]
        pointer: Option<String>,
        /// Output results as structured JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FORMKEYS_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Normalize {
            schema,
            pointer,
            content_type,
            config,
            max_depth,
            compact,
            body,
        } => commands::normalize::run(&NormalizeOptions {
            schema: &schema,
            pointer: pointer.as_deref(),
            content_type: &content_type,
            body: body.as_deref(),
            config: config.as_deref(),
            max_depth,
            compact,
        }),
        Commands::Mappings {
            schema,
            pointer,
            json,
        } => commands::mappings::run(&schema, pointer.as_deref(), json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("schema error:") {
                EXIT_SCHEMA_ERROR
            } else if msg.starts_with("input error:") || msg.starts_with("config error:") {
                EXIT_INPUT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

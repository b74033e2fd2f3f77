use anyhow::Result;
use clap::{Args, CommandFactory, Parser};
use color_eyre::config::HookBuilder;
use diskpush_core::{ConfigFile, LoggingConfig};
use tracing_subscriber::EnvFilter;

mod handlers;
mod wizard;

/// diskpush - upload files to Yandex Disk
#[derive(Parser, Debug)]
#[command(name = "diskpush")]
#[command(version)]
#[command(about = "Upload a local file to Yandex Disk from your terminal", long_about = None)]
struct Cli {
    /// Log debug output (overrides the configured level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Sub-command to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Initial setup (interactive wizard)
    Init,

    /// Upload a file; missing arguments are asked for interactively
    Upload(UploadArgs),

    /// Create a remote directory together with its missing parents
    Mkdir {
        /// Remote directory path, e.g. disk:/backups/2024
        remote: String,
        /// OAuth access token
        #[arg(long, env = "DISKPUSH_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Shell completion
    Completion {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: String,
    },
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local file to upload
    pub local: Option<String>,
    /// Destination path on the Disk, e.g. disk:/docs/report.pdf
    pub remote: Option<String>,
    /// Replace the remote file if it already exists
    #[arg(short, long, overrides_with = "no_overwrite")]
    pub overwrite: bool,
    /// Keep an existing remote file even if the config says to overwrite
    #[arg(long, overrides_with = "overwrite")]
    pub no_overwrite: bool,
    /// Create missing remote directories
    #[arg(short = 'p', long, overrides_with = "no_make_dirs")]
    pub make_dirs: bool,
    /// Do not create remote directories even if the config says to
    #[arg(long, overrides_with = "make_dirs")]
    pub no_make_dirs: bool,
    /// Maximum number of upload attempts
    #[arg(short, long)]
    pub retries: Option<u32>,
    /// OAuth access token
    #[arg(long, env = "DISKPUSH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

/// Level and format to log with; `--verbose` forces debug
fn log_settings(logging: Option<&LoggingConfig>, verbose: bool) -> (String, String) {
    let logging = logging.cloned().unwrap_or_default();
    let level = if verbose {
        "debug".to_string()
    } else {
        logging.level
    };

    (level, logging.format)
}

/// Install the tracing subscriber; `RUST_LOG` wins over the config file
fn init_logging(logging: Option<&LoggingConfig>, verbose: bool) {
    let (level, format) = log_settings(logging, verbose);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };
    if let Err(e) = result {
        eprintln!("Warning: Failed to install logger: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    // A broken config file must not lock out `init` or `config validate`
    let config = handlers::load_config_or_default().unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        ConfigFile::default()
    });
    init_logging(config.logging.as_ref(), cli.verbose);

    // Execute command
    match cli.command {
        Commands::Init => handlers::handle_init().await,
        Commands::Upload(args) => handlers::handle_upload(&config, args).await,
        Commands::Mkdir { remote, token } => {
            handlers::handle_mkdir(&config, &remote, token).await
        }
        Commands::Config { action } => handlers::handle_config(action).await,
        Commands::Completion { shell } => {
            handlers::handle_completion(&shell, &mut Cli::command()).await
        }
    }
}

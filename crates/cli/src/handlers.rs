//! Command handlers for diskpush CLI

use crate::wizard::{self, run_init_wizard};
use crate::{ConfigAction, UploadArgs};
use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Shell as ClapShell};
use diskpush_core::api::EXISTENT_DIRECTORY_ERROR;
use diskpush_core::{
    config_exists, get_config_path, load_config, validate_config, ConfigFile, DiskClient, Error, UploadRequest,
};
use std::path::Path;
use tracing::debug;

/// Load the config file, falling back to defaults when there is none
pub fn load_config_or_default() -> diskpush_core::Result<ConfigFile> {
    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound(_)) => Ok(ConfigFile::default()),
        Err(e) => Err(e),
    }
}

/// Token from the flag or environment, then the config file, then a prompt
fn resolve_token(flag: Option<String>, config: &ConfigFile) -> Result<String> {
    if let Some(token) = flag.filter(|t| !t.trim().is_empty()) {
        return Ok(token);
    }
    if let Some(token) = config.auth.token.clone() {
        return Ok(token);
    }
    wizard::prompt_token()
}

/// Handle init command
pub async fn handle_init() -> Result<()> {
    run_init_wizard().await
}

/// Handle upload command
pub async fn handle_upload(config: &ConfigFile, args: UploadArgs) -> Result<()> {
    // Any missing positional switches to the interactive flow
    let interactive = args.local.is_none() || args.remote.is_none();

    let token = resolve_token(args.token, config)?;
    let local = match args.local {
        Some(local) => local,
        None => wizard::prompt_local_path()?,
    };
    let remote = match args.remote {
        Some(remote) => remote,
        None => wizard::prompt_remote_path()?,
    };

    let overwrite = flag_value(args.overwrite, args.no_overwrite, config.upload.overwrite);
    let make_dirs = flag_value(args.make_dirs, args.no_make_dirs, config.upload.make_dirs);
    let (overwrite, make_dirs) = if interactive {
        (
            wizard::confirm_overwrite(overwrite)?,
            wizard::confirm_make_dirs(make_dirs)?,
        )
    } else {
        (overwrite, make_dirs)
    };

    let mut retry = config.upload.retry_policy();
    if let Some(retries) = args.retries {
        retry.max_retries = retries;
    }

    debug!(
        overwrite,
        make_dirs,
        max_retries = retry.max_retries,
        interactive,
        "Upload options resolved"
    );

    let client = DiskClient::from_config_with_token(config, token)?;
    let request = UploadRequest::new(&local, &remote)
        .overwrite(overwrite)
        .make_dirs(make_dirs)
        .retry_policy(retry);

    println!("Uploading {} -> {}...", local, remote);
    if let Ok(metadata) = Path::new(&local).metadata() {
        println!("  Size: {}", format_bytes(metadata.len()));
    }

    client.upload(&request).await?;

    println!("  ✅ File uploaded.");

    Ok(())
}

/// A `--flag`/`--no-flag` pair over a configured default
fn flag_value(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

/// Handle mkdir command
pub async fn handle_mkdir(config: &ConfigFile, remote: &str, token: Option<String>) -> Result<()> {
    let token = resolve_token(token, config)?;
    let client = DiskClient::from_config_with_token(config, token)?;

    println!("Creating {}...", remote);

    client.ensure_directories(remote).await?;
    match client.create_directory(remote).await {
        Ok(_) => println!("  ✅ Directory created"),
        Err(Error::Api(info)) if info.error == EXISTENT_DIRECTORY_ERROR => {
            println!("  ✅ Directory already exists")
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Handle config commands
pub async fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if !config_exists() {
                println!("No configuration found (run 'diskpush init')");
                return Ok(());
            }

            println!("Current configuration:");
            println!();

            let config = load_config()?;

            println!("Auth:");
            println!("  Token: {}", mask_token(config.auth.token.as_deref()));
            println!();
            println!("API:");
            println!("  Base URL: {}", config.api.base_url);
            println!("  Timeout: {}s", config.api.timeout);
            println!();
            println!("Upload:");
            println!("  Overwrite: {}", config.upload.overwrite);
            println!("  Make dirs: {}", config.upload.make_dirs);
            println!("  Max retries: {}", config.upload.max_retries);
            println!("  Retry delay: {}ms", config.upload.retry_delay);
            println!("  Backoff multiplier: {}", config.upload.backoff_multiplier);

            if let Some(logging) = &config.logging {
                println!();
                println!("Logging:");
                println!("  Level: {}", logging.level);
                println!("  Format: {}", logging.format);
            }

            Ok(())
        }
        ConfigAction::Validate => {
            println!("Validating configuration...");

            let config = load_config()?;
            validate_config(&config)?;
            println!("  ✅ Valid configuration format");

            if config.auth.token.is_none() {
                println!("  ⚠️  No token stored (pass --token or set DISKPUSH_TOKEN)");
            }

            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", get_config_path()?.display());
            Ok(())
        }
    }
}

/// Show only the first characters of a token
fn mask_token(token: Option<&str>) -> String {
    match token {
        Some(token) if token.chars().count() > 6 => {
            format!("{}...", token.chars().take(6).collect::<String>())
        }
        Some(_) => "***".to_string(),
        None => "(not set)".to_string(),
    }
}

/// Format bytes to human-readable size
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Handle shell completion generation
pub async fn handle_completion(shell: &str, cmd: &mut Command) -> Result<()> {
    let clap_shell = match shell {
        "bash" => ClapShell::Bash,
        "zsh" => ClapShell::Zsh,
        "fish" => ClapShell::Fish,
        "elvish" => ClapShell::Elvish,
        "powershell" | "pwsh" => ClapShell::PowerShell,
        _ => {
            return Err(anyhow::anyhow!(
                "Unsupported shell: {}\nSupported shells: bash, zsh, fish, elvish, powershell",
                shell
            ));
        }
    };

    // Script only on stdout so it can be sourced directly
    generate(clap_shell, cmd, "diskpush", &mut std::io::stdout());

    Ok(())
}

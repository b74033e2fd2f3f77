//! Interactive prompts: the setup wizard and the upload questions

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use diskpush_core::{
    get_config_path, save_config, validate_config, AuthConfig, ConfigFile, RemotePath, UploadConfig,
};
use std::path::Path;

/// Run the interactive setup wizard
pub async fn run_init_wizard() -> Result<()> {
    println!("🚀 Welcome to diskpush setup!\n");

    println!("This wizard stores your access token and upload defaults.");
    println!("You will need an OAuth token for the Yandex Disk REST API.");
    println!("Get one at: https://oauth.yandex.com/\n");

    let token = prompt_token()?;
    let overwrite = confirm_overwrite(false)?;
    let make_dirs = confirm_make_dirs(false)?;
    let max_retries = prompt_max_retries()?;

    let config = ConfigFile {
        auth: AuthConfig { token: Some(token) },
        upload: UploadConfig {
            overwrite,
            make_dirs,
            max_retries,
            ..UploadConfig::default()
        },
        ..ConfigFile::default()
    };
    validate_config(&config)?;

    // Summary
    println!("\n📋 Configuration summary:");
    println!("  Overwrite existing files: {}", overwrite);
    println!("  Create missing folders: {}", make_dirs);
    println!("  Upload attempts: {}", max_retries);

    let confirm = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save this configuration?")
        .default(true)
        .interact()?;

    if !confirm {
        println!("❌ Configuration cancelled");
        return Ok(());
    }

    save_config(&config)?;

    println!("\n🎉 Setup complete!");
    println!("\nConfiguration saved to: {}", get_config_path()?.display());
    println!("\nYou can now use diskpush:");
    println!("  $ diskpush upload report.pdf disk:/docs/report.pdf");
    println!("  $ diskpush mkdir disk:/backups/2024");

    Ok(())
}

/// Prompt for the OAuth token
pub fn prompt_token() -> Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Access token")
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Access token cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to get access token: {}", e))
}

/// Prompt for the local file to upload
pub fn prompt_local_path() -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Path to the local file to upload")
        .validate_with(|input: &String| -> Result<(), &str> {
            if Path::new(input).is_file() {
                Ok(())
            } else {
                Err("File to upload not found")
            }
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to get local path: {}", e))
}

/// Prompt for the destination on the Disk
pub fn prompt_remote_path() -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Destination path on the Disk")
        .validate_with(|input: &String| -> Result<(), String> {
            RemotePath::new(input.as_str())
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to get remote path: {}", e))
}

/// Ask whether an existing remote file may be replaced
pub fn confirm_overwrite(default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Overwrite the file if it already exists?")
        .default(default)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to get answer: {}", e))
}

/// Ask whether missing remote folders should be created
pub fn confirm_make_dirs(default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Create missing folders on the Disk?")
        .default(default)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to get answer: {}", e))
}

/// Prompt for the number of upload attempts
fn prompt_max_retries() -> Result<u32> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Upload attempts before giving up")
        .default(3u32)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if *input == 0 {
                Err("At least one attempt is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to get attempt count: {}", e))
}

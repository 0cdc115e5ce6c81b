use super::{prompts, render};
use crate::context::load_credentials;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use streamx_config::credentials::API_KEY_ENV;
use streamx_config::{Config, PathManager, StorageBackendKind};

/// Config commands work without opening storage, so they stay usable when
/// the config file itself is broken.
pub fn run_config(cmd: ConfigCommands, paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(paths, config, full, output),
        ConfigCommands::ApiKey { key } => configure_api_key(paths, key, output),
        ConfigCommands::Init { force } => init_config(paths, force, output),
    }
}

fn show_config(paths: &PathManager, config: &Config, full: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let credentials = load_credentials(paths)?;

    let (api_key, key_source) = match std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
        Some(key) => (Some(key), API_KEY_ENV),
        None => (credentials.get_catalog_api_key().cloned(), "credentials file"),
    };
    let api_key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };
    let storage_location = match config.storage.backend {
        StorageBackendKind::File => config.storage_dir(paths).display().to_string(),
        StorageBackendKind::Memory => "<memory>".to_string(),
    };

    if !output.is_human() {
        return output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "catalog": {
                "base_url": config.catalog.base_url,
                "image_base_url": config.catalog.image_base_url,
                "language": config.catalog.language,
                "include_adult": config.catalog.include_adult,
                "api_key": api_key_display,
                "api_key_source": api_key.as_ref().map(|_| key_source),
            },
            "storage": {
                "backend": config.storage.backend,
                "location": storage_location,
            },
            "logging": config.logging,
        }));
    }

    if !config_file.exists() {
        output.warn(format!(
            "Configuration file not found at {}, using defaults. Run 'streamx config init' to create it.",
            config_file.display()
        ));
    }

    let info_rows = vec![
        ("Config File", config_file.display().to_string()),
        ("Credentials File", paths.credentials_file().display().to_string()),
    ];
    output.info(render::detail_table("Files", &info_rows).to_string());

    let mut catalog_rows = vec![
        ("Base URL", config.catalog.base_url.clone()),
        ("Image Base URL", config.catalog.image_base_url.clone()),
        ("Language", config.catalog.language.clone()),
        ("Include Adult", config.catalog.include_adult.to_string()),
        ("API Key", api_key_display),
    ];
    if api_key.is_some() {
        catalog_rows.push(("API Key Source", key_source.to_string()));
    }
    output.info(render::detail_table("Catalog Configuration", &catalog_rows).to_string());

    let storage_rows = vec![
        ("Backend", format!("{:?}", config.storage.backend).to_lowercase()),
        ("Location", storage_location),
    ];
    output.info(render::detail_table("Storage Configuration", &storage_rows).to_string());

    let logging_rows = vec![
        ("Level", config.logging.level.clone()),
        (
            "JSON",
            config
                .logging
                .json
                .map(|j| j.to_string())
                .unwrap_or_else(|| "auto".to_string()),
        ),
        (
            "File",
            config
                .logging
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_else(|| "<stderr>".to_string()),
        ),
    ];
    output.info(render::detail_table("Logging Configuration", &logging_rows).to_string());

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is invalid: {}", e));
    }

    Ok(())
}

fn configure_api_key(paths: &PathManager, key_arg: Option<String>, output: &Output) -> Result<()> {
    let key = match key_arg {
        Some(key) => key,
        None => {
            if !prompts::can_prompt() {
                return Err(eyre!("No API key given. Pass --key when not running in a terminal."));
            }
            output.info("Create an API key at https://www.themoviedb.org/settings/api");
            prompts::prompt_password("Catalog API key")?
        }
    };

    let key = key.trim().to_string();
    validate_api_key(&key).map_err(|e| eyre!("{}", e))?;

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;

    let mut credentials = load_credentials(paths)?;
    credentials.set_catalog_api_key(key);
    credentials.save().map_err(|e| {
        eyre!(
            "Failed to save credentials to {}: {}",
            paths.credentials_file().display(),
            e
        )
    })?;

    output.success("Catalog API key saved");
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
    }
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return "<not set>".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

fn validate_api_key(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if input.chars().any(char::is_whitespace) {
        return Err("API key cannot contain whitespace");
    }
    if input.len() < 16 {
        return Err("API key seems too short. Please verify it's correct.");
    }
    Ok(())
}

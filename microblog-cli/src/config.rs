use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use microblog_core::config::{redact, template};
use microblog_core::MicroblogConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config file (default: ~/.microblog/config.toml)
    #[arg(long, env = "MICROBLOG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init(InitArgs),
    /// Show config file path
    Path,
    /// Show the config file's values (token redacted)
    Show,
    /// Check that a token and repository are configured
    Validate,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    let path = args.config.unwrap_or_else(MicroblogConfig::config_path);

    match args.command {
        ConfigCommands::Init(init) => run_init(&path, init),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Validate => run_validate(&path),
    }
}

/// Config for publishing; a missing file is fine when flags or env fill the gaps
pub fn load_config(path: Option<&Path>) -> Result<MicroblogConfig> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(MicroblogConfig::config_path);
    MicroblogConfig::load_optional(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn run_init(path: &Path, args: InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {}\n\nUse --force to overwrite",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, template())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("✅ Created config at: {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {}", path.display());
    println!("  2. Set repo = \"owner/name\" and export GITHUB_TOKEN");
    println!("  3. Run: microblog config validate");

    Ok(())
}

fn run_show(path: &Path) -> Result<()> {
    let config = MicroblogConfig::load_from(path)?;
    let gh = &config.github;
    let unset = || "(not set)".to_string();

    println!("[github]");
    println!("token        = {}", gh.token.as_deref().map(redact).unwrap_or_else(unset));
    println!("repo         = {}", gh.repo.clone().unwrap_or_else(unset));
    println!(
        "api_base     = {}",
        gh.api_base
            .clone()
            .unwrap_or_else(|| microblog_core::github::DEFAULT_API_BASE.to_string())
    );
    println!(
        "timeout_secs = {}",
        gh.timeout_secs
            .unwrap_or(microblog_core::github::DEFAULT_TIMEOUT_SECS)
    );

    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    println!("🔍 Validating configuration...");

    let config = MicroblogConfig::load_from(path)?;
    println!("   ✓ Config loaded from {}", path.display());

    let raw = std::fs::read_to_string(path)?;
    let warnings = MicroblogConfig::secret_warnings(&raw);
    if !warnings.is_empty() {
        println!("\n⚠️  Security warnings:");
        for warning in &warnings {
            println!("   {}", warning);
        }
        println!();
    }

    let resolved = config.resolve(None, None)?;
    println!("   ✓ token is set ({})", resolved.redacted_token());
    println!("   ✓ repo is set ({})", resolved.repo);

    println!("\n✅ Configuration valid!");
    Ok(())
}

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use sortdir_core::config::Config;
use sortdir_core::organizer::{EntryStatus, OrganizeSummary, Organizer};
use sortdir_core::{Result, FALLBACK_CATEGORY};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match resolve_config_path(cli.config) {
        Ok(config_path) => match cli.command {
            Some(Commands::Categories) => handle_categories(&config_path),
            Some(Commands::Config { action }) => handle_config(action, &config_path),
            Some(Commands::Completions { shell }) => {
                handle_completions(shell);
                Ok(())
            }
            None => handle_organize(&config_path, &cli.path, cli.dry_run, cli.json, cli.quiet),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            if e.is_invalid_target() {
                eprintln!("{}", "Use --path <DIR> to pick the folder to organize.".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise the verbosity flags pick the level.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config_path(cli_config: Option<PathBuf>) -> Result<PathBuf> {
    match cli_config {
        Some(path) => Ok(expand_tilde(&path)),
        None => Config::default_path(),
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "sortdir", &mut io::stdout());
}

fn handle_organize(
    config_path: &Path,
    path: &Path,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let organizer = Organizer::from_config(&config)?;

    let folder = expand_tilde(path);
    // Resolve only what exists; a missing folder is reported by the organizer.
    let folder = if folder.exists() {
        folder.canonicalize()?
    } else {
        folder
    };

    let report = !json && !quiet;
    if report {
        println!();
        println!("Folder: {}", folder.display().to_string().cyan());
        if dry_run {
            println!("{}", "(dry run)".yellow());
        }
        println!();
    }

    let on_entry: &dyn Fn(EntryStatus, &str) = &|status, line| {
        let status_str = match status {
            EntryStatus::Moved => "[MOVE]".green(),
            EntryStatus::WouldMove => "[DRY RUN]".yellow(),
            EntryStatus::Skipped => "[SKIP]".dimmed(),
        };
        println!("  {} {}", status_str, line);
    };

    let summary = organizer.organize(&folder, dry_run, report.then_some(on_entry))?;

    if json {
        let out = serde_json::to_string_pretty(&summary).map_err(io::Error::from)?;
        println!("{}", out);
    } else if !quiet {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &OrganizeSummary) {
    println!();
    println!("Summary:");
    println!("  Files processed: {}", summary.processed);
    if summary.skipped > 0 {
        println!("  Skipped: {}", summary.skipped);
    }
    for (category, count) in &summary.counts {
        println!("  {}: {}", category, count);
    }
    println!();

    if summary.dry_run {
        println!("{}", "Dry run complete, nothing was moved.".yellow());
    } else {
        println!("{} {}", "Organized:".green(), summary.folder.display());
    }
}

fn handle_categories(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let organizer = Organizer::from_config(&config)?;
    let table = organizer.classifier().table();

    println!();
    for cat in table.all() {
        println!("  {}", cat.name.cyan().bold());
        println!("    {}", cat.extensions.join(" "));
    }
    println!("  {}", FALLBACK_CATEGORY.cyan().bold());
    println!("    {}", "(everything else)".dimmed());
    println!();

    let shadowed = table.shadowed_extensions();
    if !shadowed.is_empty() {
        for (ext, winner, loser) in shadowed {
            println!(
                "{} {} is listed by {} and {}; files go to {}",
                "[WARN]".yellow().bold(),
                ext,
                winner,
                loser,
                winner
            );
        }
        println!();
    }

    Ok(())
}

fn handle_config(action: ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load(config_path)?;
            // Validate before printing so a broken file is reported, not echoed.
            config.category_table()?;
            config.skip_patterns()?;
            print!("{}", config.to_toml(config_path)?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(config_path)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~/Downloads")), home.join("Downloads"));
        assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert_eq!(expand_tilde(Path::new("~user/x")), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("/etc/sortdir.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/sortdir.toml"));
    }
}

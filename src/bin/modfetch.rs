//! modfetch CLI - CurseForge mod installer for Fabric servers
//!
//! Usage:
//!   modfetch list                          List installed mod files
//!   modfetch search <version> <query>      Search the catalog for mods
//!   modfetch download <version> <query>    Interactively install one mod
//!   modfetch install <version> <mods>...   Install mods by id or name

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use modfetch::installer::resolve_reference;
use modfetch::{
    catalog, matcher, output, select, store, CatalogClient, InstallSession, Installer,
    OverwritePolicy,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modfetch")]
#[command(about = "CurseForge mod installer for Fabric Minecraft servers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory where mod jars are placed (defaults to ./mods, or the
    /// current directory when it is already named "mods")
    #[arg(short, long, global = true, env = "MODFETCH_MODS_DIR")]
    mods_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed mod files
    List,

    /// Search the catalog for mods matching a query
    Search {
        /// Target game version
        version: String,

        /// Free-text search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Interactively pick and install a single mod plus its dependencies
    Download {
        /// Target game version
        version: String,

        /// Free-text search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Install mods by id or name, non-interactively
    Install {
        /// Target game version
        version: String,

        /// Mod ids or names
        #[arg(required = true)]
        mods: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mods_dir = cli.mods_dir.unwrap_or_else(store::default_mods_dir);
    store::ensure_dir(&mods_dir)?;

    match cli.command {
        Commands::List => {
            let names = store::list_installed(&mods_dir)?;
            if names.is_empty() {
                output::info("this server has no mods installed");
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }

        Commands::Search { version, query } => {
            validate_game_version(&version)?;
            let query = query.join(" ");

            let catalog = CatalogClient::new();
            let mods = search_and_filter(&catalog, &version, &query)?;
            if mods.is_empty() {
                output::info("no mods found");
            } else {
                output::info(&format!("mod list for {} ({})", version, query));
                for mod_rec in mods {
                    println!("{} ({})", mod_rec.name, mod_rec.id);
                }
            }
        }

        Commands::Download { version, query } => {
            validate_game_version(&version)?;
            let query = query.join(" ");

            let catalog = CatalogClient::new();
            let mods = search_and_filter(&catalog, &version, &query)?;
            if mods.is_empty() {
                output::info("no mods found");
                return Ok(());
            }

            for (i, mod_rec) in mods.iter().enumerate() {
                output::choice(i, &format!("{} ({})", mod_rec.name, mod_rec.id));
            }
            let Some(index) = prompt_index(mods.len()) else {
                output::info("exiting");
                return Ok(());
            };
            let mod_rec = &mods[index];

            let files = catalog.files(mod_rec.id)?;
            let candidates = select::select_all(&files, &version);
            if candidates.is_empty() {
                output::warning(&format!(
                    "failed to download {}: no version available",
                    mod_rec.name
                ));
                return Ok(());
            }

            for (i, artifact) in candidates.iter().enumerate() {
                output::choice(
                    i,
                    &format!(
                        "{} [{}]",
                        select::display_name(artifact, &mod_rec.name),
                        artifact.game_versions.join(", ")
                    ),
                );
            }
            let Some(index) = prompt_index(candidates.len()) else {
                output::info("skipped");
                return Ok(());
            };

            let installer = Installer::new(&catalog, &mods_dir, &version, OverwritePolicy::Replace);
            let mut session = InstallSession::new();
            installer.install_chosen(mod_rec, &candidates[index], &mut session);
        }

        Commands::Install { version, mods } => {
            validate_game_version(&version)?;

            let catalog = CatalogClient::new();
            let installer = Installer::new(&catalog, &mods_dir, &version, OverwritePolicy::Keep);
            // One session across the whole batch: an id installed for an
            // early entry satisfies any later entry or dependency
            let mut session = InstallSession::new();

            let total = mods.len();
            for (i, reference) in mods.iter().enumerate() {
                output::action_numbered(i + 1, total, &format!("Resolving {}", reference));
                match resolve_reference(&catalog, &version, reference) {
                    Ok(Some(mod_rec)) => {
                        installer.install(&mod_rec, &mut session);
                    }
                    Ok(None) => {
                        output::warning(&format!("cannot find mod {}", reference));
                    }
                    Err(e) => {
                        output::error(&format!("failed to install mod {}: {:#}", reference, e));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Reject game versions outside the supported allow-list before any
/// network activity happens
fn validate_game_version(version: &str) -> Result<()> {
    if !catalog::SUPPORTED_GAME_VERSIONS.contains(&version) {
        bail!(
            "unsupported game version '{}' (supported: {})",
            version,
            catalog::SUPPORTED_GAME_VERSIONS.join(", ")
        );
    }
    Ok(())
}

/// Search the catalog and post-filter the loose results with the matcher
fn search_and_filter(
    catalog: &CatalogClient,
    version: &str,
    query: &str,
) -> Result<Vec<modfetch::ModRecord>> {
    let mods = catalog.search(version, query)?;
    Ok(mods
        .into_iter()
        .filter(|m| matcher::matches(&m.name, query))
        .collect())
}

/// Prompt for a choice index on stdin. `None` for anything that is not a
/// number in range, which callers treat as a graceful exit.
fn prompt_index(len: usize) -> Option<usize> {
    print!("> ");
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok()?;
    let index: usize = line.trim().parse().ok()?;
    if index < len {
        Some(index)
    } else {
        None
    }
}

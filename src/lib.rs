//! CurseForge mod installer for Fabric Minecraft servers
//!
//! Resolves mods against the remote catalog, picks the newest artifact
//! compatible with the server's game version and the Fabric loader, and
//! installs it together with its declared dependencies, each mod at most
//! once per run, cycles included.
//!
//! # Example
//!
//! ```no_run
//! use modfetch::{CatalogClient, Installer, InstallSession, OverwritePolicy};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = CatalogClient::new();
//! let mods_dir = Path::new("mods");
//!
//! let installer = Installer::new(&catalog, mods_dir, "1.17.1", OverwritePolicy::Keep);
//! let mut session = InstallSession::new();
//!
//! if let Some(mod_rec) = modfetch::installer::resolve_reference(&catalog, "1.17.1", "fabric api")? {
//!     installer.install(&mod_rec, &mut session);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The walk is strictly sequential: one catalog lookup or file transfer in
//! flight at a time, dependencies depth-first in declaration order.

pub mod catalog;
pub mod installer;
pub mod matcher;
pub mod output;
pub mod sanitize;
pub mod select;
pub mod store;

pub use catalog::{ArtifactRecord, CatalogClient, ModRecord, SUPPORTED_GAME_VERSIONS};
pub use installer::{InstallOutcome, InstallSession, Installer, OverwritePolicy};

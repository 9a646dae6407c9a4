//! Local mods directory operations
//!
//! The file store is deliberately dumb: existence checks, directory listing,
//! removal, and a streaming byte transfer from a URL to a file. All naming
//! decisions happen before calls land here.

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::catalog::http_timeout;
use crate::output;

/// Default mods directory: `<cwd>/mods`, or the current directory itself
/// when it is already named `mods` (the tool is often run from inside one).
pub fn default_mods_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if cwd.file_name().map(|n| n == "mods").unwrap_or(false) {
        cwd
    } else {
        cwd.join("mods")
    }
}

/// Create the mods directory if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create mods directory: {}", dir.display()))
}

/// File names of installed artifacts, sorted for stable output
pub fn list_installed(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if !dir.exists() {
        return Ok(names);
    }
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read mods directory: {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Remove a file if it exists; missing files are not an error
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}

/// Stream the bytes at `url` into `dir/file_name`, returning the byte count.
///
/// Shows a byte-sized progress bar when the server reports a content length,
/// a spinner otherwise.
pub fn transfer(url: &str, dir: &Path, file_name: &str) -> Result<u64> {
    let dest = dir.join(file_name);

    let response = ureq::get(url)
        .timeout(http_timeout())
        .call()
        .with_context(|| format!("download failed: {}", url))?;

    let pb = match response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        Some(len) => output::download_progress(len),
        None => output::spinner(&format!("downloading {}", file_name)),
    };

    let mut file = std::fs::File::create(&dest)
        .with_context(|| format!("cannot create file: {}", dest.display()))?;

    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("read error while downloading {}", file_name))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .with_context(|| format!("write error: {}", dest.display()))?;
        total_bytes += bytes_read as u64;
        pb.set_position(total_bytes);
    }

    pb.finish_and_clear();
    Ok(total_bytes)
}

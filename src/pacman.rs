//! Package database access through the pacman CLI.
//!
//! One immutable snapshot per run: configured repositories, installed
//! packages, and the best available new version for everything upgradable.
//! Nothing here mutates the system; the tool only ever reads.

use std::collections::HashMap;
use std::process::Command;

use tracing::{debug, warn};

use crate::closure::DepLookup;
use crate::error::{Error, Result};
use crate::types::PackageRecord;

/// `pacman -Si` batch size; pacman takes many names per invocation.
const SI_BATCH: usize = 100;

/// Snapshot of the local and sync databases.
pub struct PacmanDb {
    repos: Vec<String>,
    installed: Vec<PackageRecord>,
    index_by_name: HashMap<String, usize>,
    updates: HashMap<String, PackageRecord>,
}

impl PacmanDb {
    /// Query the system databases once.
    ///
    /// Repositories come from the pacman configuration itself
    /// (`pacman-conf --repo-list`); each one must answer a sync-database
    /// listing or the run aborts with a registration failure naming it.
    pub fn open() -> Result<Self> {
        let repos = configured_repos()?;
        for repo in &repos {
            verify_repo(repo)?;
        }

        let qi = run_pacman(&["-Qi"]).map_err(Error::DbInit)?;
        let installed = parse_info_blocks(&qi);
        debug!(count = installed.len(), "installed snapshot loaded");

        let upgradable = match run_pacman(&["-Qu"]) {
            Ok(out) => parse_upgrade_names(&out),
            // pacman -Qu exits nonzero when nothing is upgradable.
            Err(_) => Vec::new(),
        };
        let updates = fetch_sync_records(&upgradable);
        debug!(count = updates.len(), "update snapshot loaded");

        Ok(Self::from_snapshots(installed, updates, repos))
    }

    /// Assemble a snapshot from prebuilt data. This is the construction seam
    /// tests use, so `open` stays the only place that shells out.
    pub fn from_snapshots(
        installed: Vec<PackageRecord>,
        updates: Vec<PackageRecord>,
        repos: Vec<String>,
    ) -> Self {
        let index_by_name = installed
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        let updates = updates.into_iter().map(|r| (r.name.clone(), r)).collect();
        Self {
            repos,
            installed,
            index_by_name,
            updates,
        }
    }

    pub fn installed(&self) -> &[PackageRecord] {
        &self.installed
    }

    pub fn repos(&self) -> &[String] {
        &self.repos
    }

    /// New version's record when `record` has an update, else `None`.
    pub fn best_available(&self, record: &PackageRecord) -> Option<&PackageRecord> {
        self.updates.get(&record.name)
    }
}

impl DepLookup for PacmanDb {
    fn direct_deps(&self, name: &str) -> Option<&[String]> {
        self.index_by_name
            .get(name)
            .map(|&i| self.installed[i].depends.as_slice())
    }
}

// === Command plumbing ===

fn run_pacman(args: &[&str]) -> std::result::Result<String, String> {
    let out = Command::new("pacman")
        .args(args)
        .output()
        .map_err(|e| format!("pacman {args:?}: {e}"))?;
    if !out.status.success() {
        return Err(format!("pacman {args:?} exited with {:?}", out.status));
    }
    String::from_utf8(out.stdout).map_err(|e| format!("pacman {args:?}: {e}"))
}

/// Enabled repositories, in configuration order.
fn configured_repos() -> Result<Vec<String>> {
    let out = Command::new("pacman-conf")
        .arg("--repo-list")
        .output()
        .map_err(|e| Error::DbInit(format!("pacman-conf --repo-list: {e}")))?;
    if !out.status.success() {
        return Err(Error::DbInit(format!(
            "pacman-conf --repo-list exited with {:?}",
            out.status
        )));
    }
    let repos: Vec<String> = String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if repos.is_empty() {
        return Err(Error::DbInit(String::from(
            "no repositories configured in pacman.conf",
        )));
    }
    Ok(repos)
}

/// A repository registers iff its sync database answers a listing.
fn verify_repo(repo: &str) -> Result<()> {
    let ok = Command::new("pacman")
        .args(["-Sl", repo])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(Error::RepoRegister(repo.to_string()))
    }
}

/// New-version records for the upgradable names, via batched `pacman -Si`.
/// A chunk that fails to resolve is skipped with a warning rather than
/// aborting the run.
fn fetch_sync_records(names: &[String]) -> Vec<PackageRecord> {
    let mut records = Vec::new();
    for chunk in names.chunks(SI_BATCH) {
        let mut args = vec!["-Si"];
        args.extend(chunk.iter().map(String::as_str));
        match run_pacman(&args) {
            Ok(out) => records.extend(parse_info_blocks(&out)),
            Err(e) => warn!(error = %e, "skipping sync metadata chunk"),
        }
    }
    records
}

// === Output parsing ===

/// Parse `pacman -Qi` / `pacman -Si` field blocks, one record per package.
/// Blocks are separated by blank lines; values sit after the first colon.
pub fn parse_info_blocks(output: &str) -> Vec<PackageRecord> {
    let mut records = Vec::new();
    let mut name: Option<String> = None;
    let mut description = String::new();
    let mut installed_size = 0i64;
    let mut depends: Vec<String> = Vec::new();

    // Trailing "" flushes the final block.
    for line in output.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if let Some(done) = name.take() {
                records.push(PackageRecord {
                    name: done,
                    installed_size,
                    description: std::mem::take(&mut description),
                    depends: std::mem::take(&mut depends),
                });
                installed_size = 0;
            }
            continue;
        }
        // Continuation lines (indented) belong to fields we do not track.
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => name = Some(value.to_string()),
            "Description" => description = value.to_string(),
            "Installed Size" => installed_size = parse_size(value).unwrap_or(0),
            "Depends On" => depends = parse_depends(value),
            _ => {}
        }
    }
    records
}

/// "9.34 MiB" -> bytes. Unknown units yield `None`.
fn parse_size(value: &str) -> Option<i64> {
    let mut parts = value.split_whitespace();
    let amount: f64 = parts.next()?.parse().ok()?;
    let factor = match parts.next().unwrap_or("B") {
        "B" => 1.0,
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        "TiB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some((amount * factor) as i64)
}

/// "glibc>=2.33  readline  libreadline.so=8-64" -> bare names; "None" -> empty.
fn parse_depends(value: &str) -> Vec<String> {
    if value == "None" {
        return Vec::new();
    }
    value
        .split_whitespace()
        .map(|dep| {
            dep.split(['<', '>', '='])
                .next()
                .unwrap_or(dep)
                .to_string()
        })
        .filter(|dep| !dep.is_empty())
        .collect()
}

/// Package names from `pacman -Qu` lines ("name old -> new [ignored]").
pub fn parse_upgrade_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.split_whitespace().next().map(str::to_string)
        })
        .collect()
}

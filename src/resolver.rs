// Author: Dustin Pilgrim
// License: MIT

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Finds and opens the files an `include "pattern";` statement refers to.
///
/// The parser calls [`IncludeResolver::matches`] once per include statement and
/// then [`IncludeResolver::open`] for each match, in the order returned.
pub trait IncludeResolver {
    /// List the files matching `pattern`, in processing order.
    ///
    /// `base_dir` is the directory relative patterns are taken from. A
    /// malformed pattern is reported as `Err` with a human-readable reason;
    /// no matches is `Ok(vec![])`.
    fn matches(&self, pattern: &str, base_dir: Option<&Path>) -> Result<Vec<PathBuf>, String>;

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }
}

/// Glob-based resolver over the local filesystem.
///
/// A leading `~/` expands to the home directory; other relative patterns are
/// joined onto `base_dir`. Matches come back sorted by path.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobResolver;

impl IncludeResolver for GlobResolver {
    fn matches(&self, pattern: &str, base_dir: Option<&Path>) -> Result<Vec<PathBuf>, String> {
        let full = expand_pattern(pattern, base_dir)?;
        let full = full.to_string_lossy();

        let paths = glob::glob(&full).map_err(|e| e.to_string())?;
        let mut found = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => found.push(path),
                Ok(_) => {}
                Err(e) => {
                    log::warn!("skipping unreadable include candidate: {}", e);
                }
            }
        }
        Ok(found)
    }
}

/// Expand "~/" and resolve relative patterns against base_dir.
///
/// The directory prefix is escaped so only the user's pattern is globbed.
fn expand_pattern(pattern: &str, base_dir: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(rest) = pattern.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| "could not determine home directory for ~ expansion".to_string())?;
        return Ok(escape_dir(&home).join(rest));
    }

    let p = PathBuf::from(pattern);
    if p.is_relative() {
        if let Some(base) = base_dir {
            return Ok(escape_dir(base).join(p));
        }
    }
    Ok(p)
}

fn escape_dir(dir: &Path) -> PathBuf {
    PathBuf::from(glob::Pattern::escape(&dir.to_string_lossy()))
}

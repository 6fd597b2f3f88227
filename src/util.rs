use crate::config::Config;
use crate::error::{Error, Result};
use crate::metafile::Metafile;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Read the full text of a metafile.
pub fn read_metafile(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write a token list to `path`, space separated with a trailing newline.
pub fn write_tokens(path: &Path, tokens: &[String]) -> Result<()> {
    let out = tokens.join(" ") + "\n";
    std::fs::write(path, out).map_err(|e| Error::io(path, e))
}

/// Join `path` onto `root` and render it as a string. An absolute `path`
/// replaces `root` entirely.
pub fn join(root: &Path, path: &str) -> String {
    root.join(path).to_string_lossy().into_owned()
}

/// Drop repeated paths, keeping the first occurrence. Two paths naming the
/// same existing file are repeats.
pub fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(std::fs::canonicalize(p).unwrap_or_else(|_| p.clone())))
        .collect()
}

/// Find every metafile directly inside `dir`, sorted by file name. Files
/// ending in `skip_suffix` are previous outputs and are left out, as are
/// symlinks and directories.
pub fn find_metafiles(dir: &Path, skip_suffix: &str) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let e = entry.map_err(|e| Error::io(dir, e))?;
        let ft = e.file_type().map_err(|err| Error::io(e.path(), err))?;
        if !ft.is_file() {
            continue;
        }
        let name = e.file_name();
        let name = name.to_string_lossy();
        if !skip_suffix.is_empty() && name.ends_with(skip_suffix) {
            continue;
        }
        if Metafile::from_name(&name).is_some() {
            result.push(e.path());
        }
    }
    result.sort();
    Ok(result)
}

/// Read the given file into a configuration.
pub fn read_config(path: &Path) -> Result<Config> {
    let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    toml::from_str(&data).map_err(|e| Error::Config {
        path: path.to_owned(),
        message: e.to_string(),
    })
}

use crate::error::{Error, Malformed, Result};
use crate::ninja;
use crate::util;
use std::path::{Path, PathBuf};

/// The kinds of metafile the vendor build leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metafile {
    /// Preprocessor definitions, passed through unchanged.
    Defines,
    /// A C or C++ compiler invocation.
    CFlags,
    /// The final link invocation.
    LdFlags,
    /// Extra objects and libraries handed to the linker.
    LdLibs,
    /// A generated ninja build file.
    Ninja,
    /// The linker response file listing the application's objects.
    ElfRsp,
}

impl Metafile {
    pub const ALL: [Metafile; 6] = [
        Metafile::Defines,
        Metafile::CFlags,
        Metafile::LdFlags,
        Metafile::LdLibs,
        Metafile::Ninja,
        Metafile::ElfRsp,
    ];

    /// File name suffixes that select this kind.
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            Metafile::Defines => &[".defines"],
            Metafile::CFlags => &[".cflags", ".cxxflags"],
            Metafile::LdFlags => &[".ldflags"],
            Metafile::LdLibs => &[".ldlibs"],
            Metafile::Ninja => &[".ninja"],
            Metafile::ElfRsp => &[".elf.rsp"],
        }
    }

    /// Classify a file name by its suffix.
    pub fn from_name(name: &str) -> Option<Metafile> {
        Metafile::ALL
            .into_iter()
            .find(|kind| kind.suffixes().iter().any(|s| name.ends_with(*s)))
    }

    /// Classify the file at `path`.
    pub fn from_path(path: &Path) -> Result<Metafile> {
        path.file_name()
            .and_then(|name| Metafile::from_name(&name.to_string_lossy()))
            .ok_or_else(|| Error::Unsupported {
                path: path.to_owned(),
            })
    }
}

/// Applies the per kind rewrite rules and writes the results out. Holds the
/// settings that stay constant across one invocation.
#[derive(Debug, Clone)]
pub struct Transformer {
    /// Project relative root joined onto rewritten paths.
    pub prj_dir: PathBuf,
    /// Directory outputs are written to.
    pub build_dir: PathBuf,
    /// Appended to the input file name to form the output file name.
    pub suffix: String,
    /// Absolute object paths are rewritten relative to this directory.
    pub cwd: PathBuf,
}

impl Transformer {
    /// Build a transformer. Outputs are whitespace separated, so a `prj_dir`
    /// containing whitespace is refused.
    pub fn new(
        prj_dir: PathBuf,
        build_dir: PathBuf,
        suffix: String,
        cwd: PathBuf,
    ) -> Result<Transformer> {
        if prj_dir.to_string_lossy().contains(char::is_whitespace) {
            return Err(Error::PrjDir { path: prj_dir });
        }
        Ok(Transformer {
            prj_dir,
            build_dir,
            suffix,
            cwd,
        })
    }

    /// Produce the output tokens for a metafile of the given kind.
    pub fn transform(
        &self,
        kind: Metafile,
        content: &str,
    ) -> std::result::Result<Vec<String>, Malformed> {
        match kind {
            Metafile::Defines => Ok(defines(content)),
            Metafile::CFlags => c_flags(content),
            Metafile::LdFlags => ld_flags(content, &self.prj_dir),
            Metafile::LdLibs => Ok(ld_libs(content, &self.prj_dir)),
            Metafile::Ninja => Ok(include_flags(content, &self.prj_dir)),
            Metafile::ElfRsp => Ok(objects(content, &self.prj_dir, &self.cwd)),
        }
    }

    /// Where the transformed version of `input` goes.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut name = input
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.suffix);
        self.build_dir.join(name)
    }

    /// Read, transform and write out a single metafile. Returns the path
    /// written.
    pub fn process(&self, path: &Path) -> Result<PathBuf> {
        let kind = Metafile::from_path(path)?;
        let content = util::read_metafile(path)?;
        let tokens = self
            .transform(kind, &content)
            .map_err(|cause| Error::Malformed {
                path: path.to_owned(),
                cause,
            })?;

        let out = self.output_path(path);
        if clobbers(&out, path) {
            return Err(Error::Clobber { path: out });
        }
        util::write_tokens(&out, &tokens)?;
        Ok(out)
    }

    /// Process each metafile in turn, stopping at the first failure. Outputs
    /// written before the failure are kept.
    pub fn process_all(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        paths.iter().map(|p| self.process(p)).collect()
    }
}

/// Whether writing `out` would overwrite `input`.
fn clobbers(out: &Path, input: &Path) -> bool {
    if out == input {
        return true;
    }
    match (std::fs::canonicalize(out), std::fs::canonicalize(input)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn tokens(content: &str) -> Vec<String> {
    content.split_whitespace().map(str::to_owned).collect()
}

/// Definitions are passed through as they are.
pub fn defines(content: &str) -> Vec<String> {
    tokens(content)
}

/// The compiler flags of interest sit between `-c` and `-MMD`.
pub fn c_flags(content: &str) -> std::result::Result<Vec<String>, Malformed> {
    let cmd = tokens(content);
    let start = cmd
        .iter()
        .position(|t| t == "-c")
        .ok_or(Malformed::MissingSentinel("-c"))?
        + 1;
    let end = cmd
        .iter()
        .position(|t| t == "-MMD")
        .ok_or(Malformed::MissingSentinel("-MMD"))?;
    if end < start {
        return Err(Malformed::SentinelOrder);
    }
    Ok(cmd[start..end].to_vec())
}

/// Keep the link flags up to and including the linker script; the map file,
/// objects and output image after it belong to the consuming build. Library
/// search paths and the linker script are made relative to `prj_dir`. A
/// script given as `-T <path>` is folded into a single token.
pub fn ld_flags(
    content: &str,
    prj_dir: &Path,
) -> std::result::Result<Vec<String>, Malformed> {
    let mut cmd = tokens(content);
    let script = cmd
        .iter()
        .position(|t| t.starts_with("-T"))
        .ok_or(Malformed::NoLinkerScript)?;

    let inline = cmd[script][2..].trim_matches('"');
    let path = if inline.is_empty() {
        cmd.get(script + 1)
            .map(|t| t.trim_matches('"'))
            .unwrap_or_default()
    } else {
        inline
    };
    if path.is_empty() {
        return Err(Malformed::EmptyLinkerScript);
    }
    // The quote is closed by whoever consumes the flags.
    let script_arg = format!("-T\"{}", util::join(prj_dir, path));
    cmd.truncate(script);

    let mut i = 0;
    while i + 1 < cmd.len() {
        if cmd[i] == "-L" {
            let path = util::join(prj_dir, &cmd[i + 1]);
            cmd[i + 1] = path;
            i += 2;
        } else {
            i += 1;
        }
    }

    cmd.push(script_arg);
    Ok(cmd)
}

/// Every extra object or library is made relative to `prj_dir`.
pub fn ld_libs(content: &str, prj_dir: &Path) -> Vec<String> {
    tokens(content)
        .iter()
        .map(|t| util::join(prj_dir, t))
        .collect()
}

/// The `-I` flags of the ninja `incflags` block, relative to `prj_dir`.
pub fn include_flags(content: &str, prj_dir: &Path) -> Vec<String> {
    ninja::include_paths(content)
        .iter()
        .map(|p| format!("-I{}", util::join(prj_dir, p)))
        .collect()
}

/// The application objects from a linker response file, without the host
/// project's `main.o`. Absolute paths become relative to `cwd`, relative
/// ones are joined onto `prj_dir`.
pub fn objects(content: &str, prj_dir: &Path, cwd: &Path) -> Vec<String> {
    content
        .split_whitespace()
        .map(Path::new)
        .filter(|p| p.file_name().map_or(true, |n| n != "main.o"))
        .map(|p| {
            if p.is_absolute() {
                cwd_relative(p, cwd)
            } else {
                util::join(prj_dir, &p.to_string_lossy())
            }
        })
        .collect()
}

/// `path` as seen from `cwd`. Left absolute when `cwd` has `..` components
/// that cannot be walked back.
fn cwd_relative(path: &Path, cwd: &Path) -> String {
    match pathdiff::diff_paths(path, cwd) {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_owned(),
        Some(rel) => rel.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

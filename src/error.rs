use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Ways a metafile's content can fail to match the toolchain's invocation
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("sentinel token `{0}` not found")]
    MissingSentinel(&'static str),
    #[error("`-MMD` appears before `-c`")]
    SentinelOrder,
    #[error("no linker script (`-T...`) token found")]
    NoLinkerScript,
    #[error("`-T` is not followed by a linker script path")]
    EmptyLinkerScript,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: no such file", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: unsupported metafile type", path.display())]
    Unsupported { path: PathBuf },
    #[error("{}: malformed metafile: {cause}", path.display())]
    Malformed { path: PathBuf, cause: Malformed },
    #[error("{}: invalid configuration: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("{}: output would overwrite its input", path.display())]
    Clobber { path: PathBuf },
    #[error("{}: project directory must not contain whitespace", path.display())]
    PrjDir { path: PathBuf },
}

impl Error {
    /// Wrap an io error for `path`, singling out a missing file.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Error::MissingFile { path, source },
            _ => Error::Io { path, source },
        }
    }
}

use serde_derive::Deserialize;
use std::path::PathBuf;

/// Name of the configuration file picked up from the metafiles directory
/// when none is given explicitly.
pub const DEFAULT_CONFIG: &str = "mtbflags.toml";

/// Suffix appended to output file names when none is configured.
pub const DEFAULT_SUFFIX: &str = "_mpy";

/// Settings read from a TOML configuration file. Every field is optional;
/// command line flags take precedence.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Project relative root joined onto rewritten paths.
    #[serde(default)]
    pub prj_dir: Option<PathBuf>,
    /// Directory holding the input metafiles.
    #[serde(default)]
    pub metafiles_dir: Option<PathBuf>,
    /// Directory the transformed files are written to.
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
    /// Suffix appended to each output file name.
    #[serde(default)]
    pub suffix: Option<String>,
}

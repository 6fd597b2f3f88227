//! Reading the include search path out of a generated ninja build file.
//!
//! The vendor build emits the include flags as a single variable spread over
//! continuation lines:
//!
//! ```text
//! incflags = $
//!     $ -I../bsps/TARGET_APP $
//!     $ -I../mtb_shared/core-lib/include
//! cflags = ...
//! ```

/// Line that opens the include flag block.
const BLOCK_START: &str = "incflags = $";

/// Prefix of an include flag continuation line, after trimming.
const INCLUDE_LINE: &str = "$ -I";

/// Where the scanner is relative to the `incflags` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Still looking for the block start.
    Before,
    /// Inside the block.
    Inside,
}

/// Collect the include paths listed in the `incflags` block of a ninja file,
/// in order, without their `-I` prefix.
///
/// Returns an empty list when the file has no such block.
pub fn include_paths(content: &str) -> Vec<String> {
    let mut state = State::Before;
    let mut paths = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        match state {
            State::Before => {
                if line.starts_with(BLOCK_START) {
                    state = State::Inside;
                }
            }
            State::Inside => {
                if line.starts_with(INCLUDE_LINE) {
                    if let Some(path) = include_path(line) {
                        paths.push(path.to_owned());
                    }
                } else if line.is_empty() || line.contains('=') {
                    break;
                }
            }
        }
    }

    paths
}

/// Extract the path from a `$ -I<path> $` continuation line.
fn include_path(line: &str) -> Option<&str> {
    let flag = line
        .strip_prefix('$')?
        .trim_end()
        .trim_end_matches('$')
        .trim();
    let path = flag.strip_prefix("-I")?.trim();
    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_NINJA: &str = "\
ninja_required_version = 1.5
rule cc
  command = arm-none-eabi-gcc $cflags $incflags -c $in -o $out

incflags = $
    $ -I../bsps/TARGET_APP $
    $ -I../mtb_shared/core-lib/include $
    $ -I. $
    $ -Iconfig
cflags = -O2 -g
";

    #[test]
    fn block_paths_in_order() {
        assert_eq!(
            include_paths(BUILD_NINJA),
            vec!["../bsps/TARGET_APP", "../mtb_shared/core-lib/include", ".", "config"]
        );
    }

    #[test]
    fn missing_block_is_empty() {
        assert!(include_paths("cflags = -O2\nrule cc\n  command = gcc\n").is_empty());
        assert!(include_paths("").is_empty());
    }

    #[test]
    fn empty_line_ends_block() {
        let content = "incflags = $\n  $ -Ia $\n\n  $ -Ib\n";
        assert_eq!(include_paths(content), vec!["a"]);
    }

    #[test]
    fn next_variable_ends_block() {
        let content = "incflags = $\n  $ -Ia $\ndefines = -DX\n  $ -Ib\n";
        assert_eq!(include_paths(content), vec!["a"]);
    }

    #[test]
    fn other_continuation_lines_are_ignored() {
        let content = "incflags = $\n  $ -Ia $\n  $ -isystem $\n  $ -Ib\n";
        assert_eq!(include_paths(content), vec!["a", "b"]);
    }

    #[test]
    fn empty_include_line_is_skipped() {
        let content = "incflags = $\n  $ -I $\n  $ -Ib\n";
        assert_eq!(include_paths(content), vec!["b"]);
    }

    #[test]
    fn lines_before_block_are_ignored() {
        let content = "  $ -Iearly $\nincflags = $\n  $ -Ilate\n";
        assert_eq!(include_paths(content), vec!["late"]);
    }
}

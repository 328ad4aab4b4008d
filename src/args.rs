/*!
Command line of the test programs.

```text
test-name [-auto] [-fbo] [-subtest NAME]... [-list-subtests] [ARGS]...
```

The single-dash spelling of the long flags is the historical one and is accepted along with
the usual `--auto` spelling.

*/
use std::ffi::OsString;

use clap::Parser;

/// Flags that may be written with a single dash.
const LEGACY_FLAGS: &[&str] = &["auto", "fbo", "subtest", "list-subtests"];

/// Parsed command line of a test program.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(about = "OpenGL conformance test", disable_version_flag = true)]
pub struct Args {
    /// Run without user interaction and exit with the result.
    #[arg(long)]
    pub auto: bool,

    /// Render into a window-sized framebuffer object instead of the window.
    #[arg(long)]
    pub fbo: bool,

    /// Only run the named subtest. Can be repeated.
    #[arg(long = "subtest", value_name = "NAME")]
    pub subtests: Vec<String>,

    /// Print the names of the subtests and exit.
    #[arg(long)]
    pub list_subtests: bool,

    /// Arguments interpreted by the test, like format names.
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    pub positional: Vec<String>,
}

impl Args {
    /// Parses the command line of the process.
    pub fn from_env() -> Result<Args, clap::Error> {
        Args::parse_normalized(std::env::args_os())
    }

    /// Parses a command line, the first item being the program name.
    pub fn parse_normalized<I, T>(args: I) -> Result<Args, clap::Error>
        where I: IntoIterator<Item = T>, T: Into<OsString>
    {
        Args::try_parse_from(args.into_iter().map(|arg| normalize(arg.into())))
    }

    /// Returns true if a subtest should run: no `-subtest` was given, or one of them matches
    /// the name regardless of case.
    pub fn is_subtest_selected(&self, name: &str) -> bool {
        self.subtests.is_empty() ||
        self.subtests.iter().any(|selected| selected.eq_ignore_ascii_case(name))
    }

    /// Returns true if a positional argument is equal to `value`.
    pub fn has_positional(&self, value: &str) -> bool {
        self.positional.iter().any(|arg| arg == value)
    }
}

/// Rewrites `-auto` as `--auto`, and likewise for the other legacy flags.
fn normalize(arg: OsString) -> OsString {
    let rewritten = match arg.to_str() {
        Some(text) if text.starts_with('-') && !text.starts_with("--") => {
            let name = &text[1 ..];
            let (flag, value) = match name.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (name, None),
            };

            if LEGACY_FLAGS.contains(&flag) {
                Some(match value {
                    Some(value) => format!("--{}={}", flag, value),
                    None => format!("--{}", flag),
                })
            } else {
                None
            }
        },
        _ => None,
    };

    rewritten.map(OsString::from).unwrap_or(arg)
}

#[cfg(test)]
mod tests {
    use super::Args;

    fn parse(args: &[&str]) -> Args {
        Args::parse_normalized(std::iter::once("test").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn legacy_flags() {
        let args = parse(&["-auto", "-fbo", "-subtest", "GL_RGBA8", "-subtest=GL_RGB565"]);
        assert!(args.auto);
        assert!(args.fbo);
        assert_eq!(args.subtests, vec!["GL_RGBA8", "GL_RGB565"]);
        assert!(!args.list_subtests);
    }

    #[test]
    fn double_dash_and_positionals() {
        let args = parse(&["GL_RGBA8", "--auto", "window"]);
        assert!(args.auto);
        assert_eq!(args.positional, vec!["GL_RGBA8", "window"]);
        assert!(args.has_positional("window"));
        assert!(!args.has_positional("fbo"));
    }

    #[test]
    fn list_subtests() {
        assert!(parse(&["-list-subtests"]).list_subtests);
    }

    #[test]
    fn unknown_flags_are_errors() {
        assert!(Args::parse_normalized(["test", "-bogus"]).is_err());
    }

    #[test]
    fn subtest_selection() {
        assert!(Args::default().is_subtest_selected("anything"));

        let args = parse(&["-subtest", "gl_rgba8"]);
        assert!(args.is_subtest_selected("GL_RGBA8"));
        assert!(!args.is_subtest_selected("GL_RGB8"));
    }
}

/*!
Test results and the reporting protocol.

Results are written on stdout as JSON documents prefixed with `PIGLIT: `, one per line:

```text
PIGLIT: {"enumerate subtests":["GL_RGBA8","GL_RGB565"]}
PIGLIT: {"subtest":{"GL_RGBA8":"pass"}}
PIGLIT: {"subtest":{"GL_RGB565":"skip"}}
PIGLIT: {"result":"pass"}
```

The last line is authoritative. The exit code only distinguishes failures from the rest.

*/
use std::fmt;
use std::io::{self, Write};
use std::process;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Outcome of a test or of a subtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Everything matched.
    Pass,
    /// Something didn't match.
    Fail,
    /// The implementation lacks a feature the test requires.
    Skip,
    /// The test passed, but something looked questionable.
    Warn,
}

impl TestResult {
    /// Returns the lowercase name used in the output protocol.
    pub fn as_str(&self) -> &'static str {
        match *self {
            TestResult::Pass => "pass",
            TestResult::Fail => "fail",
            TestResult::Skip => "skip",
            TestResult::Warn => "warn",
        }
    }

    /// Converts a boolean check into `Pass` or `Fail`.
    #[inline]
    pub fn from_bool(pass: bool) -> TestResult {
        if pass { TestResult::Pass } else { TestResult::Fail }
    }

    /// Exit code of the process reporting this result.
    pub fn exit_code(&self) -> i32 {
        match *self {
            TestResult::Pass | TestResult::Skip | TestResult::Warn => 0,
            TestResult::Fail => 1,
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for TestResult {
    fn from(pass: bool) -> TestResult {
        TestResult::from_bool(pass)
    }
}

/// Merges the result of a subtest into an overall result.
///
/// `Fail` overrides everything, `Warn` overrides `Pass` and `Skip`, `Pass` overrides `Skip`,
/// and `Skip` never overrides anything.
pub fn merge_result(all: &mut TestResult, subtest: TestResult) {
    match subtest {
        TestResult::Fail => *all = TestResult::Fail,
        TestResult::Warn => {
            if *all == TestResult::Skip || *all == TestResult::Pass {
                *all = TestResult::Warn;
            }
        },
        TestResult::Pass => {
            if *all == TestResult::Skip {
                *all = TestResult::Pass;
            }
        },
        TestResult::Skip => (),
    }
}

/// Formats the line announcing the final result.
pub fn result_line(result: TestResult) -> String {
    format!("PIGLIT: {}", json!({ "result": result }))
}

/// Formats the line announcing the result of a subtest.
pub fn subtest_line(name: &str, result: TestResult) -> String {
    format!("PIGLIT: {}", json!({ "subtest": { name: result } }))
}

/// Formats the line listing the subtests that are about to run.
pub fn enumerate_subtests_line(names: &[&str]) -> String {
    format!("PIGLIT: {}", json!({ "enumerate subtests": names }))
}

/// Writes the result of a subtest on stdout.
pub fn report_subtest(name: &str, result: TestResult) {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let _ = writeln!(lock, "{}", subtest_line(name, result));
    let _ = lock.flush();
}

/// Writes the final result on stdout and exits the process.
pub fn report_result(result: TestResult) -> ! {
    {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        let _ = writeln!(lock, "{}", result_line(result));
        let _ = lock.flush();
    }

    log::debug!("exiting with {}", result);
    process::exit(result.exit_code())
}

#[cfg(test)]
mod tests {
    use super::{enumerate_subtests_line, merge_result, result_line, subtest_line, TestResult};

    fn merged(all: TestResult, subtest: TestResult) -> TestResult {
        let mut all = all;
        merge_result(&mut all, subtest);
        all
    }

    #[test]
    fn fail_overrides_everything() {
        for all in [TestResult::Pass, TestResult::Fail, TestResult::Skip, TestResult::Warn] {
            assert_eq!(merged(all, TestResult::Fail), TestResult::Fail);
        }
    }

    #[test]
    fn warn_and_pass_precedence() {
        assert_eq!(merged(TestResult::Pass, TestResult::Warn), TestResult::Warn);
        assert_eq!(merged(TestResult::Skip, TestResult::Warn), TestResult::Warn);
        assert_eq!(merged(TestResult::Fail, TestResult::Warn), TestResult::Fail);
        assert_eq!(merged(TestResult::Skip, TestResult::Pass), TestResult::Pass);
        assert_eq!(merged(TestResult::Warn, TestResult::Pass), TestResult::Warn);
        assert_eq!(merged(TestResult::Fail, TestResult::Pass), TestResult::Fail);
    }

    #[test]
    fn skip_never_overrides() {
        for all in [TestResult::Pass, TestResult::Fail, TestResult::Skip, TestResult::Warn] {
            assert_eq!(merged(all, TestResult::Skip), all);
        }
    }

    #[test]
    fn protocol_lines() {
        assert_eq!(result_line(TestResult::Pass), r#"PIGLIT: {"result":"pass"}"#);
        assert_eq!(subtest_line("GL_RGBA8", TestResult::Skip),
                   r#"PIGLIT: {"subtest":{"GL_RGBA8":"skip"}}"#);
        assert_eq!(enumerate_subtests_line(&["a", "b"]),
                   r#"PIGLIT: {"enumerate subtests":["a","b"]}"#);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(TestResult::Pass.exit_code(), 0);
        assert_eq!(TestResult::Skip.exit_code(), 0);
        assert_eq!(TestResult::Warn.exit_code(), 0);
        assert_eq!(TestResult::Fail.exit_code(), 1);
    }
}

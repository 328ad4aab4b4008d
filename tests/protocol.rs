use std::collections::HashMap;

use piglit::error::TestError;
use piglit::fbo::FramebufferError;
use piglit::program::{ProgramCreationError, ShaderType};
use piglit::result::{enumerate_subtests_line, merge_result, result_line, subtest_line};
use piglit::{gl, GlError, TestResult};

/// Parses a protocol line the way the test runner does.
fn parse_line(line: &str) -> serde_json::Value {
    let json = line.strip_prefix("PIGLIT: ").expect("missing PIGLIT: prefix");
    serde_json::from_str(json).unwrap()
}

#[test]
fn runner_reads_final_result() {
    for result in [TestResult::Pass, TestResult::Fail, TestResult::Skip, TestResult::Warn] {
        let value = parse_line(&result_line(result));
        let parsed: TestResult = serde_json::from_value(value["result"].clone()).unwrap();
        assert_eq!(parsed, result);
    }
}

#[test]
fn runner_reads_subtests() {
    let value = parse_line(&subtest_line("GL_RGB565", TestResult::Skip));
    let subtests: HashMap<String, TestResult> =
        serde_json::from_value(value["subtest"].clone()).unwrap();
    assert_eq!(subtests.get("GL_RGB565"), Some(&TestResult::Skip));

    let value = parse_line(&enumerate_subtests_line(&["a b", "c\"d"]));
    assert_eq!(value["enumerate subtests"], serde_json::json!(["a b", "c\"d"]));
}

#[test]
fn subtests_merge_into_final_result() {
    let subtests = [TestResult::Skip, TestResult::Pass, TestResult::Warn, TestResult::Pass];
    let mut all = TestResult::Skip;
    for result in subtests {
        merge_result(&mut all, result);
    }
    assert_eq!(all, TestResult::Warn);

    merge_result(&mut all, TestResult::Fail);
    merge_result(&mut all, TestResult::Pass);
    assert_eq!(all, TestResult::Fail);
}

#[test]
fn errors_map_to_results() {
    assert_eq!(TestError::unsupported("Test requires GL_ARB_foo").result(), TestResult::Skip);
    assert_eq!(TestError::failed("mismatch").result(), TestResult::Fail);

    let unsupported_fbo = TestError::from(FramebufferError::Incomplete(gl::FRAMEBUFFER_UNSUPPORTED));
    assert_eq!(unsupported_fbo.result(), TestResult::Skip);
    let broken_fbo =
        TestError::from(FramebufferError::Incomplete(gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT));
    assert_eq!(broken_fbo.result(), TestResult::Fail);

    let compile = TestError::from(ProgramCreationError::CompilationError(
        "0:1: syntax error".to_owned(), ShaderType::Fragment));
    assert_eq!(compile.result(), TestResult::Fail);
    assert_eq!(TestError::from(ProgramCreationError::ShaderTypeNotSupported).result(),
               TestResult::Skip);

    let gl_error = TestError::Gl { error: GlError::InvalidEnum, location: "x.rs:3".to_owned() };
    assert_eq!(gl_error.result(), TestResult::Fail);
    assert_eq!(gl_error.to_string(),
               "Unexpected GL error: GL_INVALID_ENUM 0x500\n(Error at x.rs:3)");
}

#[test]
fn exit_codes() {
    assert_eq!(TestResult::Pass.exit_code(), 0);
    assert_eq!(TestResult::Skip.exit_code(), 0);
    assert_eq!(TestResult::Warn.exit_code(), 0);
    assert_eq!(TestResult::Fail.exit_code(), 1);
}

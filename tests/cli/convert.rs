use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, run};

const ANNOTATED: &str = r#"/** @ngInject */
function MainCtrl($scope, $http) {
  $scope.items = [];
}
"#;

const CONVERTED: &str = r#"function MainCtrl($scope, $http) {
  "ngInject";
  $scope.items = [];
}
"#;

#[test]
fn test_convert_dry_run() -> Result<()> {
    let test = CliTest::with_file("src/app.js", ANNOTATED)?;

    let (code, stdout, _) = run(&mut test.convert_command())?;

    assert_eq!(code, 1, "pending changes fail the dry run");
    assert!(stdout.contains("Would convert 1 file(s):"));
    assert!(stdout.contains("  - ./src/app.js"));
    assert!(stdout.contains("Run with --apply to write these changes."));
    assert_eq!(test.read_file("src/app.js")?, ANNOTATED);
    Ok(())
}

#[test]
fn test_convert_apply() -> Result<()> {
    let test = CliTest::with_file("src/app.js", ANNOTATED)?;

    let (code, stdout, _) = run(test.convert_command().arg("--apply"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Converted 1 file(s)."));
    assert_eq!(test.read_file("src/app.js")?, CONVERTED);
    Ok(())
}

#[test]
fn test_convert_twice_is_a_no_op() -> Result<()> {
    let test = CliTest::with_file("src/app.js", ANNOTATED)?;
    run(test.convert_command().arg("--apply"))?;

    let (code, stdout, _) = run(test.convert_command().arg("--apply"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Checked 1 source file - nothing to convert"));
    assert_eq!(test.read_file("src/app.js")?, CONVERTED);
    Ok(())
}

#[test]
fn test_convert_reports_unresolved_marker() -> Result<()> {
    let content = "/** @ngInject */\nvar answer = 42;\n";
    let test = CliTest::with_file("app.js", content)?;

    let (code, stdout, _) = run(test.convert_command().arg("--apply"))?;

    assert_eq!(code, 1);
    assert!(stdout.contains("warning: @ngInject does not annotate anything  unresolved-annotation"));
    assert!(stdout.contains("--> ./app.js:1:1"));
    assert!(stdout.contains("= note: no function follows the comment"));
    assert!(stdout.contains("1 problems (0 errors, 1 warning)"));
    assert_eq!(test.read_file("app.js")?, content);
    Ok(())
}

#[test]
fn test_convert_parse_error() -> Result<()> {
    let content = "/** @ngInject */\nfunction broken($x {\n";
    let test = CliTest::with_file("app.js", content)?;

    let (code, stdout, stderr) = run(test.convert_command().arg("--apply"))?;
    assert_eq!(code, 2);
    assert!(!stdout.contains("parse-error"));
    assert!(stderr.contains("1 file(s) could not be parsed (use -v for details)"));
    assert_eq!(test.read_file("app.js")?, content);

    let (code, stdout, _) = run(test.convert_command().arg("-v"))?;
    assert_eq!(code, 2);
    assert!(stdout.contains("error: Failed to parse ./app.js:2:"));
    assert!(stdout.contains("parse-error"));
    Ok(())
}

#[test]
fn test_convert_quote_char_argument() -> Result<()> {
    let test = CliTest::with_file("app.js", "// @ngInject\nfunction foo($x) { return $x; }\n")?;

    let (code, _, _) = run(test.convert_command().args(["--apply", "--quote-char", "'"]))?;

    assert_eq!(code, 0);
    assert_eq!(
        test.read_file("app.js")?,
        "function foo($x) { 'ngInject'; return $x; }\n"
    );
    Ok(())
}

#[test]
fn test_convert_quote_char_from_config() -> Result<()> {
    let test = CliTest::with_file("app.js", "// @ngInject\nfunction foo($x) { return $x; }\n")?;
    test.write_file(".ngmigraterc.json", r#"{ "quoteChar": "'" }"#)?;

    run(test.convert_command().arg("--apply"))?;

    assert_eq!(
        test.read_file("app.js")?,
        "function foo($x) { 'ngInject'; return $x; }\n"
    );
    Ok(())
}

#[test]
fn test_convert_rejects_invalid_quote_char() -> Result<()> {
    let test = CliTest::with_file("app.js", ANNOTATED)?;

    let (code, _, stderr) = run(test.convert_command().args(["--quote-char", "`"]))?;

    assert_eq!(code, 2);
    assert!(stderr.contains("Error: Invalid 'quoteChar'"));
    Ok(())
}

#[test]
fn test_convert_pattern_argument() -> Result<()> {
    let test = CliTest::with_file("src/app.js", ANNOTATED)?;
    test.write_file("lib/other.js", ANNOTATED)?;

    let (code, _, _) = run(test.convert_command().args(["src/*.js", "--apply"]))?;

    assert_eq!(code, 0);
    assert_eq!(test.read_file("src/app.js")?, CONVERTED);
    assert_eq!(test.read_file("lib/other.js")?, ANNOTATED);
    Ok(())
}

#[test]
fn test_convert_skips_node_modules() -> Result<()> {
    let test = CliTest::with_file("node_modules/lib/index.js", ANNOTATED)?;

    let (code, stdout, _) = run(test.convert_command().arg("--apply"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Checked 0 source files - nothing to convert"));
    assert_eq!(test.read_file("node_modules/lib/index.js")?, ANNOTATED);
    Ok(())
}

#[test]
fn test_convert_writes_source_map() -> Result<()> {
    let test = CliTest::with_file("app.js", ANNOTATED)?;

    let (code, stdout, _) = run(test.convert_command().args(["--apply", "--source-map"]))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("  - source maps: 1 file(s)"));
    let map: Value = serde_json::from_str(&test.read_file("app.js.map")?)?;
    assert_eq!(map["version"], 3);
    assert_eq!(map["sources"], serde_json::json!(["./app.js"]));
    assert!(!map["mappings"].as_str().unwrap_or_default().is_empty());
    Ok(())
}

#[test]
fn test_convert_composes_existing_source_map() -> Result<()> {
    let test = CliTest::with_file("app.js", "/** @ngInject */\nfunction foo($x) { return $x; }\n")?;
    test.write_file(
        "app.js.map",
        r#"{"version":3,"file":"app.js","sources":["app.ts"],"names":[],"mappings":"AAAA;AACA"}"#,
    )?;

    let (code, _, _) = run(test.convert_command().args(["--apply", "--source-map"]))?;

    assert_eq!(code, 0);
    let map: Value = serde_json::from_str(&test.read_file("app.js.map")?)?;
    assert_eq!(map["sources"], serde_json::json!(["app.ts"]));
    Ok(())
}

#[test]
fn test_convert_without_source_map_flag_leaves_map_alone() -> Result<()> {
    let test = CliTest::with_file("app.js", ANNOTATED)?;

    run(test.convert_command().arg("--apply"))?;

    assert!(!test.root().join("app.js.map").exists());
    Ok(())
}

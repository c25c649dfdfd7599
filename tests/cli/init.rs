use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["includes"], serde_json::json!(["**/*.js"]));
    assert_eq!(parsed["ignores"], serde_json::json!(["**/node_modules/**"]));
    assert_eq!(parsed["quoteChar"], "\"");
    assert_eq!(parsed["sourceMaps"], false);
    assert_eq!(parsed["sourceRoot"], "./");

    assert!(
        content.contains("  \"includes\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("init"))?;
    assert_eq!(code, 0);
    assert!(stdout.contains("Created .ngmigraterc.json"));

    assert!(test.root().join(".ngmigraterc.json").exists());
    let content = test.read_file(".ngmigraterc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".ngmigraterc.json", "{}")?;

    let (code, _, stderr) = run(test.command().arg("init"))?;
    assert_eq!(code, 1);
    assert!(stderr.contains("Error: .ngmigraterc.json already exists"));
    assert_eq!(test.read_file(".ngmigraterc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_used_by_convert() -> Result<()> {
    let test = CliTest::new()?;
    run(test.command().arg("init"))?;
    test.write_file("app.js", "// @ngInject\nfunction foo($x) { return $x; }\n")?;

    let (code, stdout, _) = run(test.convert_command().arg("--apply"))?;
    assert_eq!(code, 0, "stdout:\n{}", stdout);
    assert_eq!(
        test.read_file("app.js")?,
        "function foo($x) { \"ngInject\"; return $x; }\n"
    );

    Ok(())
}

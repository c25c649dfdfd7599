use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_list_files_with_marker() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/* @ngInject */\nfunction a($http) {}\n")?;
    test.write_file("src/b.js", "function b() {}\n")?;

    let (code, stdout, _) = run(&mut test.list_command())?;

    assert_eq!(code, 0);
    assert!(stdout.contains("./src/a.js"));
    assert!(!stdout.contains("./src/b.js"));
    assert!(stdout.contains("1 of 2 file(s) contain @ngInject comments."));
    Ok(())
}

#[test]
fn test_list_nothing_found() -> Result<()> {
    let test = CliTest::with_file("app.js", "function b() {}\n")?;

    let (code, stdout, _) = run(&mut test.list_command())?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Checked 1 source file - no @ngInject comments found"));
    Ok(())
}

#[test]
fn test_list_with_source_root() -> Result<()> {
    let test = CliTest::with_file("web/app.js", "// @ngInject\nfunction a($q) {}\n")?;
    test.write_file("app.js", "// @ngInject\nfunction b($q) {}\n")?;

    let (code, stdout, _) = run(test.list_command().args(["--source-root", "web"]))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("web/app.js"));
    assert!(stdout.contains("1 of 1 file(s)"));
    Ok(())
}

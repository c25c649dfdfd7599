use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Sorted, without duplicates.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Ignore rules: literal paths match by prefix, globs match the path relative to the base.
struct IgnoreRules<'a> {
    base: &'a Path,
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreRules<'_> {
    fn is_ignored(&self, path: &Path) -> bool {
        if self
            .literal_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            return true;
        }
        let relative = relative_path(self.base, path);
        self.patterns.iter().any(|p| p.matches(&relative))
    }
}

/// Collect source files under `base_dir`.
///
/// Glob includes select files by their path relative to `base_dir`
/// (e.g. `**/*.js`); literal includes name a file or a directory whose
/// script files are all taken. Without includes every script file is taken.
pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignore_patterns: &[String],
    verbose: bool,
) -> ScanResult {
    let base = Path::new(base_dir);
    let mut files: BTreeSet<String> = BTreeSet::new();
    let mut skipped_count = 0;

    let mut ignore = IgnoreRules {
        base,
        literal_paths: Vec::new(),
        patterns: Vec::new(),
    };
    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => ignore.patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            ignore.literal_paths.push(base.join(p));
        }
    }

    let mut include_patterns: Vec<Pattern> = Vec::new();
    let mut roots: Vec<PathBuf> = Vec::new();
    if includes.is_empty() {
        roots.push(base.to_path_buf());
    }
    for inc in includes {
        if is_glob_pattern(inc) {
            match Pattern::new(inc) {
                Ok(pattern) => include_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid glob pattern '{}': {}",
                            "warning:".bold().yellow(),
                            inc,
                            e
                        );
                    }
                }
            }
        } else {
            let path = base.join(inc);
            if path.exists() {
                roots.push(path);
            } else if verbose {
                eprintln!(
                    "{} Include path does not exist: {}",
                    "warning:".bold().yellow(),
                    path.display()
                );
            }
        }
    }

    let mut walk = |root: &Path, accept: &dyn Fn(&Path) -> bool| {
        let entries = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry: &DirEntry| !ignore.is_ignored(entry.path()));
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && accept(path) {
                files.insert(path.to_string_lossy().into_owned());
            }
        }
    };

    if !include_patterns.is_empty() {
        walk(base, &|path| {
            let relative = relative_path(base, path);
            include_patterns.iter().any(|p| p.matches(&relative))
        });
    }
    for root in &roots {
        walk(root, &is_scannable_file);
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

/// `path` relative to `base` with `/` separators.
fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts")
    )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| relative_path(base, Path::new(f)))
            .collect()
    }

    #[test]
    fn test_scan_default_glob() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("app.js")).unwrap();
        File::create(dir_path.join("types.ts")).unwrap();
        File::create(dir_path.join("style.css")).unwrap();
        fs::create_dir_all(dir_path.join("src/components")).unwrap();
        File::create(dir_path.join("src/components/list.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["**/*.js".to_owned()],
            &[],
            false,
        );

        assert_eq!(
            names(&result, dir_path),
            vec!["app.js", "src/components/list.js"]
        );
    }

    #[test]
    fn test_scan_ignores_node_modules() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let node_modules = dir_path.join("node_modules").join("angular");
        fs::create_dir_all(&node_modules).unwrap();
        File::create(node_modules.join("angular.js")).unwrap();
        File::create(dir_path.join("app.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["**/*.js".to_owned()],
            &["**/node_modules/**".to_owned()],
            false,
        );

        assert_eq!(names(&result, dir_path), vec!["app.js"]);
    }

    #[test]
    fn test_scan_without_includes_takes_script_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("app.js")).unwrap();
        File::create(dir_path.join("app.ts")).unwrap();
        File::create(dir_path.join("data.json")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[], false);

        assert_eq!(names(&result, dir_path), vec!["app.js", "app.ts"]);
    }

    #[test]
    fn test_scan_with_literal_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir(dir_path.join("src")).unwrap();
        File::create(dir_path.join("src/app.js")).unwrap();
        fs::create_dir(dir_path.join("lib")).unwrap();
        File::create(dir_path.join("lib/utils.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["src".to_owned(), "nonexistent".to_owned()],
            &[],
            false,
        );

        assert_eq!(names(&result, dir_path), vec!["src/app.js"]);
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("src/components")).unwrap();
        File::create(dir_path.join("src/components/button.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &[
                "src".to_owned(),
                "src/components".to_owned(),
                "**/*.js".to_owned(),
            ],
            &[],
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_ignores_literal_directory_path() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("src/vendor")).unwrap();
        File::create(dir_path.join("src/app.js")).unwrap();
        File::create(dir_path.join("src/vendor/lib.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["**/*.js".to_owned()],
            &["src/vendor".to_owned()],
            false,
        );

        assert_eq!(names(&result, dir_path), vec!["src/app.js"]);
    }

    #[test]
    fn test_is_scannable_file() {
        assert!(is_scannable_file(Path::new("app.js")));
        assert!(is_scannable_file(Path::new("app.mjs")));
        assert!(is_scannable_file(Path::new("app.tsx")));
        assert!(!is_scannable_file(Path::new("style.css")));
        assert!(!is_scannable_file(Path::new("app.js.map")));
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("**/*.js"));
        assert!(is_glob_pattern("file?.js"));
        assert!(!is_glob_pattern("src"));
        assert!(!is_glob_pattern("app/[legacy]"));
    }
}

/*!
 * Eligibility rules for directories and files
 */

use std::path::Path;

use glob_match::glob_match;
use regex::Regex;
use tracing::debug;

use crate::scanner::ScanOptions;
use crate::utils::{is_supported_extension, DEFAULT_IGNORE_DIRS, DEFAULT_IGNORE_FILES};

/// Exclude pattern compiled to an unanchored regex
#[derive(Debug, Clone)]
struct ExcludePattern {
    /// Compiled matcher; `None` if the pattern did not compile and matches nothing
    matcher: Option<Regex>,
}

impl ExcludePattern {
    fn new(pattern: &str) -> Self {
        let matcher = match Regex::new(&glob_to_regex(pattern)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                debug!("Exclude pattern {:?} does not compile, ignoring it: {}", pattern, e);
                None
            }
        };
        Self { matcher }
    }

    fn is_match(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

/// Translate a shell-style glob into a substring regex
///
/// `*` becomes `.*`, `?` becomes `.` and `.` is escaped. Every other
/// character passes through untouched.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '.' => out.push_str("\\."),
            other => out.push(other),
        }
    }
    out
}

/// Decides which directories are descended into and which files are scanned
#[derive(Debug, Clone)]
pub struct PathClassifier {
    extra_ignore_dirs: Vec<String>,
    extra_ignore_files: Vec<String>,
    include: Option<Vec<String>>,
    exclude: Vec<ExcludePattern>,
}

impl PathClassifier {
    /// Build a classifier from scan options, compiling exclude patterns once
    pub fn new(options: &ScanOptions) -> Self {
        Self {
            extra_ignore_dirs: options.extra_ignore_dirs.clone(),
            extra_ignore_files: options.extra_ignore_files.clone(),
            include: options.include_extensions.as_ref().map(|entries| {
                entries
                    .iter()
                    .map(|entry| entry.trim().trim_start_matches('.').to_string())
                    .filter(|entry| !entry.is_empty())
                    .collect()
            }),
            exclude: options
                .exclude_patterns
                .iter()
                .map(|pattern| ExcludePattern::new(pattern))
                .collect(),
        }
    }

    /// False iff the directory name is ignored statically or by configuration
    pub fn is_directory_eligible(&self, name: &str) -> bool {
        !DEFAULT_IGNORE_DIRS.iter().any(|&dir| dir == name)
            && !self.extra_ignore_dirs.iter().any(|dir| dir == name)
    }

    /// Check a file by its root-relative path (with `/` separators)
    pub fn is_file_eligible(&self, relative_path: &str) -> bool {
        let name = relative_path.rsplit('/').next().unwrap_or(relative_path);

        if DEFAULT_IGNORE_FILES.iter().any(|&file| file == name)
            || self.extra_ignore_files.iter().any(|file| file == name)
        {
            return false;
        }

        if self
            .exclude
            .iter()
            .any(|pattern| pattern.is_match(name) || pattern.is_match(relative_path))
        {
            return false;
        }

        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match &self.include {
            Some(entries) => entries.iter().any(|entry| {
                (!extension.is_empty() && entry.to_lowercase() == extension)
                    || glob_match(entry, name)
            }),
            None => !extension.is_empty() && is_supported_extension(&extension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(options: ScanOptions) -> PathClassifier {
        PathClassifier::new(&options)
    }

    #[test]
    fn test_directory_eligibility() {
        let classifier = classifier(ScanOptions {
            extra_ignore_dirs: vec!["fixtures".to_string()],
            ..ScanOptions::default()
        });

        assert!(!classifier.is_directory_eligible("node_modules"));
        assert!(!classifier.is_directory_eligible(".git"));
        assert!(!classifier.is_directory_eligible("fixtures"));
        assert!(classifier.is_directory_eligible("src"));
        // Name match only, never a path match
        assert!(classifier.is_directory_eligible("src/node_modules_docs"));
    }

    #[test]
    fn test_default_extensions() {
        let classifier = classifier(ScanOptions::default());

        assert!(classifier.is_file_eligible("a.js"));
        assert!(classifier.is_file_eligible("src/Main.RS"));
        assert!(!classifier.is_file_eligible("b.png"));
        assert!(!classifier.is_file_eligible("Makefile"));
        assert!(!classifier.is_file_eligible(".gitignore"));
        assert!(!classifier.is_file_eligible("package-lock.json"));
    }

    #[test]
    fn test_include_filter_overrides_defaults() {
        let classifier = classifier(ScanOptions {
            include_extensions: Some(vec![".PNG".to_string(), "Makefile".to_string()]),
            ..ScanOptions::default()
        });

        assert!(classifier.is_file_eligible("img/logo.png"));
        assert!(classifier.is_file_eligible("Makefile"));
        assert!(!classifier.is_file_eligible("a.js"));
    }

    #[test]
    fn test_exclude_is_substring_search() {
        let classifier = classifier(ScanOptions {
            exclude_patterns: vec!["*.test.js".to_string(), "build".to_string()],
            ..ScanOptions::default()
        });

        assert!(!classifier.is_file_eligible("src/app.test.js"));
        assert!(!classifier.is_file_eligible("scripts/rebuild.js"));
        assert!(classifier.is_file_eligible("src/app.js"));
    }

    #[test]
    fn test_exclude_matches_relative_path() {
        let classifier = classifier(ScanOptions {
            exclude_patterns: vec!["docs/*.md".to_string()],
            ..ScanOptions::default()
        });

        assert!(!classifier.is_file_eligible("docs/intro.md"));
        assert!(classifier.is_file_eligible("README.md"));
    }

    #[test]
    fn test_malformed_exclude_matches_nothing() {
        let classifier = classifier(ScanOptions {
            exclude_patterns: vec!["broken(".to_string()],
            ..ScanOptions::default()
        });

        assert!(classifier.is_file_eligible("broken(.js"));
        assert!(classifier.is_file_eligible("a.js"));
    }

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("*.test.js"), ".*\\.test\\.js");
        assert_eq!(glob_to_regex("a?c"), "a.c");
    }
}

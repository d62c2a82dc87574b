/*!
 * Utility functions and static tables for DumpDoc
 */

use std::path::{Component, Path};

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Size in mebibytes, used by the too-large placeholder
pub fn bytes_to_mb(size: u64) -> f64 {
    size as f64 / 1024.0 / 1024.0
}

/// Join the components of a root-relative path with `/`
pub fn normalize_relative_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Directory names never descended into, matched by exact name at any level
pub static DEFAULT_IGNORE_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // Dependencies
        "node_modules",
        "bower_components",
        "vendor",
        ".pnpm-store",
        ".yarn",
        // Build & Dist
        "dist",
        "build",
        "out",
        "target",
        ".next",
        ".nuxt",
        ".output",
        "coverage",
        ".nyc_output",
        // Python
        "__pycache__",
        ".pytest_cache",
        ".mypy_cache",
        "venv",
        ".venv",
        // IDEs & Editors
        ".idea",
        ".vscode",
        ".vs",
        // Caches
        ".cache",
        ".gradle",
        ".terraform",
    ]
});

/// File names never scanned, regardless of extension
pub static DEFAULT_IGNORE_FILES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        ".DS_Store",
        "Thumbs.db",
        "desktop.ini",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "composer.lock",
        "Cargo.lock",
        "poetry.lock",
        "Gemfile.lock",
    ]
});

/// Extensions scanned when no include filter is given, with display language
pub static SUPPORTED_EXTENSIONS: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("scala", "Scala"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("sql", "SQL"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("json", "JSON"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("toml", "TOML"),
    ("xml", "XML"),
    ("md", "Markdown"),
    ("txt", "Text"),
    ("graphql", "GraphQL"),
];

/// True if the lower-cased extension is in the default set
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.iter().any(|(ext, _)| *ext == extension)
}

/// Display language for an extension, if known
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_normalize_relative_path() {
        let path: PathBuf = ["src", "nested", "main.rs"].iter().collect();
        assert_eq!(normalize_relative_path(&path), "src/nested/main.rs");
        assert_eq!(normalize_relative_path(Path::new("./a.js")), "a.js");
    }

    #[test]
    fn test_language_lookup_is_case_insensitive() {
        assert_eq!(language_for_extension("RS"), Some("Rust"));
        assert_eq!(language_for_extension("png"), None);
        assert!(is_supported_extension("js"));
        assert!(!is_supported_extension("png"));
    }
}

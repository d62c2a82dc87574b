/*!
 * Configuration handling for DumpDoc
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;

use crate::error::{DumpDocError, Result};
use crate::reader::DEFAULT_MAX_FILE_SIZE;
use crate::scanner::ScanOptions;
use crate::transform::{TransformOptions, DEFAULT_TRUNCATE_LINES};
use crate::watcher::{WatchOptions, DEFAULT_DEBOUNCE};
use crate::writer::OutputFormat;

/// Configuration file looked up in the target directory
pub const CONFIG_FILE_NAME: &str = ".dumpdoc.json";

/// Command-line arguments for DumpDoc
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "dumpdoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate a document describing a project's source tree",
    long_about = "Scans a project directory and renders its tree, file listing, file contents and optional statistics and git metadata as Markdown, JSON or HTML. Watch mode regenerates the document whenever files change."
)]
pub struct Args {
    /// Project directory to scan
    #[clap(default_value = ".")]
    pub directory: PathBuf,

    /// Output file (defaults to PROJECT_CONTEXT.<ext> in the project directory)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[clap(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum file size in bytes whose content is included
    #[clap(long, value_name = "BYTES")]
    pub max_size: Option<u64>,

    /// Comma-separated extensions or file names to include (replaces the default set)
    #[clap(long, value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Comma-separated glob patterns of files to exclude
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Comma-separated directory names to ignore in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ignore_dirs: Vec<String>,

    /// Maximum directory depth to descend (0 = only the project directory)
    #[clap(long)]
    pub depth: Option<usize>,

    /// Keep only the head and tail of long files
    #[clap(long)]
    pub truncate: bool,

    /// Number of lines kept when truncating
    #[clap(long, value_name = "LINES")]
    pub truncate_lines: Option<usize>,

    /// Redact secrets, tokens and private addresses
    #[clap(long)]
    pub redact: bool,

    /// Include language statistics
    #[clap(long)]
    pub stats: bool,

    /// Include git metadata
    #[clap(long)]
    pub git: bool,

    /// Regenerate the output whenever files change
    #[clap(short, long)]
    pub watch: bool,

    /// Quiet period in milliseconds before regenerating in watch mode
    #[clap(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Configuration file (defaults to .dumpdoc.json in the project directory)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Ignore configuration files
    #[clap(long)]
    pub no_config: bool,

    /// Show debug output
    #[clap(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Contents of a configuration file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub max_size: Option<u64>,
    pub filter: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub ignore_dirs: Option<Vec<String>>,
    pub depth: Option<usize>,
    pub truncate: Option<bool>,
    pub truncate_lines: Option<usize>,
    pub redact: Option<bool>,
    pub stats: Option<bool>,
    pub git: Option<bool>,
    pub debounce_ms: Option<u64>,
}

impl ConfigFile {
    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            DumpDocError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Find the configuration file for a run, if any
    ///
    /// An explicit path must exist. Otherwise the project directory is
    /// checked first, then the user configuration directory.
    pub fn discover(explicit: Option<&Path>, target_dir: &Path) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DumpDocError::PathNotFound(path.display().to_string()));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = target_dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Ok(Some(local));
        }

        Ok(dirs::config_dir()
            .map(|dir| dir.join("dumpdoc").join("config.json"))
            .filter(|path| path.is_file()))
    }
}

/// Application configuration, merged from arguments, file and defaults
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Project directory to scan
    pub target_dir: PathBuf,
    /// Output file path
    pub output_file: PathBuf,
    /// Output format
    pub format: OutputFormat,
    /// Maximum file size whose content is included
    pub max_file_size: u64,
    /// Include filter replacing the default extension set
    pub filter: Option<Vec<String>>,
    /// Exclude glob patterns
    pub exclude: Vec<String>,
    /// Extra ignored directory names
    pub ignore_dirs: Vec<String>,
    /// Maximum traversal depth
    pub depth: Option<usize>,
    /// Head/tail truncation
    pub truncate: bool,
    /// Lines kept when truncating
    pub truncate_lines: usize,
    /// Secret redaction
    pub redact: bool,
    /// Language statistics
    pub stats: bool,
    /// Git metadata
    pub git: bool,
    /// Watch mode
    pub watch: bool,
    /// Watch debounce
    pub debounce: Duration,
    /// Configuration file that was applied, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Merge command-line arguments over an optional configuration file
    pub fn from_args(args: Args, file: Option<ConfigFile>, config_file: Option<PathBuf>) -> Self {
        let file = file.unwrap_or_default();

        let format = args.format.or(file.format).unwrap_or_default();
        let output_file = args
            .output
            .or(file.output)
            .unwrap_or_else(|| args.directory.join(format.default_file_name()));
        let non_empty = |values: Vec<String>| (!values.is_empty()).then_some(values);

        Self {
            output_file,
            format,
            max_file_size: args.max_size.or(file.max_size).unwrap_or(DEFAULT_MAX_FILE_SIZE),
            filter: non_empty(args.filter).or(file.filter),
            exclude: non_empty(args.exclude).or(file.exclude).unwrap_or_default(),
            ignore_dirs: non_empty(args.ignore_dirs)
                .or(file.ignore_dirs)
                .unwrap_or_default(),
            depth: args.depth.or(file.depth),
            truncate: args.truncate || file.truncate.unwrap_or(false),
            truncate_lines: args
                .truncate_lines
                .or(file.truncate_lines)
                .unwrap_or(DEFAULT_TRUNCATE_LINES),
            redact: args.redact || file.redact.unwrap_or(false),
            stats: args.stats || file.stats.unwrap_or(false),
            git: args.git || file.git.unwrap_or(false),
            watch: args.watch,
            debounce: args
                .debounce_ms
                .or(file.debounce_ms)
                .map_or(DEFAULT_DEBOUNCE, Duration::from_millis),
            target_dir: args.directory,
            config_file,
        }
    }

    /// Parse arguments, then locate, load and merge the configuration file
    pub fn load(args: Args) -> Result<Self> {
        if args.no_config {
            return Ok(Self::from_args(args, None, None));
        }

        let path = ConfigFile::discover(args.config.as_deref(), &args.directory)?;
        let file = path.as_deref().map(ConfigFile::load).transpose()?;
        Ok(Self::from_args(args, file, path))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.is_dir() {
            return Err(DumpDocError::PathNotFound(format!(
                "Target directory not found: {}",
                self.target_dir.display()
            )));
        }

        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(DumpDocError::PathNotFound(format!(
                    "Output directory not found: {}",
                    parent.display()
                )));
            }
        }

        crate::ensure!(
            !self.truncate || self.truncate_lines > 0,
            InvalidArgument,
            "--truncate-lines must be greater than zero"
        );

        Ok(())
    }

    /// File name of the output, excluded from scans and watch triggers
    pub fn output_name(&self) -> Option<String> {
        self.output_file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }

    /// Options for the scanner
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_file_size: self.max_file_size,
            include_extensions: self.filter.clone(),
            exclude_patterns: self.exclude.clone(),
            max_depth: self.depth,
            extra_ignore_dirs: self.ignore_dirs.clone(),
            extra_ignore_files: self.output_name().into_iter().collect(),
        }
    }

    /// Options for the transformation stage
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            redact: self.redact,
            truncate: self.truncate,
            truncate_lines: self.truncate_lines,
        }
    }

    /// Options for watch mode
    pub fn watch_options(&self) -> WatchOptions {
        let mut output_names = OutputFormat::all_default_file_names();
        if let Some(name) = self.output_name() {
            if !output_names.contains(&name) {
                output_names.push(name);
            }
        }

        WatchOptions {
            ignore_dirs: self.ignore_dirs.clone(),
            filter: self.filter.clone(),
            debounce: self.debounce,
            output_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["dumpdoc"]);
        let config = Config::from_args(args, None, None);

        assert_eq!(config.target_dir, PathBuf::from("."));
        assert_eq!(config.output_file, PathBuf::from("./PROJECT_CONTEXT.md"));
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.truncate_lines, DEFAULT_TRUNCATE_LINES);
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
        assert!(config.filter.is_none());
        assert_eq!(
            config.scan_options().extra_ignore_files,
            vec!["PROJECT_CONTEXT.md".to_string()]
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let args = Args::parse_from([
            "dumpdoc",
            "proj",
            "--format",
            "json",
            "--exclude",
            "*.test.js,*.snap",
            "--depth",
            "2",
        ]);
        let file = ConfigFile {
            format: Some(OutputFormat::Html),
            exclude: Some(vec!["ignored".to_string()]),
            filter: Some(vec!["rs".to_string()]),
            redact: Some(true),
            debounce_ms: Some(250),
            ..ConfigFile::default()
        };

        let config = Config::from_args(args, Some(file), None);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.output_file, PathBuf::from("proj/PROJECT_CONTEXT.json"));
        assert_eq!(config.exclude, vec!["*.test.js", "*.snap"]);
        assert_eq!(config.filter, Some(vec!["rs".to_string()]));
        assert_eq!(config.depth, Some(2));
        assert!(config.redact);
        assert_eq!(config.debounce, Duration::from_millis(250));
    }

    #[test]
    fn test_load_config_file_from_target() -> Result<()> {
        let dir = tempdir()?;
        let mut file = fs::File::create(dir.path().join(CONFIG_FILE_NAME))?;
        writeln!(file, r#"{{ "maxSize": 2048, "ignoreDirs": ["fixtures"], "stats": true }}"#)?;

        let args = Args {
            directory: dir.path().to_path_buf(),
            ..Args::default()
        };
        let config = Config::load(args)?;

        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.ignore_dirs, vec!["fixtures"]);
        assert!(config.stats);
        assert_eq!(config.config_file, Some(dir.path().join(CONFIG_FILE_NAME)));
        Ok(())
    }

    #[test]
    fn test_invalid_config_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "unknownKey": 1 }"#)?;

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, DumpDocError::Config(_)));
        Ok(())
    }

    #[test]
    fn test_validate() -> Result<()> {
        let dir = tempdir()?;
        let mut config = Config::from_args(
            Args {
                directory: dir.path().to_path_buf(),
                ..Args::default()
            },
            None,
            None,
        );
        config.validate()?;

        config.output_file = dir.path().join("missing").join("out.md");
        assert!(config.validate().is_err());

        config.target_dir = dir.path().join("nope");
        assert!(matches!(config.validate(), Err(DumpDocError::PathNotFound(_))));
        Ok(())
    }

    #[test]
    fn test_watch_options_exclude_outputs() {
        let args = Args::parse_from(["dumpdoc", "--output", "docs/context.md"]);
        let options = Config::from_args(args, None, None).watch_options();

        assert!(options.output_names.contains(&"context.md".to_string()));
        assert!(options.output_names.contains(&"PROJECT_CONTEXT.html".to_string()));
    }
}

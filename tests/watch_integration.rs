//! Watch mode against a real filesystem

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use indicatif::ProgressBar;
use tempfile::tempdir;

use dumpdoc::config::{Args, Config};
use dumpdoc::pipeline;
use dumpdoc::watcher::{WatchOptions, Watcher};

fn file_names(batch: &[PathBuf]) -> Vec<String> {
    batch
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect()
}

fn options(debounce_ms: u64) -> WatchOptions {
    WatchOptions {
        debounce: Duration::from_millis(debounce_ms),
        ..Default::default()
    }
}

#[test]
fn change_triggers_single_batch() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().to_path_buf();
    fs::create_dir(root.join("src")).unwrap();

    let (tx, rx) = unbounded();
    let mut watcher = Watcher::new();
    watcher
        .start(&root, move |batch| { let _ = tx.send(batch); }, options(200))
        .unwrap();
    assert!(watcher.watched_dirs().len() >= 2);

    // Let the backend settle before producing events
    thread::sleep(Duration::from_millis(200));
    fs::write(root.join("src").join("lib.rs"), "pub fn a() {}").unwrap();
    fs::write(root.join("main.rs"), "fn main() {}").unwrap();

    let batch = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let names = file_names(&batch);
    assert!(names.contains(&"lib.rs".to_string()) || names.contains(&"main.rs".to_string()));

    watcher.stop();
    assert!(!watcher.is_running());
}

#[test]
fn hidden_and_output_files_do_not_trigger() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().to_path_buf();

    let (tx, rx) = unbounded();
    let mut watcher = Watcher::new();
    let mut opts = options(100);
    opts.output_names = vec!["PROJECT_CONTEXT.md".to_string()];
    watcher
        .start(&root, move |batch| { let _ = tx.send(batch); }, opts)
        .unwrap();

    thread::sleep(Duration::from_millis(200));
    fs::write(root.join(".env"), "SECRET=1").unwrap();
    fs::write(root.join("PROJECT_CONTEXT.md"), "# old output").unwrap();

    assert!(rx.recv_timeout(Duration::from_millis(800)).is_err());
    watcher.stop();
}

#[test]
fn regeneration_from_watch_callback() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().to_path_buf();
    fs::write(root.join("a.js"), "let a = 1;").unwrap();

    let args = Args {
        directory: root.clone(),
        ..Default::default()
    };
    let config = Config::from_args(args, None, None);
    let output = config.output_file.clone();
    pipeline::generate(&config, Arc::new(ProgressBar::hidden())).unwrap();

    let (tx, rx) = unbounded();
    let mut watcher = Watcher::new();
    watcher
        .start(
            &root,
            move |_batch| {
                let report = pipeline::generate(&config, Arc::new(ProgressBar::hidden()));
                let _ = tx.send(report.map(|report| report.files_processed).ok());
            },
            config_watch_options(&root),
        )
        .unwrap();

    thread::sleep(Duration::from_millis(200));
    fs::write(root.join("b.js"), "let b = 2;").unwrap();

    let processed = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(processed, Some(2));
    watcher.stop();

    let document = fs::read_to_string(output).unwrap();
    assert!(document.contains("let b = 2;"));
}

fn config_watch_options(root: &std::path::Path) -> WatchOptions {
    let args = Args {
        directory: root.to_path_buf(),
        debounce_ms: Some(200),
        ..Default::default()
    };
    Config::from_args(args, None, None).watch_options()
}

//! End-to-end tests running the coordinator against the notify backend.
//!
//! These touch the real file system and rely on the platform delivering
//! notifications within a few hundred milliseconds.

use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use watchrun_watch::{
    resolve, setup, source_kinds, Coordinator, EnrichedEvent, EventExecutor, NotifySource,
    WatchConfig,
};

/// Forwards every fired event to a channel, optionally reading the file
/// first the way `cat {{.Path}}` would.
struct ChannelExecutor {
    tx: mpsc::UnboundedSender<EnrichedEvent>,
    read_file: bool,
}

#[async_trait]
impl EventExecutor for ChannelExecutor {
    async fn execute(&self, _config: &WatchConfig, event: Option<&EnrichedEvent>) {
        if let Some(event) = event {
            if self.read_file {
                let _ = fs::read(&event.path);
            }
            let _ = self.tx.send(event.clone());
        }
    }
}

/// Run a session over `config`, perform `action`, and collect what fired.
async fn fired_while<F: FnOnce()>(config: WatchConfig, action: F) -> Vec<EnrichedEvent> {
    fired_with(config, false, action).await
}

async fn fired_with<F: FnOnce()>(
    config: WatchConfig,
    read_file: bool,
    action: F,
) -> Vec<EnrichedEvent> {
    let allowed = resolve(&config.event_types).unwrap();
    let (mut source, (events, errors)) =
        NotifySource::new(source_kinds(&config.event_types)).unwrap();
    assert!(setup::register_watches(&config, &mut source) > 0);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = ChannelExecutor { tx, read_file };
    let run = Coordinator::new(config, allowed, source, executor).run(events, errors);
    tokio::pin!(run);

    // Give the backend a moment to settle before generating events.
    let _ = tokio::time::timeout(Duration::from_millis(100), &mut run).await;
    action();
    let _ = tokio::time::timeout(Duration::from_millis(800), &mut run).await;

    let mut fired = Vec::new();
    while let Ok(event) = rx.try_recv() {
        fired.push(event);
    }
    fired
}

fn paths(events: &[EnrichedEvent]) -> Vec<PathBuf> {
    events.iter().map(|e| e.path.clone()).collect()
}

#[tokio::test]
async fn test_only_matching_files_fire() {
    let temp = TempDir::new().unwrap();
    let config = WatchConfig::new("true")
        .with_watch_dirs([temp.path()])
        .with_patterns(["*.md"])
        .with_event_types(["create", "write"]);

    let fired = fired_while(config, || {
        fs::write(temp.path().join("note.md"), "markdown content").unwrap();
        fs::write(temp.path().join("data.log"), "log content").unwrap();
    })
    .await;

    let received = paths(&fired);
    assert!(
        received.iter().any(|p| p.ends_with("note.md")),
        "Should receive event for .md file, got: {:?}",
        received
    );
    assert!(
        !received.iter().any(|p| p.ends_with("data.log")),
        "Should NOT receive event for .log file, got: {:?}",
        received
    );
}

#[tokio::test]
async fn test_debounce_coalesces_rapid_writes() {
    let temp = TempDir::new().unwrap();
    let config = WatchConfig::new("true")
        .with_watch_dirs([temp.path()])
        .with_patterns(["*.txt"])
        .with_event_types(["write", "create"])
        .with_debounce(Duration::from_millis(200));

    let fired = fired_while(config, || {
        for i in 0..5 {
            fs::write(temp.path().join("burst.txt"), format!("revision {i}")).unwrap();
            std::thread::sleep(Duration::from_millis(20));
        }
    })
    .await;

    assert_eq!(fired.len(), 1, "expected one coalesced event, got: {:?}", fired);
    assert_eq!(fired[0].name, "burst.txt");
}

#[tokio::test]
async fn test_recursive_create_synthesizes_file_events() {
    let temp = TempDir::new().unwrap();
    let watched = temp.path().join("watched");
    let staging = temp.path().join("staging");
    fs::create_dir_all(&watched).unwrap();
    fs::create_dir_all(staging.join("sub")).unwrap();
    fs::write(staging.join("sub/a.txt"), "already here").unwrap();

    let config = WatchConfig::new("true")
        .with_watch_dirs([watched.as_path()])
        .with_patterns(["*.txt"])
        .with_event_types(["create", "write"])
        .with_recursive(true);

    // Moving the populated directory in makes its creation and contents
    // appear in a single notification.
    let fired = fired_while(config, || {
        fs::rename(staging.join("sub"), watched.join("sub")).unwrap();
    })
    .await;

    assert_eq!(paths(&fired), vec![watched.join("sub").join("a.txt")]);
    assert_eq!(fired[0].event, "CREATE");
    assert_eq!(fired[0].dir, watched.join("sub"));
}

#[tokio::test]
async fn test_new_directory_is_watched_afterwards() {
    let temp = TempDir::new().unwrap();
    let config = WatchConfig::new("true")
        .with_watch_dirs([temp.path()])
        .with_patterns(["*.rs"])
        .with_event_types(["create"])
        .with_recursive(true);

    let sub = temp.path().join("later");
    let fired = fired_while(config, || {
        fs::create_dir(&sub).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        fs::write(sub.join("lib.rs"), "pub fn f() {}").unwrap();
    })
    .await;

    assert!(
        paths(&fired).contains(&sub.join("lib.rs")),
        "file created in new directory should fire, got: {:?}",
        fired
    );
    assert!(!paths(&fired).contains(&sub));
}

#[tokio::test]
async fn test_reading_the_changed_file_does_not_retrigger() {
    let temp = TempDir::new().unwrap();
    // Default event types ("all") with no debounce.
    let config = WatchConfig::new("cat {{.Path}}").with_watch_dirs([temp.path()]);

    let fired = fired_with(config, true, || {
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
    })
    .await;

    let labels: Vec<&str> = fired.iter().map(|e| e.event.as_str()).collect();
    assert!(!fired.is_empty(), "the write itself should fire");
    assert!(
        fired.len() <= 3,
        "one write should fire a bounded number of times, got: {:?}",
        labels
    );
    assert!(
        labels.iter().all(|l| matches!(*l, "CREATE" | "WRITE" | "CHMOD")),
        "access notifications must not fire under 'all', got: {:?}",
        labels
    );
}

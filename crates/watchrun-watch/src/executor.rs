//! Shell execution of rendered command templates.

use crate::{
    config::WatchConfig,
    error::{Error, Result},
    events::EnrichedEvent,
    template::CommandTemplate,
    traits::EventExecutor,
};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Runs the rendered command through the platform shell with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    /// Create a new shell executor.
    pub fn new() -> Self {
        Self
    }

    fn shell_command(command: &str) -> Command {
        let (shell, shell_arg) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };
        let mut cmd = Command::new(shell);
        cmd.arg(shell_arg)
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    async fn clear_terminal() {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/c", "cls"]);
            cmd
        } else {
            Command::new("clear")
        };
        if let Err(e) = cmd.status().await {
            warn!("Failed to clear terminal: {}", e);
        }
    }

    /// Run `command` to completion and report its exit status.
    pub async fn run(command: &str) -> Result<ExitStatus> {
        Self::shell_command(command)
            .status()
            .await
            .map_err(|e| Error::Execution(format!("failed to spawn '{}': {}", command, e)))
    }
}

#[async_trait]
impl EventExecutor for ShellExecutor {
    async fn execute(&self, config: &WatchConfig, event: Option<&EnrichedEvent>) {
        if config.clear_terminal {
            Self::clear_terminal().await;
        }

        if let Some(event) = event {
            debug!(
                "Executing command for event: {} on {}",
                event.event,
                event.path.display()
            );
        }

        let command = match CommandTemplate::parse(&config.command_template) {
            Ok(template) => template.render(event),
            Err(e) => {
                error!("Error parsing command template: {}", e);
                return;
            }
        };

        info!("Executing: {}", command);
        let path = event.map(|e| e.path.display().to_string()).unwrap_or_default();
        let kind = event.map(|e| e.event.as_str()).unwrap_or_default();
        let start = Instant::now();

        match Self::run(&command).await {
            Ok(status) if status.success() => {
                info!(
                    command = %command,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command executed successfully"
                );
            }
            Ok(status) => {
                error!(
                    command = %command,
                    path = %path,
                    event = %kind,
                    status = %status,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command execution failed"
                );
            }
            Err(e) => {
                error!(
                    command = %command,
                    path = %path,
                    event = %kind,
                    error = %e,
                    "Command execution failed"
                );
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn run_reports_exit_status() {
        assert!(ShellExecutor::run("true").await.unwrap().success());
        assert!(!ShellExecutor::run("exit 3").await.unwrap().success());
    }

    #[tokio::test]
    async fn execute_renders_event_fields() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.txt");
        let config = WatchConfig::new(format!(
            "printf '%s %s %s' {{{{.Name}}}} {{{{.Event}}}} {{{{.Ext}}}} > '{}'",
            out.display()
        ));
        let event = EnrichedEvent::new("/src/main.go", "WRITE");

        ShellExecutor::new().execute(&config, Some(&event)).await;

        assert_eq!(fs::read_to_string(&out).unwrap(), "main.go WRITE .go");
    }

    #[tokio::test]
    async fn bad_template_skips_execution() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("ran");
        let config = WatchConfig::new(format!("touch '{}' {{{{.Nope}}}}", marker.display()));

        ShellExecutor::new().execute(&config, None).await;

        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn failing_command_does_not_panic() {
        let config = WatchConfig::new("exit 1");
        ShellExecutor::new().execute(&config, None).await;
    }
}

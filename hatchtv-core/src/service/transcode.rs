//! External transcode process: launch, supervise, log.
//!
//! The actual video-to-HLS conversion is an external script. The service
//! only launches it and relays its output into the log; nothing on the
//! request path ever waits for it.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::TranscodeConfig;

/// Arguments handed to the external HLS script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    pub identity: String,
    pub extension: String,
    pub day: Option<u32>,
}

/// Seam between the dispatcher and the operating system.
///
/// Resolves with the process exit code (`None` when killed by a signal)
/// once the process has terminated, or with the launch error.
#[async_trait]
pub trait TranscodeRunner: Send + Sync {
    async fn run(&self, job: TranscodeJob) -> std::io::Result<Option<i32>>;
}

/// Runs `<shell> <script> <identity> <extension> [day]` and forwards each
/// stdout/stderr line into the log as it arrives.
pub struct SystemTranscodeRunner {
    config: TranscodeConfig,
}

impl SystemTranscodeRunner {
    #[must_use]
    pub fn new(config: TranscodeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TranscodeRunner for SystemTranscodeRunner {
    async fn run(&self, job: TranscodeJob) -> std::io::Result<Option<i32>> {
        let mut command = Command::new(&self.config.shell);
        command
            .arg(&self.config.script)
            .arg(&job.identity)
            .arg(&job.extension);
        if let Some(day) = job.day {
            command.arg(day.to_string());
        }
        command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = command.spawn()?;

        if let Some(stdout) = child.stdout.take() {
            let identity = job.identity.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    info!(%identity, "transcode stdout: {line}");
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            let identity = job.identity.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!(%identity, "transcode stderr: {line}");
                }
            });
        }

        let status = child.wait().await?;
        Ok(status.code())
    }
}

/// Fire-and-forget hand-off to the runner.
pub struct TranscodeDispatcher {
    runner: Arc<dyn TranscodeRunner>,
}

impl TranscodeDispatcher {
    pub fn new(runner: Arc<dyn TranscodeRunner>) -> Self {
        Self { runner }
    }

    /// Launch the job out-of-band. The returned handle exists for tests;
    /// the request path drops it without awaiting.
    pub fn dispatch(&self, job: TranscodeJob) -> tokio::task::JoinHandle<()> {
        let runner = Arc::clone(&self.runner);
        tokio::spawn(async move {
            info!(
                identity = %job.identity,
                extension = %job.extension,
                day = ?job.day,
                "transcode dispatched"
            );
            match runner.run(job.clone()).await {
                Ok(Some(0)) => {
                    info!(identity = %job.identity, "transcode finished");
                }
                Ok(code) => {
                    warn!(identity = %job.identity, code = ?code, "transcode exited abnormally");
                }
                Err(err) => {
                    error!(identity = %job.identity, error = %err, "transcode process failed to launch");
                }
            }
        })
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::RecordingRunner;
    use super::*;

    #[tokio::test]
    async fn dispatch_runs_the_job_detached() {
        let runner = Arc::new(RecordingRunner::default());
        let dispatcher = TranscodeDispatcher::new(runner.clone());

        let job = TranscodeJob {
            identity: "abc".to_string(),
            extension: "mp4".to_string(),
            day: Some(3),
        };
        dispatcher.dispatch(job.clone()).await.unwrap();

        assert_eq!(runner.jobs(), vec![job]);
    }

    #[tokio::test]
    async fn system_runner_passes_arguments_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-transcode.sh");
        let argfile = dir.path().join("args.txt");
        tokio::fs::write(&script, format!("echo \"$@\" > {}\n", argfile.display()))
            .await
            .unwrap();

        let runner = SystemTranscodeRunner::new(TranscodeConfig {
            uploads_dir: dir.path().display().to_string(),
            script: script.display().to_string(),
            shell: "sh".to_string(),
        });

        let code = runner
            .run(TranscodeJob {
                identity: "abc".to_string(),
                extension: "mp4".to_string(),
                day: Some(7),
            })
            .await
            .unwrap();
        assert_eq!(code, Some(0));

        let recorded = tokio::fs::read_to_string(&argfile).await.unwrap();
        assert_eq!(recorded.trim(), "abc mp4 7");
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_launch_error() {
        let runner = SystemTranscodeRunner::new(TranscodeConfig {
            uploads_dir: "uploads".to_string(),
            script: "create-hls-vod.sh".to_string(),
            shell: "/nonexistent/interpreter".to_string(),
        });

        let result = runner
            .run(TranscodeJob {
                identity: "abc".to_string(),
                extension: "mp4".to_string(),
                day: None,
            })
            .await;
        assert!(result.is_err());
    }
}

//! Query evaluator backed by an external `jq` process.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::traits::{EvaluationError, QueryEvaluator};

/// Default time a single evaluation may take.
pub const DEFAULT_JQ_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `<command> -c <program>` with the input document on stdin.
///
/// The command line is split with shell-word rules, so extra flags can be
/// configured (`"gojq"`, `"/opt/bin/jq -S"`, ...).
#[derive(Debug, Clone)]
pub struct JqCommandEvaluator {
    command: String,
    timeout: Duration,
}

impl JqCommandEvaluator {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn build(&self) -> Result<Command, EvaluationError> {
        let parts = shlex::split(&self.command).ok_or_else(|| EvaluationError::Unavailable {
            command: self.command.clone(),
        })?;
        let (program, args) = parts.split_first().ok_or_else(|| EvaluationError::Unavailable {
            command: self.command.clone(),
        })?;
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        Ok(command)
    }

    fn spawn_error(&self, err: std::io::Error) -> EvaluationError {
        if err.kind() == std::io::ErrorKind::NotFound {
            EvaluationError::Unavailable {
                command: self.command.clone(),
            }
        } else {
            EvaluationError::Failed {
                message: err.to_string(),
            }
        }
    }

    fn timeout_error(&self) -> EvaluationError {
        EvaluationError::Timeout {
            millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Default for JqCommandEvaluator {
    fn default() -> Self {
        Self::new("jq", DEFAULT_JQ_TIMEOUT)
    }
}

#[async_trait]
impl QueryEvaluator for JqCommandEvaluator {
    async fn probe(&self) -> Result<(), EvaluationError> {
        let mut command = self.build()?;
        command
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = command.spawn().map_err(|e| self.spawn_error(e))?;
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            debug!(
                "Evaluator available: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
            Ok(())
        } else {
            Err(EvaluationError::Unavailable {
                command: format!(
                    "{} ({})",
                    self.command,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }

    async fn run(&self, input: &Value, program: &str) -> Result<Value, EvaluationError> {
        let document = serde_json::to_vec(input).map_err(|e| EvaluationError::Failed {
            message: e.to_string(),
        })?;

        let mut command = self.build()?;
        command
            .arg("-c")
            .arg(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| self.spawn_error(e))?;

        // Feed stdin concurrently so a large document cannot deadlock on full pipes
        let stdin = child.stdin.take();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                // A broken pipe here surfaces as a failed exit status below
                let _ = stdin.write_all(&document).await;
                let _ = stdin.shutdown().await;
            }
        });

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| self.spawn_error(e))?;
        let _ = writer.await;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EvaluationError::Failed {
                message: if stderr.is_empty() {
                    format!("jq exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim()).map_err(|e| EvaluationError::InvalidOutput {
            message: e.to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake(script: &str) -> JqCommandEvaluator {
        // $0 is "jq"; the evaluator's own arguments follow as $1..
        JqCommandEvaluator::new(
            format!("sh -c {} jq", shlex::try_quote(script).unwrap()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_run_parses_stdout() {
        let evaluator = fake(r#"cat >/dev/null; echo '[true,false]'"#);
        let result = evaluator.run(&json!([{}, {}]), ".").await.unwrap();
        assert_eq!(result, json!([true, false]));
    }

    #[tokio::test]
    async fn test_run_passes_program_and_input() {
        // Echo back the arguments and the document
        let evaluator = fake(r#"printf '{"args":"%s %s","input":' "$1" "$2"; cat; printf '}'"#);
        let result = evaluator.run(&json!([1, 2]), ".[0]").await.unwrap();
        assert_eq!(result, json!({"args": "-c .[0]", "input": [1, 2]}));
    }

    #[tokio::test]
    async fn test_run_nonzero_exit_is_failed() {
        let evaluator = fake("cat >/dev/null; echo 'jq: error: syntax error' >&2; exit 3");
        match evaluator.run(&json!([]), "...").await {
            Err(EvaluationError::Failed { message }) => assert!(message.contains("syntax error")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_garbage_output_is_invalid() {
        let evaluator = fake("cat >/dev/null; echo 'not json'");
        assert!(matches!(
            evaluator.run(&json!([]), ".").await,
            Err(EvaluationError::InvalidOutput { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let evaluator = JqCommandEvaluator::new("sh -c 'sleep 5' jq", Duration::from_millis(100));
        assert_eq!(
            evaluator.run(&json!([]), ".").await,
            Err(EvaluationError::Timeout { millis: 100 })
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let evaluator = JqCommandEvaluator::new("definitely-not-a-jq-binary-xyz", DEFAULT_JQ_TIMEOUT);
        assert!(matches!(
            evaluator.probe().await,
            Err(EvaluationError::Unavailable { .. })
        ));
        assert!(matches!(
            evaluator.run(&json!([]), ".").await,
            Err(EvaluationError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_or_unbalanced_command_is_unavailable() {
        for command in ["", "   ", "jq 'unterminated"] {
            let evaluator = JqCommandEvaluator::new(command, DEFAULT_JQ_TIMEOUT);
            assert!(matches!(
                evaluator.probe().await,
                Err(EvaluationError::Unavailable { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_probe() {
        assert!(fake(r#"[ "$1" = "--version" ] && echo jq-1.7"#).probe().await.is_ok());
        assert!(fake("exit 1").probe().await.is_err());
    }

    #[tokio::test]
    async fn test_real_jq_when_installed() {
        let evaluator = JqCommandEvaluator::default();
        if evaluator.probe().await.is_err() {
            return;
        }
        let result = evaluator
            .run(&json!([{"type": "TCP"}, {"type": "UDP"}]), r#"[.[] | .type == "TCP"]"#)
            .await
            .unwrap();
        assert_eq!(result, json!([true, false]));
    }
}

//! Generation through an `ollama run <model>` child process
//!
//! The prompt is written to the child's stdin; stdout is the completion.
//! A non-zero exit surfaces stderr verbatim as `Error::Generation`.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::LlmProvider;

/// LLM provider backed by the Ollama command-line client
pub struct OllamaCli {
    /// Executable to spawn
    program: PathBuf,
    /// Arguments passed to the executable
    args: Vec<OsString>,
    /// Model name (for logging and `model()`)
    model: String,
    /// Upper bound on a single generation
    timeout: Duration,
}

impl OllamaCli {
    /// Run `<binary> run <model>` with the configured timeout
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            program: config.binary.clone(),
            args: vec!["run".into(), config.generate_model.clone().into()],
            model: config.generate_model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Run an arbitrary command that reads a prompt on stdin
    pub fn with_command<I, S>(program: impl Into<PathBuf>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let program = program.into();
        Self {
            model: program.display().to_string(),
            program,
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    async fn run(&self, prompt: &str) -> Result<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::generation(format!(
                    "Failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<_, std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        // A child that exits early closes its stdin; its exit status says why
        if let Err(e) = fed {
            tracing::debug!("Prompt was not fully written to {}: {}", self.program.display(), e);
        }

        output.map_err(|e| Error::generation(format!("Failed to wait for {}: {}", self.program.display(), e)))
    }
}

#[async_trait]
impl LlmProvider for OllamaCli {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::info!("Running {} for model {}", self.program.display(), self.model);

        let output = tokio::time::timeout(self.timeout, self.run(prompt))
            .await
            .map_err(|_| {
                Error::generation(format!(
                    "Generation timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            tracing::warn!("{} exited with {}: {}", self.program.display(), output.status, stderr.trim());
            return Err(Error::Generation(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        Ok(matches!(status, Ok(s) if s.success()))
    }

    fn name(&self) -> &str {
        "ollama-cli"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> OllamaCli {
        OllamaCli::with_command("sh", ["-c", script], Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_prompt_goes_to_stdin() {
        let cli = sh("cat");
        let output = cli.generate("what is in the pdf?").await.unwrap();
        assert_eq!(output, "what is in the pdf?");
    }

    #[tokio::test]
    async fn test_nonzero_exit_returns_stderr_verbatim() {
        let cli = sh("printf 'model not found' >&2; exit 1");
        match cli.generate("prompt").await {
            Err(Error::Generation(msg)) => assert_eq!(msg, "model not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_generation_error() {
        let cli = OllamaCli::with_command(
            "/nonexistent/ollama",
            ["run", "llama2"],
            Duration::from_secs(1),
        );
        assert!(matches!(cli.generate("x").await, Err(Error::Generation(_))));
        assert!(!cli.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_timeout() {
        let cli = OllamaCli::with_command("sh", ["-c", "sleep 5"], Duration::from_millis(200));
        match cli.generate("x").await {
            Err(Error::Generation(msg)) => assert!(msg.contains("timed out")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_default_command_line() {
        let cli = OllamaCli::new(&LlmConfig::default());
        assert_eq!(cli.program, PathBuf::from("ollama"));
        assert_eq!(cli.args, vec![OsString::from("run"), OsString::from("llama2")]);
        assert_eq!(cli.model(), "llama2");
    }
}

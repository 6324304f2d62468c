//! On-disk debug artifacts for a single task.

use crate::error::RuntimeError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use waypoint_core::{AgentStep, Message, PerceptionSnapshot, TaskOutput};

pub struct DebugWriter {
    root: PathBuf,
}

impl DebugWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn step_dir(&self, idx: usize) -> PathBuf {
        self.root.join(format!("step-{}", idx))
    }

    async fn write_json<T: Serialize>(path: PathBuf, value: &T) -> Result<(), RuntimeError> {
        let content = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&path, content).await?;
        debug!("Wrote debug artifact {}", path.display());
        Ok(())
    }

    /// `elems.txt` and, when a visual capture exists, `screenshot.png`.
    pub async fn write_perception(
        &self,
        idx: usize,
        perception: &PerceptionSnapshot,
    ) -> Result<(), RuntimeError> {
        let dir = self.step_dir(idx);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join("elems.txt"), &perception.serialized_state).await?;

        if let Some(visual) = perception.visual_base64() {
            let bytes = STANDARD
                .decode(visual)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            tokio::fs::write(dir.join("screenshot.png"), bytes).await?;
        }
        Ok(())
    }

    pub async fn write_messages(&self, idx: usize, messages: &[Message]) -> Result<(), RuntimeError> {
        let dir = self.step_dir(idx);
        tokio::fs::create_dir_all(&dir).await?;
        Self::write_json(dir.join("msgs.json"), &messages).await
    }

    pub async fn write_step(&self, step: &AgentStep) -> Result<(), RuntimeError> {
        let dir = self.step_dir(step.idx);
        tokio::fs::create_dir_all(&dir).await?;
        Self::write_json(dir.join("stepOutput.json"), step).await
    }

    pub async fn write_task_output(&self, output: &TaskOutput) -> Result<(), RuntimeError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Self::write_json(self.root.join("taskOutput.json"), output).await
    }
}

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use mill_logging::{mill_debug, mill_warn};

use crate::command::{raster_args, transform_args};
use crate::types::{EngineEvent, RasterJob, RenderedPage, TransformError, TransformJob};

#[derive(Debug, Clone)]
pub struct TransformSettings {
    /// Ghostscript binary name or path.
    pub binary: String,
    /// Wall-clock limit for one transform or one full raster walk.
    pub timeout: Duration,
    /// Raster render resolution in dpi.
    pub raster_resolution: u32,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            binary: "gs".to_string(),
            timeout: Duration::from_secs(600),
            raster_resolution: 150,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The external transform collaborator. One job runs at a time; output
/// lines are streamed through the sink while the job is live.
#[async_trait::async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(
        &self,
        job: &TransformJob,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, TransformError>;

    async fn render_pages(
        &self,
        job: &RasterJob,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<RenderedPage>, TransformError>;
}

/// Runs Ghostscript as a subprocess against a private temp workspace.
#[derive(Debug, Clone)]
pub struct GhostscriptTransformer {
    settings: TransformSettings,
}

impl GhostscriptTransformer {
    pub fn new(settings: TransformSettings) -> Self {
        Self { settings }
    }

    /// Write the job inputs into the workspace, numbered to keep the
    /// submitted order regardless of duplicate filenames.
    fn write_inputs(
        dir: &Path,
        inputs: &[crate::types::InputDocument],
    ) -> Result<Vec<PathBuf>, TransformError> {
        let mut paths = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            let path = dir.join(format!("input-{i}.pdf"));
            std::fs::write(&path, &input.bytes)?;
            paths.push(path);
        }
        Ok(paths)
    }

    async fn run_process(
        &self,
        job_id: u64,
        args: &[String],
        sink: &dyn ProgressSink,
    ) -> Result<(), TransformError> {
        mill_debug!("spawning {} with {} args", self.settings.binary, args.len());
        let mut child = Command::new(&self.settings.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| TransformError::Spawn(err.to_string()))?;

        // Both pipes feed one line channel so the caller sees output in
        // arrival order.
        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_task = tokio::spawn(forward_lines(stdout, line_tx.clone()));
        let err_task = tokio::spawn(forward_lines(stderr, line_tx));

        let mut captured: Vec<String> = Vec::new();
        let wait = async {
            while let Some(line) = line_rx.recv().await {
                captured.push(line.clone());
                sink.emit(EngineEvent::Line {
                    job_id,
                    chunk: line,
                });
            }
            child.wait().await
        };

        let status = match tokio::time::timeout(self.settings.timeout, wait).await {
            Ok(status) => status?,
            Err(_) => {
                mill_warn!("transform timed out after {:?}", self.settings.timeout);
                let _ = child.start_kill();
                return Err(TransformError::Timeout);
            }
        };
        let _ = out_task.await;
        let _ = err_task.await;

        if status.success() {
            Ok(())
        } else {
            let message = error_line(&captured)
                .unwrap_or_else(|| format!("transform process exited with {status}"));
            Err(TransformError::Failed(message))
        }
    }
}

#[async_trait::async_trait]
impl Transformer for GhostscriptTransformer {
    async fn transform(
        &self,
        job: &TransformJob,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, TransformError> {
        let workspace = tempfile::tempdir().map_err(TransformError::from)?;
        let input_paths = Self::write_inputs(workspace.path(), &job.inputs)?;
        let output = workspace.path().join("output.pdf");

        let borrowed: Vec<&Path> = input_paths.iter().map(PathBuf::as_path).collect();
        let args = transform_args(job, &borrowed, &output);
        self.run_process(job.job_id, &args, sink).await?;

        let bytes = std::fs::read(&output).map_err(|_| TransformError::EmptyOutput)?;
        if bytes.is_empty() {
            return Err(TransformError::EmptyOutput);
        }
        Ok(bytes)
    }

    async fn render_pages(
        &self,
        job: &RasterJob,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<RenderedPage>, TransformError> {
        let workspace = tempfile::tempdir().map_err(TransformError::from)?;
        let input = workspace.path().join("input.pdf");
        std::fs::write(&input, &job.input.bytes)?;

        // One process per page, strictly sequential, in the requested
        // page order.
        let total = job.pages.len() as u32;
        let mut rendered = Vec::with_capacity(job.pages.len());
        for (i, &page) in job.pages.iter().enumerate() {
            let output = workspace
                .path()
                .join(format!("page-{page}.{}", job.format.extension()));
            let args = raster_args(
                job.format,
                self.settings.raster_resolution,
                page,
                &input,
                &output,
            );
            self.run_process(job.job_id, &args, sink).await?;
            let bytes = std::fs::read(&output).map_err(|_| TransformError::EmptyOutput)?;
            rendered.push(RenderedPage { page, bytes });
            sink.emit(EngineEvent::RenderProgress {
                job_id: job.job_id,
                current: i as u32 + 1,
                total,
                page,
            });
        }
        Ok(rendered)
    }
}

async fn forward_lines<R>(reader: Option<R>, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).is_err() {
            break;
        }
    }
}

/// A Ghostscript failure usually names itself in an `Error:` line.
fn error_line(captured: &[String]) -> Option<String> {
    captured
        .iter()
        .rev()
        .find(|line| line.contains("Error"))
        .cloned()
}

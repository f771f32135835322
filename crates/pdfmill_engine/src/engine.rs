use std::sync::{mpsc, Arc};
use std::thread;

use crate::transform::{ChannelProgressSink, GhostscriptTransformer, TransformSettings, Transformer};
use crate::types::{EngineEvent, RasterJob, TransformJob};

enum EngineCommand {
    Transform(TransformJob),
    RenderPages(RasterJob),
}

/// Handle to the engine worker thread. Commands run strictly one at a
/// time, in submission order; events for a job (its output lines, then
/// its completion) arrive before any event of the next job.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: TransformSettings) -> Self {
        Self::with_transformer(Arc::new(GhostscriptTransformer::new(settings)))
    }

    /// Build a handle over any transformer; tests inject fakes here.
    pub fn with_transformer(transformer: Arc<dyn Transformer>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                // block_on keeps execution sequential: the previous job
                // settles before the next command is picked up.
                runtime.block_on(handle_command(transformer.as_ref(), command, &event_tx));
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit_transform(&self, job: TransformJob) {
        let _ = self.cmd_tx.send(EngineCommand::Transform(job));
    }

    pub fn submit_render(&self, job: RasterJob) {
        let _ = self.cmd_tx.send(EngineCommand::RenderPages(job));
    }

    /// Non-blocking event poll.
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event, or `None` if the worker is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    transformer: &dyn Transformer,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelProgressSink::new(event_tx.clone());
    match command {
        EngineCommand::Transform(job) => {
            let job_id = job.job_id;
            let result = transformer.transform(&job, &sink).await;
            let _ = event_tx.send(EngineEvent::TransformCompleted { job_id, result });
        }
        EngineCommand::RenderPages(job) => {
            let job_id = job.job_id;
            let result = transformer.render_pages(&job, &sink).await;
            let _ = event_tx.send(EngineEvent::PagesRendered { job_id, result });
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use mill_logging::{mill_info, mill_warn};
use pdfmill_core::{
    Effect, Msg, ParsedPage, RasterPayload, TargetFormat, TextRun, TransformPayload, TransformPlan,
};
use pdfmill_engine::{
    AdvancedOptions, BlobStore, DocumentAuthor, DocumentRenderer, EngineEvent, EngineHandle,
    ImagePage, InputDocument, JobId, RasterFormat, RasterJob, TransformJob,
};

const UNEXPECTED_TRANSFORM: &str = "An unexpected error occurred during processing.";
const UNEXPECTED_CONVERT: &str = "An unexpected error occurred during conversion.";
const UNEXPECTED_PARSE: &str = "An unexpected error occurred while parsing the document.";

/// Milliseconds-since-epoch clock, injectable for tests.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().timestamp_millis() as u64)
}

/// Executes the effects requested by the state machine against the
/// external collaborators, returning the messages they settle into.
/// Effects run to completion one at a time, mirroring the single
/// in-flight operation the state machine permits.
pub struct EffectRunner {
    engine: EngineHandle,
    store: BlobStore,
    renderer: Box<dyn DocumentRenderer>,
    author: Box<dyn DocumentAuthor>,
    clock: Clock,
    next_job: JobId,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        renderer: Box<dyn DocumentRenderer>,
        author: Box<dyn DocumentAuthor>,
    ) -> Self {
        Self::with_clock(engine, renderer, author, system_clock())
    }

    pub fn with_clock(
        engine: EngineHandle,
        renderer: Box<dyn DocumentRenderer>,
        author: Box<dyn DocumentAuthor>,
        clock: Clock,
    ) -> Self {
        Self {
            engine,
            store: BlobStore::new(),
            renderer,
            author,
            clock,
            next_job: 0,
        }
    }

    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut BlobStore {
        &mut self.store
    }

    pub fn run(&mut self, effect: Effect) -> Vec<Msg> {
        match effect {
            Effect::ReleaseHandles(handles) => {
                for handle in handles {
                    if let Err(err) = self.store.release(handle) {
                        mill_warn!("release failed: {err}");
                    }
                }
                Vec::new()
            }
            Effect::ProbeDocument { handle } => vec![self.probe(handle)],
            Effect::RunTransform(plan) => self.run_transform(plan),
            Effect::ConvertPages {
                handle,
                format,
                pages,
            } => self.convert_pages(handle, format, pages),
            Effect::BuildDocument { handles } => vec![self.build_document(handles)],
            Effect::ParseDocument { handle } => self.parse_document(handle),
        }
    }

    fn next_job_id(&mut self) -> JobId {
        self.next_job += 1;
        self.next_job
    }

    fn probe(&mut self, handle: u64) -> Msg {
        let page_count = match self.store.get(handle) {
            Ok(bytes) => match self.renderer.page_count(bytes) {
                Ok(count) => count,
                Err(err) => {
                    mill_warn!("page count probe failed: {err}");
                    0
                }
            },
            Err(err) => {
                mill_warn!("probe on released handle: {err}");
                0
            }
        };
        Msg::ProbeDone { page_count }
    }

    fn run_transform(&mut self, plan: TransformPlan) -> Vec<Msg> {
        let job_id = self.next_job_id();
        mill_info!("transform job {} ({})", job_id, plan.operation.as_str());

        let inputs = match self.collect_inputs(&plan.inputs) {
            Ok(inputs) => inputs,
            Err(msg) => return vec![msg],
        };
        let job = TransformJob {
            job_id,
            inputs,
            quality: plan.quality.map(|q| q.token().to_string()),
            custom_command: plan.custom_command,
            advanced: plan.advanced.map(|a| AdvancedOptions {
                compatibility_level: a.compatibility_level,
                downsample_color_images: a.downsample_color_images,
                color_image_resolution: a.color_image_resolution,
            }),
            split: plan.split,
        };
        self.engine.submit_transform(job);

        let mut out = Vec::new();
        while let Some(event) = self.engine.recv() {
            match event {
                EngineEvent::Line { chunk, .. } => out.push(Msg::EngineLine(chunk)),
                EngineEvent::TransformCompleted { result, .. } => {
                    let result = result
                        .map(|bytes| self.store_payload(bytes))
                        .map_err(|err| err.to_string());
                    out.push(Msg::TransformDone {
                        result,
                        completed_ms: (self.clock)(),
                    });
                    return out;
                }
                EngineEvent::RenderProgress { .. } | EngineEvent::PagesRendered { .. } => {}
            }
        }
        out.push(Msg::TransformDone {
            result: Err(UNEXPECTED_TRANSFORM.to_string()),
            completed_ms: (self.clock)(),
        });
        out
    }

    fn convert_pages(&mut self, handle: u64, format: TargetFormat, pages: Vec<u32>) -> Vec<Msg> {
        let Some(raster_format) = raster_format(format) else {
            return vec![Msg::ConvertPagesDone {
                result: Err(UNEXPECTED_CONVERT.to_string()),
            }];
        };
        let input = match self.input_document(handle) {
            Ok(input) => input,
            Err(_) => {
                return vec![Msg::ConvertPagesDone {
                    result: Err(UNEXPECTED_CONVERT.to_string()),
                }]
            }
        };

        let job_id = self.next_job_id();
        mill_info!("render job {} for {} pages", job_id, pages.len());
        self.engine.submit_render(RasterJob {
            job_id,
            input,
            format: raster_format,
            pages,
        });

        let mut out = Vec::new();
        while let Some(event) = self.engine.recv() {
            match event {
                EngineEvent::Line { chunk, .. } => out.push(Msg::EngineLine(chunk)),
                // Structured progress: completed pages out of the
                // selection, not the page number being rendered.
                EngineEvent::RenderProgress {
                    current,
                    total,
                    page,
                    ..
                } => out.push(Msg::OperationProgress {
                    current,
                    total,
                    page,
                }),
                EngineEvent::PagesRendered { result, .. } => {
                    let result = result
                        .map(|rendered| {
                            rendered
                                .into_iter()
                                .map(|page| {
                                    let byte_len = page.bytes.len() as u64;
                                    RasterPayload {
                                        handle: self.store.insert(page.bytes),
                                        byte_len,
                                        page: page.page,
                                    }
                                })
                                .collect()
                        })
                        .map_err(|err| err.to_string());
                    out.push(Msg::ConvertPagesDone { result });
                    return out;
                }
                EngineEvent::TransformCompleted { .. } => {}
            }
        }
        out.push(Msg::ConvertPagesDone {
            result: Err(UNEXPECTED_CONVERT.to_string()),
        });
        out
    }

    fn build_document(&mut self, handles: Vec<u64>) -> Msg {
        let mut images = Vec::with_capacity(handles.len());
        for handle in handles {
            match self.store.get(handle) {
                Ok(bytes) => images.push(ImagePage {
                    filename: String::new(),
                    bytes: bytes.to_vec(),
                }),
                Err(err) => {
                    mill_warn!("build input missing: {err}");
                    return Msg::BuildDone {
                        result: Err(UNEXPECTED_CONVERT.to_string()),
                    };
                }
            }
        }
        let result = self
            .author
            .build(&images)
            .map(|bytes| self.store_payload(bytes))
            .map_err(|err| err.to_string());
        Msg::BuildDone { result }
    }

    fn parse_document(&mut self, handle: u64) -> Vec<Msg> {
        let bytes = match self.store.get(handle) {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                mill_warn!("parse on released handle: {err}");
                return vec![Msg::ParseDone {
                    result: Err(UNEXPECTED_PARSE.to_string()),
                }];
            }
        };

        let total = match self.renderer.page_count(&bytes) {
            Ok(total) => total,
            Err(err) => {
                return vec![Msg::ParseDone {
                    result: Err(err.to_string()),
                }]
            }
        };

        let mut out = Vec::new();
        let mut pages = Vec::with_capacity(total as usize);
        for page in 1..=total {
            match self.renderer.page_content(&bytes, page) {
                Ok(content) => {
                    out.push(Msg::OperationProgress {
                        current: page,
                        total,
                        page,
                    });
                    pages.push(ParsedPage {
                        width: content.width,
                        height: content.height,
                        runs: content
                            .runs
                            .into_iter()
                            .map(|run| TextRun {
                                text: run.text,
                                transform: run.transform,
                                width: run.width,
                            })
                            .collect(),
                    });
                }
                Err(err) => {
                    out.push(Msg::ParseDone {
                        result: Err(err.to_string()),
                    });
                    return out;
                }
            }
        }
        out.push(Msg::ParseDone { result: Ok(pages) });
        out
    }

    fn collect_inputs(&mut self, handles: &[u64]) -> Result<Vec<InputDocument>, Msg> {
        let mut inputs = Vec::with_capacity(handles.len());
        for &handle in handles {
            match self.store.get(handle) {
                Ok(bytes) => inputs.push(InputDocument {
                    filename: format!("input-{handle}.pdf"),
                    bytes: bytes.to_vec(),
                }),
                Err(err) => {
                    mill_warn!("transform input missing: {err}");
                    return Err(Msg::TransformDone {
                        result: Err(UNEXPECTED_TRANSFORM.to_string()),
                        completed_ms: (self.clock)(),
                    });
                }
            }
        }
        Ok(inputs)
    }

    fn input_document(&self, handle: u64) -> Result<InputDocument, ()> {
        match self.store.get(handle) {
            Ok(bytes) => Ok(InputDocument {
                filename: format!("input-{handle}.pdf"),
                bytes: bytes.to_vec(),
            }),
            Err(err) => {
                mill_warn!("input missing: {err}");
                Err(())
            }
        }
    }

    fn store_payload(&mut self, bytes: Vec<u8>) -> TransformPayload {
        let byte_len = bytes.len() as u64;
        TransformPayload {
            handle: self.store.insert(bytes),
            byte_len,
        }
    }
}

fn raster_format(format: TargetFormat) -> Option<RasterFormat> {
    match format {
        TargetFormat::Jpg | TargetFormat::Jpeg => Some(RasterFormat::Jpeg),
        TargetFormat::Png => Some(RasterFormat::Png),
        TargetFormat::Bmp => Some(RasterFormat::Bmp),
        TargetFormat::Pdf => None,
    }
}

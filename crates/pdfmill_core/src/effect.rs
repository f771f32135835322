use crate::files::HandleId;
use crate::settings::{AdvancedSettings, OperationKind, QualityPreset, TargetFormat};

/// Side effects requested by [`crate::update`]; executed by the shell
/// against the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Release resource handles that no longer back a live entry.
    /// Each handle is released exactly once across the session.
    ReleaseHandles(Vec<HandleId>),
    /// Resolve the page count of a freshly selected document.
    ProbeDocument { handle: HandleId },
    /// Run the binary-transform collaborator (compress/merge/split).
    RunTransform(TransformPlan),
    /// Render a document page subset to rasters, strictly sequentially.
    ConvertPages {
        handle: HandleId,
        format: TargetFormat,
        pages: Vec<u32>,
    },
    /// Author a document from the ordered image list.
    BuildDocument { handles: Vec<HandleId> },
    /// Extract per-page text runs for the parse view.
    ParseDocument { handle: HandleId },
}

/// Shaped input for the binary-transform collaborator, one in-flight at
/// a time. Mirrors the per-operation shaping of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformPlan {
    pub operation: OperationKind,
    /// Ordered source handles; file-list order for merge.
    pub inputs: Vec<HandleId>,
    /// Quality preset; absent when the custom command override is used.
    pub quality: Option<QualityPreset>,
    /// Validated raw command override, if enabled.
    pub custom_command: Option<String>,
    pub advanced: Option<AdvancedSettings>,
    /// Validated (start, end) page pair for split.
    pub split: Option<(u32, u32)>,
}

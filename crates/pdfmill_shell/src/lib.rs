//! Pdfmill shell: wires the pure state machine to the engine and the
//! rendering collaborators, and owns the session lifecycle.
mod effects;
mod logging;
mod session;
mod surface;

pub use effects::{system_clock, Clock, EffectRunner};
pub use logging::{initialize, initialize_with, LogDestination, LogSettings};
pub use session::{IncomingFile, Session};
pub use surface::{acquire_surface, RetryPolicy, SurfaceProvider};

//! Bounded acquisition of a display surface for the parse view's page
//! overlay. The surface belongs to the embedding UI and may not exist
//! yet when a page render is requested, so acquisition polls with a
//! bounded retry instead of failing on the first miss.

use std::time::Duration;

use mill_logging::mill_warn;

/// Source of the display surface the overlay renders into.
pub trait SurfaceProvider {
    type Surface;

    /// One acquisition attempt; `None` while the surface is not ready.
    fn try_acquire(&mut self) -> Option<Self::Surface>;
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(150),
        }
    }
}

/// Poll the provider until it yields a surface or the retry budget is
/// exhausted. Sleeps between attempts, never before the first one.
pub fn acquire_surface<P: SurfaceProvider>(
    provider: &mut P,
    policy: &RetryPolicy,
) -> Option<P::Surface> {
    acquire_with_sleep(provider, policy, |interval| std::thread::sleep(interval))
}

fn acquire_with_sleep<P: SurfaceProvider>(
    provider: &mut P,
    policy: &RetryPolicy,
    mut sleep: impl FnMut(Duration),
) -> Option<P::Surface> {
    for attempt in 0..policy.attempts {
        if let Some(surface) = provider.try_acquire() {
            return Some(surface);
        }
        if attempt + 1 < policy.attempts {
            sleep(policy.interval);
        }
    }
    mill_warn!("surface not ready after {} attempts", policy.attempts);
    None
}

use std::collections::HashMap;

use thiserror::Error;

use mill_logging::mill_trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown or already released handle {0}")]
    UnknownHandle(u64),
}

/// Owns the bytes behind every live resource handle. Handles are never
/// reused within a store, so a double release is detectable.
#[derive(Debug, Default)]
pub struct BlobStore {
    next: u64,
    blobs: HashMap<u64, Vec<u8>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bytes: Vec<u8>) -> u64 {
        self.next += 1;
        let handle = self.next;
        mill_trace!("stored blob {} ({} bytes)", handle, bytes.len());
        self.blobs.insert(handle, bytes);
        handle
    }

    pub fn get(&self, handle: u64) -> Result<&[u8], StoreError> {
        self.blobs
            .get(&handle)
            .map(Vec::as_slice)
            .ok_or(StoreError::UnknownHandle(handle))
    }

    /// Release the bytes behind a handle. Releasing twice is an error;
    /// the state machine guarantees each handle is released once.
    pub fn release(&mut self, handle: u64) -> Result<(), StoreError> {
        self.blobs
            .remove(&handle)
            .map(|_| ())
            .ok_or(StoreError::UnknownHandle(handle))
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

use std::collections::VecDeque;

use mill_logging::{mill_debug, set_operation_label};
use pdfmill_core::{update, AppState, AppViewModel, FileEntry, Msg, OperationKind};

use crate::effects::EffectRunner;

/// An incoming file as handed to the shell: name, declared MIME type,
/// and content.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Owns one operation session: the pure state machine plus the effect
/// runner that executes its requests. Every dispatched message is driven
/// to quiescence, so after [`Session::dispatch`] returns there is no
/// effect or follow-up message left in flight.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(operation: OperationKind, runner: EffectRunner) -> Self {
        set_operation_label(operation.as_str());
        Self {
            state: AppState::new(operation),
            runner,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Store the incoming files and select them, replacing the current
    /// list.
    pub fn select_files(&mut self, files: Vec<IncomingFile>) {
        let entries = self.register(files);
        self.dispatch(Msg::FilesSelected(entries));
    }

    /// Store the incoming files and append them to the current list.
    pub fn add_files(&mut self, files: Vec<IncomingFile>) {
        let entries = self.register(files);
        self.dispatch(Msg::MoreFilesAdded(entries));
    }

    /// Content of a finished download, if its handle is still live.
    pub fn download_bytes(&self, handle: u64) -> Option<Vec<u8>> {
        self.runner.store().get(handle).ok().map(<[u8]>::to_vec)
    }

    /// Apply one message and run every effect it triggers, feeding the
    /// messages those settle into back through the state machine until
    /// nothing remains.
    pub fn dispatch(&mut self, msg: Msg) {
        if let Msg::OperationSelected(kind) = &msg {
            set_operation_label(kind.as_str());
        }
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                queue.extend(self.runner.run(effect));
            }
        }
        mill_debug!("session settled in {:?}", self.state.op_state());
    }

    fn register(&mut self, files: Vec<IncomingFile>) -> Vec<FileEntry> {
        files
            .into_iter()
            .map(|file| {
                let handle = self.runner.store_mut().insert(file.bytes);
                FileEntry::new(handle, &file.filename, file.mime.as_deref())
            })
            .collect()
    }
}

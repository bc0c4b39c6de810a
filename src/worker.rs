use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::data::convert::convert_workbook;

/// Completion message posted by a background conversion.
#[derive(Debug)]
pub enum LoadMessage {
    /// Cache files written, in sheet order.
    Converted(Vec<PathBuf>),
    Failed(String),
}

/// Handle to a running conversion. Dropping it detaches the worker.
pub struct PendingLoad {
    rx: Receiver<LoadMessage>,
}

impl PendingLoad {
    /// Non-blocking check for the completion message.
    pub fn poll(&self) -> Option<LoadMessage> {
        match self.rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadMessage::Failed(
                "conversion worker stopped unexpectedly".to_string(),
            )),
        }
    }

    /// Block until the worker reports back.
    pub fn wait(self) -> LoadMessage {
        self.rx.recv().unwrap_or_else(|_| {
            LoadMessage::Failed("conversion worker stopped unexpectedly".to_string())
        })
    }
}

/// Convert `workbook` into cache files under `out_dir` on a worker thread.
///
/// Fire-and-forget: there is no cancellation. The worker touches no shared
/// state; the caller swaps in results when the message arrives.
pub fn spawn_conversion(workbook: PathBuf, out_dir: PathBuf) -> PendingLoad {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        log::info!("Converting {} into {}", workbook.display(), out_dir.display());
        let msg = match convert_workbook(&workbook, &out_dir) {
            Ok(paths) => LoadMessage::Converted(paths),
            Err(e) => {
                log::error!("Conversion of {} failed: {e}", workbook.display());
                LoadMessage::Failed(e.to_string())
            }
        };
        // The receiver may be gone if the UI closed; nothing to do then.
        let _ = tx.send(msg);
    });
    PendingLoad { rx }
}

use tokio::task::JoinHandle;

use orion_error::prelude::*;

use crate::error::{RuntimeReason, RuntimeResult};

/// Named tasks that are joined together during shutdown.
///
/// The engine keeps its groups in start order and joins them in reverse.
pub(crate) struct TaskGroup {
    pub(super) name: &'static str,
    handles: Vec<JoinHandle<RuntimeResult<()>>>,
}

impl TaskGroup {
    pub(super) fn new(name: &'static str) -> Self {
        Self {
            name,
            handles: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, handle: JoinHandle<RuntimeResult<()>>) {
        self.handles.push(handle);
    }

    /// Join every task, returning the first error after all have finished.
    pub(super) async fn wait(self) -> RuntimeResult<()> {
        let mut first_err = None;
        for handle in self.handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => StructError::from(RuntimeReason::Shutdown)
                    .with_detail(format!("{} task join error: {e}", self.name))
                    .err(),
            };
            if let Err(e) = outcome
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

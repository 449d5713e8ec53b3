use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::error::{GameDataError, Result};

/// Result of an operation dispatched on the tokio runtime.
///
/// Awaiting yields the operation's outcome. Dropping the handle detaches the
/// task; the operation still runs to completion.
#[must_use = "dropping a Deferred detaches the operation and discards its outcome"]
pub struct Deferred<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Run `operation` on its own task. Must be called from within a tokio runtime.
    pub(crate) fn spawn<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(operation),
        }
    }
}

impl<T> Deferred<T> {
    /// Whether the operation has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.handle
            .poll_unpin(cx)
            .map(|joined| joined.map_err(GameDataError::Task).and_then(|outcome| outcome))
    }
}

//! Static cursor over a fixed collection

use super::types::{Cursor, ResettableCursor};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct Progress {
    exhausted: bool,
    count: usize,
}

/// One-shot cursor over already-known content
///
/// The first `load_next_batch` returns the whole content and exhausts the
/// cursor. Every later call fails with [`Error::Exhausted`].
#[derive(Debug)]
pub struct StaticCursor<E> {
    content: Arc<Vec<E>>,
    progress: Mutex<Progress>,
}

impl<E> StaticCursor<E> {
    /// Create a cursor over `content`
    pub fn new(content: Vec<E>) -> Self {
        Self {
            content: Arc::new(content),
            progress: Mutex::new(Progress::default()),
        }
    }

    /// The full content, whether or not it has been loaded yet
    pub fn content(&self) -> &[E] {
        &self.content
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> From<Vec<E>> for StaticCursor<E> {
    fn from(content: Vec<E>) -> Self {
        Self::new(content)
    }
}

#[async_trait]
impl<E> Cursor for StaticCursor<E>
where
    E: Clone + Send + Sync + 'static,
{
    type Element = E;
    type Batch = Vec<E>;

    fn count(&self) -> usize {
        self.progress().count
    }

    fn exhausted(&self) -> bool {
        self.progress().exhausted
    }

    fn element(&self, index: usize) -> Option<E> {
        if index < self.count() {
            self.content.get(index).cloned()
        } else {
            None
        }
    }

    async fn load_next_batch(&self) -> Result<Vec<E>> {
        {
            let mut progress = self.progress();
            if progress.exhausted {
                return Err(Error::Exhausted);
            }
            progress.count = self.content.len();
            progress.exhausted = true;
        }

        debug!(count = self.content.len(), "Static cursor emitted its only batch");
        Ok(self.content.as_ref().clone())
    }
}

impl<E> ResettableCursor for StaticCursor<E>
where
    E: Clone + Send + Sync + 'static,
{
    fn reset(&self) -> Self {
        Self {
            content: Arc::clone(&self.content),
            progress: Mutex::new(Progress::default()),
        }
    }
}

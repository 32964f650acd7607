//! Double-buffered entity storage
//!
//! `current` is the live snapshot: behind an `Arc`, shared read-only with the
//! renderer and with every worker of the in-flight step. The write target is
//! an owned `Vec` handed out by [`EntityStore::take_target`] and given back
//! through [`EntityStore::swap`], so readers and writers never alias.

use std::sync::Arc;

use super::error::StepError;
use super::states::Entity;

#[derive(Debug)]
pub struct EntityStore {
    current: Arc<Vec<Entity>>,
    spare: Option<Vec<Entity>>, // recycled write target
    len: usize,
}

impl EntityStore {
    pub fn new(entities: Vec<Entity>) -> Self {
        let len = entities.len();
        Self {
            current: Arc::new(entities),
            spare: Some(vec![Entity::default(); len]),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live snapshot, valid until the next swap
    pub fn current(&self) -> &[Entity] {
        &self.current
    }

    /// Shared handle to the live snapshot for readers on other threads
    pub fn snapshot(&self) -> Arc<Vec<Entity>> {
        Arc::clone(&self.current)
    }

    /// Write target for the next step: same length as the store, default-initialised
    pub fn take_target(&mut self) -> Vec<Entity> {
        let mut target = self.spare.take().unwrap_or_default();
        target.clear();
        target.resize_with(self.len, Entity::default);
        target
    }

    /// Publish `next` as the live snapshot in O(1).
    ///
    /// The previous snapshot becomes the spare write target once nobody else
    /// holds it; if a reader still does, it is left to them and a fresh
    /// buffer is allocated on the next `take_target`.
    pub fn swap(&mut self, next: Vec<Entity>) -> Result<(), StepError> {
        if next.len() != self.len {
            return Err(StepError::BufferLength {
                expected: self.len,
                actual: next.len(),
            });
        }
        let previous = std::mem::replace(&mut self.current, Arc::new(next));
        self.spare = Arc::try_unwrap(previous).ok();
        Ok(())
    }
}

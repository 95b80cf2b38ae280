//! Batch to single-item stream adapter

use smallvec::{Array, SmallVec};

use super::Port;

/// Serializes batches of up to `A::size()` payloads into a one-at-a-time stream.
///
/// A new batch is only accepted after every payload of the previous one has been emitted, so a
/// consumer that refuses payloads holds back the producer. Payloads leave in slot order.
pub struct FanOut<A: Array> {
    pending: smallvec::IntoIter<A>,
}

impl<A: Array> Default for FanOut<A> {
    fn default() -> FanOut<A> {
        FanOut::new()
    }
}

impl<A: Array> FanOut<A> {
    pub fn new() -> FanOut<A> {
        FanOut { pending: SmallVec::new().into_iter() }
    }

    /// Maximum number of payloads per batch
    #[inline]
    pub fn capacity(&self) -> usize {
        A::size()
    }

    /// True when the next batch can be loaded
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.pending.len() == 0
    }

    /// Payloads of the current batch that have not been emitted yet
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Loads a batch, handing it back if the previous batch is still draining or it is too large.
    ///
    /// An empty batch is accepted and emits nothing.
    pub fn load(&mut self, batch: SmallVec<A>) -> Result<(), SmallVec<A>> {
        if !self.is_ready() || batch.len() > A::size() {
            return Err(batch);
        }

        self.pending = batch.into_iter();

        Ok(())
    }

    #[inline]
    pub fn peek(&self) -> Option<&A::Item> {
        self.pending.as_slice().first()
    }

    #[inline]
    pub fn pop(&mut self) -> Option<A::Item> {
        self.pending.next()
    }

    /// Moves at most one payload into `port` if it has room. Returns true if a payload moved.
    pub fn drain_into(&mut self, port: &mut Port<A::Item>) -> bool {
        if !port.is_free() {
            return false;
        }

        match self.pop() {
            Some(item) => {
                port.fill(item);
                true
            }
            None => false,
        }
    }
}

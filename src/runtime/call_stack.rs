//! Depth-first call ordering for generated flowchart code.
//!
//! This file only depends on `std` so it can be copied next to the generated
//! sources as-is.

/// Pending node calls. A pushed list runs in its own order, before anything
/// that was already waiting.
#[derive(Debug, Clone)]
pub struct CallStack<T> {
    path: Vec<T>,
}

impl<T> Default for CallStack<T> {
    fn default() -> Self {
        Self { path: Vec::new() }
    }
}

impl<T> CallStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_stack<I>(&mut self, calls: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.path.extend(calls.into_iter().rev());
    }

    pub fn pop(&mut self) -> Option<T> {
        self.path.pop()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Runs calls until none are pending. Each call returns the calls to make next.
    pub fn call_stack<F, I>(&mut self, mut call: F)
    where
        F: FnMut(&T) -> I,
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        while let Some(next) = self.path.pop() {
            let following = call(&next);
            self.add_to_stack(following);
        }
    }
}

//! Thread-affinity checks for render-thread-only state

use std::thread::{self, ThreadId};

/// Records which thread owns a piece of state and asserts on misuse.
///
/// The owner is bound explicitly with [`ThreadRestricted::bind_current`] (the
/// renderer does this when the platform reports the output surface) or lazily
/// on the first [`ThreadRestricted::assert_current`].
#[derive(Debug, Default)]
pub struct ThreadRestricted {
    name: &'static str,
    owner: Option<ThreadId>,
}

impl ThreadRestricted {
    /// Create an unbound restriction labelled `name` for diagnostics
    pub const fn new(name: &'static str) -> Self {
        Self { name, owner: None }
    }

    /// Make the calling thread the owner
    pub fn bind_current(&mut self) {
        let current = thread::current().id();
        if self.owner != Some(current) {
            log::debug!("{} thread bound to {:?}", self.name, current);
        }
        self.owner = Some(current);
    }

    /// Owning thread, if bound
    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    /// Returns true when called from the owner (or when unbound)
    pub fn is_current(&self) -> bool {
        self.owner.map_or(true, |owner| owner == thread::current().id())
    }

    /// Panics unless called from the owning thread; binds if unbound.
    pub fn assert_current(&mut self) {
        if self.owner.is_none() {
            self.bind_current();
        }
        assert!(
            self.is_current(),
            "{} state accessed from {:?}, but it is owned by {:?}",
            self.name,
            thread::current().id(),
            self.owner
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binds_lazily_to_first_caller() {
        let mut restricted = ThreadRestricted::new("Renderer");
        assert!(restricted.owner().is_none());
        restricted.assert_current();
        assert_eq!(restricted.owner(), Some(thread::current().id()));
    }

    #[test]
    fn test_other_thread_is_rejected() {
        let mut restricted = ThreadRestricted::new("Renderer");
        restricted.bind_current();

        let result = thread::spawn(move || {
            restricted.assert_current();
        })
        .join();

        assert!(result.is_err());
    }
}

//! Opaque handles for objects owned across the native boundary

use slotmap::{DefaultKey, Key, KeyData, SlotMap};

/// Opaque 64-bit reference handed to the host in place of a pointer.
///
/// Carries the slot generation, so a reference to a destroyed object never
/// resolves to whatever later reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeRef(pub u64);

impl NativeRef {
    fn from_key(key: DefaultKey) -> Self {
        Self(key.data().as_ffi())
    }

    fn to_key(self) -> DefaultKey {
        KeyData::from_ffi(self.0).into()
    }
}

/// Objects addressable by [`NativeRef`]
#[derive(Debug)]
pub struct HandleTable<T> {
    entries: SlotMap<DefaultKey, T>,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: SlotMap::new(),
        }
    }

    /// Store `value` and return its reference
    pub fn create(&mut self, value: T) -> NativeRef {
        NativeRef::from_key(self.entries.insert(value))
    }

    /// Look up a live object
    pub fn get(&self, reference: NativeRef) -> Option<&T> {
        self.entries.get(reference.to_key())
    }

    /// Look up a live object mutably
    pub fn get_mut(&mut self, reference: NativeRef) -> Option<&mut T> {
        self.entries.get_mut(reference.to_key())
    }

    /// Remove and return an object; its reference becomes stale
    pub fn destroy(&mut self, reference: NativeRef) -> Option<T> {
        self.entries.remove(reference.to_key())
    }

    /// True if `reference` resolves
    pub fn contains(&self, reference: NativeRef) -> bool {
        self.entries.contains_key(reference.to_key())
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no objects are live
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

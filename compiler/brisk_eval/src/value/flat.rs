//! Copy-on-write payload handle.

// Rc is the intentional implementation detail of FlatValue<T>
#![allow(
    clippy::disallowed_types,
    reason = "Rc is the implementation of FlatValue<T>"
)]

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Value-semantics handle around a reference-counted payload.
///
/// Copies (`share`, `clone`) are O(1) and alias the payload. Mutation goes
/// through [`FlatValue::make_mut`], which first gives this handle a private
/// copy when the payload is shared, so no other handle observes the change.
///
/// Read access is through `Deref`; there is no way to get a mutable
/// reference to a shared payload.
pub struct FlatValue<T: ?Sized>(Rc<T>);

impl<T> FlatValue<T> {
    #[inline]
    pub fn new(payload: T) -> Self {
        FlatValue(Rc::new(payload))
    }
}

impl<T: ?Sized> FlatValue<T> {
    /// New handle to the same payload.
    #[inline]
    pub fn share(&self) -> Self {
        FlatValue(Rc::clone(&self.0))
    }

    /// Number of handles aliasing the payload.
    #[inline]
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Whether both handles alias one payload.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Address of the payload, stable for the payload's lifetime.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T: Clone> FlatValue<T> {
    /// Mutable access to a payload owned by this handle alone.
    ///
    /// Clones the payload first when other handles share it.
    pub fn make_mut(&mut self) -> &mut T {
        if Rc::strong_count(&self.0) > 1 {
            tracing::trace!(shares = Rc::strong_count(&self.0), "copy-on-write clone");
        }
        Rc::make_mut(&mut self.0)
    }
}

impl From<&str> for FlatValue<str> {
    fn from(text: &str) -> Self {
        FlatValue(Rc::from(text))
    }
}

impl From<String> for FlatValue<str> {
    fn from(text: String) -> Self {
        FlatValue(Rc::from(text))
    }
}

impl From<Rc<str>> for FlatValue<str> {
    fn from(text: Rc<str>) -> Self {
        FlatValue(text)
    }
}

impl<T: ?Sized> Clone for FlatValue<T> {
    #[inline]
    fn clone(&self) -> Self {
        self.share()
    }
}

impl<T: ?Sized> Deref for FlatValue<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + PartialEq> PartialEq for FlatValue<T> {
    fn eq(&self, other: &Self) -> bool {
        FlatValue::ptr_eq(self, other) || *self.0 == *other.0
    }
}

impl<T: ?Sized + Eq> Eq for FlatValue<T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for FlatValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl<T: Default> Default for FlatValue<T> {
    fn default() -> Self {
        FlatValue::new(T::default())
    }
}

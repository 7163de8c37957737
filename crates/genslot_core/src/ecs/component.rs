//! # Component System
//!
//! Components are the values stored in entity rows. Any owned, sendable
//! type qualifies; the row that holds it decides how it is torn down.

/// Marker trait for values stored in a [`Row`](super::Row).
///
/// Implemented for every `Send + 'static` type.
pub trait Component: Send + 'static {}

impl<T: Send + 'static> Component for T {}

/// Callback that takes ownership of a component as it leaves its row.
///
/// Bound once at row registration and invoked exactly once per removed
/// value: on explicit removal, on entity destruction, on replacement by a
/// newer value and on teardown.
pub type Destructor<T> = Box<dyn FnMut(T) + Send>;

/// Returns the readable type name used in errors and logs.
#[inline]
#[must_use]
pub(crate) fn component_name<T: Component>() -> &'static str {
    std::any::type_name::<T>()
}

//! Capability components attached to part entities.
//!
//! Components are pure data. A part entity may carry any combination of
//! them; classification and bookkeeping live in [`crate::body`] and
//! [`crate::registry`].

mod anatomy;
mod nutrition;

pub use anatomy::*;
pub use nutrition::*;

//! Models module
//!
//! The score tree exchanged with the notation collaborators and the pitch
//! spelling it uses.

pub mod pitch;
pub mod score;

// Re-export commonly used types
pub use pitch::{Pitch, Step};
pub use score::*;

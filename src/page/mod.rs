//! Page collaborators for the form
//!
//! The form never reaches for global UI state. It is handed these traits at
//! construction; `MemoryPage` implements all of them for the terminal UI,
//! the headless submit mode and tests.

mod memory;
mod traits;

pub use memory::{MemoryElement, MemoryPage, ResultView};
pub use traits::{BoundElement, ElementLookup, ErrorDisplay, ResultArea, ResultState, SubmitControl};

#[cfg(test)]
pub use traits::{MockElementLookup, MockErrorDisplay, MockResultArea};

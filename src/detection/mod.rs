//! Independent matchers and score ranking.
//!
//! Each matcher inspects one kind of evidence and adds its weight to a
//! per-call [`ScoreTable`](score::ScoreTable). None of them decides alone;
//! [`score::rank`] turns the accumulated table into an ordered candidate list.

// Submodule declarations
#[cfg(feature = "container")]
pub mod container;
pub mod content;
pub mod magic;
pub mod name;
pub mod score;

// Re-exports
#[cfg(feature = "container")]
pub use container::ArchiveIndex;
pub use magic::{Magic, MagicByte, Signature};
pub use score::{Match, ScoreTable, rank};

//! Knowledge-based minesweeper play: a ground-truth [`Board`] on one side
//! and an [`Agent`] on the other that turns revealed adjacency counts into
//! provably safe moves by resolution and subset elimination.

pub mod agent;
pub mod board;
pub mod sentence;

pub use agent::Agent;
pub use board::{Board, BoardError, Cell, GridSize};
pub use sentence::Sentence;

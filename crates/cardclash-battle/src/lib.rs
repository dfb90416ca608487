//! Combat resolution for Cardclash.
//!
//! A single pure function, [`resolve`], computes the outcome of one round
//! from both players' selections. No I/O, no randomness, no clock — the
//! same inputs always produce the same [`RoundResult`], which is what the
//! battle tests lean on.

mod resolver;

pub use resolver::{Fighter, resolve};

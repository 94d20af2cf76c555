//! # Arena Memory Management
//!
//! This module provides the byte arena that backs variable-length column
//! values. A binary column vector copies each value into the arena and keeps
//! a checked [`ArenaSlot`] handle per row instead of owning one heap
//! allocation per value.
//!
//! ## Growth Policy
//!
//! | Value size             | Placement                                     |
//! |------------------------|-----------------------------------------------|
//! | fits active region     | bump-allocated at the next free offset        |
//! | <= 1 MiB, no room      | small chunk doubled until the value fits      |
//! | > 1 MiB                | dedicated chunk sized exactly to the value    |
//!
//! Chunks that are retired by doubling stay alive until the arena is reset,
//! so handles into them remain valid.
//!
//! ## Invalidation
//!
//! `reset` and `release` start a new generation. Slots from an older
//! generation resolve to `None`, which callers surface as a
//! `StaleReference` error.

mod arena;

pub use arena::{Arena, ArenaSlot};

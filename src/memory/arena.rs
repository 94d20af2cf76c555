//! # Two-Tier Byte Arena
//!
//! Backing store for variable-length column values. Values are copied into
//! large chunks instead of getting one heap allocation each.
//!
//! ## Regions
//!
//! ```text
//! +--------------------------------------------+
//! | small-object chunk (doubles when full)     |  <- active for values <= 1 MiB
//! +--------------------------------------------+
//! | retired small chunks (kept until reset)    |
//! +--------------------------------------------+
//! | dedicated large chunks (exact value size)  |  <- active after a > 1 MiB value
//! +--------------------------------------------+
//! ```
//!
//! A value larger than `LARGE_VALUE_THRESHOLD` gets its own chunk so it
//! never inflates the doubling growth of the small-object chunk. The small
//! chunk's next-free offset is saved while a large chunk is active and
//! restored on the next small value.
//!
//! ## Handles
//!
//! Allocations return an [`ArenaSlot`] carrying the arena generation, the
//! chunk index, the offset and the length. `reset` and `release` bump the
//! generation, so dereferencing an old slot yields `None` instead of reading
//! memory that has been reused or freed.

use eyre::{bail, Result};

use crate::config::{LARGE_VALUE_THRESHOLD, MAX_ARENA_CHUNK_SIZE, SMALL_ARENA_MIN_SIZE};
use crate::error::ColumnError;

/// Checked handle to bytes stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaSlot {
    generation: u64,
    chunk: u32,
    offset: u32,
    len: u32,
}

impl ArenaSlot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Offset of the value inside its chunk.
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Small,
    Large(usize),
}

#[derive(Debug)]
pub struct Arena {
    generation: u64,
    chunks: Vec<Vec<u8>>,
    /// Chunk index of the current small-object chunk.
    small: Option<usize>,
    small_size: usize,
    small_next_free: usize,
    active: Region,
    next_free: usize,
    buffer_size: usize,
    initial_size: usize,
    max_chunk_size: usize,
    allocation_count: usize,
    memory_usage: usize,
}

impl Arena {
    /// Creates an arena whose first small chunk holds at least
    /// `initial_size` bytes. Nothing is allocated until the first value.
    pub fn new(initial_size: usize) -> Self {
        Self::with_max_chunk_size(initial_size, MAX_ARENA_CHUNK_SIZE)
    }

    pub(crate) fn with_max_chunk_size(initial_size: usize, max_chunk_size: usize) -> Self {
        Self {
            generation: 0,
            chunks: Vec::new(),
            small: None,
            small_size: 0,
            small_next_free: 0,
            active: Region::Small,
            next_free: 0,
            buffer_size: 0,
            initial_size: initial_size.max(SMALL_ARENA_MIN_SIZE),
            max_chunk_size,
            allocation_count: 0,
            memory_usage: 0,
        }
    }

    /// Copies `bytes` into the active region and returns its handle.
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> Result<ArenaSlot> {
        let len = bytes.len();
        if self.small.is_none() {
            self.init_buffer();
        }
        if self.next_free + len > self.buffer_size {
            self.increase_buffer_space(len)?;
        }

        let chunk = self.active_chunk();
        let offset = self.next_free;
        self.chunks[chunk][offset..offset + len].copy_from_slice(bytes);
        self.next_free += len;

        Ok(ArenaSlot {
            generation: self.generation,
            chunk: chunk as u32,
            offset: offset as u32,
            len: len as u32,
        })
    }

    /// Resolves a slot, or `None` if it belongs to an earlier generation.
    pub fn get(&self, slot: &ArenaSlot) -> Option<&[u8]> {
        if slot.generation != self.generation {
            return None;
        }
        let chunk = self.chunks.get(slot.chunk as usize)?;
        chunk.get(slot.offset()..slot.offset() + slot.len())
    }

    /// Invalidates every outstanding slot and rewinds the small chunk.
    /// Large and retired chunks are dropped; the current small chunk is kept.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        let kept = self.small.map(|idx| std::mem::take(&mut self.chunks[idx]));
        self.chunks.clear();
        self.small = kept.map(|chunk| {
            self.chunks.push(chunk);
            0
        });
        self.small_next_free = 0;
        self.next_free = 0;
        self.active = Region::Small;
        self.buffer_size = if self.small.is_some() { self.small_size } else { 0 };
        self.allocation_count = 0;
    }

    /// Frees every chunk. The arena lazily re-initializes on the next value.
    pub fn release(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.chunks = Vec::new();
        self.small = None;
        self.small_size = 0;
        self.small_next_free = 0;
        self.active = Region::Small;
        self.next_free = 0;
        self.buffer_size = 0;
        self.allocation_count = 0;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of chunks allocated since the last reset, beyond the first.
    pub fn allocation_count(&self) -> usize {
        self.allocation_count
    }

    /// Total bytes ever allocated by this arena.
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    pub fn small_chunk_size(&self) -> usize {
        self.small_size
    }

    pub fn is_large_active(&self) -> bool {
        matches!(self.active, Region::Large(_))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn active_chunk(&self) -> usize {
        match self.active {
            Region::Large(idx) => idx,
            Region::Small => self.small.unwrap_or(0),
        }
    }

    fn init_buffer(&mut self) {
        let size = self.initial_size.min(self.max_chunk_size);
        self.chunks.push(vec![0u8; size]);
        self.memory_usage += size;
        self.small = Some(self.chunks.len() - 1);
        self.small_size = size;
        self.small_next_free = 0;
        self.active = Region::Small;
        self.next_free = 0;
        self.buffer_size = size;
        self.allocation_count = 0;
    }

    fn increase_buffer_space(&mut self, len: usize) -> Result<()> {
        if len > LARGE_VALUE_THRESHOLD {
            return self.allocate_large(len);
        }

        if self.is_large_active() {
            self.active = Region::Small;
            self.buffer_size = self.small_size;
            self.next_free = self.small_next_free;
            tracing::debug!(
                next_free = self.next_free,
                "arena switched back to small-object chunk"
            );
        }

        if self.next_free + len > self.buffer_size {
            self.allocate_small(len)?;
        }
        Ok(())
    }

    fn allocate_large(&mut self, len: usize) -> Result<()> {
        if len > self.max_chunk_size {
            bail!(ColumnError::BufferOverflow {
                current: self.small_size,
                requested: len,
            });
        }
        if self.active == Region::Small {
            self.small_next_free = self.next_free;
        }
        self.chunks.push(vec![0u8; len]);
        self.memory_usage += len;
        self.allocation_count += 1;
        self.active = Region::Large(self.chunks.len() - 1);
        self.buffer_size = len;
        self.next_free = 0;
        tracing::debug!(len, "arena allocated dedicated large chunk");
        Ok(())
    }

    fn allocate_small(&mut self, len: usize) -> Result<()> {
        let overflow = || ColumnError::BufferOverflow {
            current: self.small_size,
            requested: len,
        };

        let mut new_size = self.small_size.checked_mul(2).ok_or_else(overflow)?;
        while new_size < len {
            new_size = new_size.checked_mul(2).ok_or_else(overflow)?;
        }
        if new_size > self.max_chunk_size {
            bail!(overflow());
        }

        self.chunks.push(vec![0u8; new_size]);
        self.memory_usage += new_size;
        self.allocation_count += 1;
        self.small = Some(self.chunks.len() - 1);
        self.small_size = new_size;
        self.small_next_free = 0;
        self.active = Region::Small;
        self.buffer_size = new_size;
        self.next_free = 0;
        tracing::debug!(new_size, "arena doubled small-object chunk");
        Ok(())
    }
}

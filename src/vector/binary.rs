//! Variable-length byte values.
//!
//! Each row is a view, either into the vector's own [`Arena`] (values copied
//! in with `set_val`/`add`) or into caller memory shared through an
//! `Arc<[u8]>` (values referenced with `set_ref`). `starts` and `lens` mirror
//! every view as offset/length pairs for consumers that only need the
//! layout.
//!
//! Views never dangle. Arena views carry the arena generation and go stale
//! on `reset`/`close`; caller views hold a `Weak` and go stale when the last
//! `Arc` is dropped. Reading a stale row fails with
//! [`ColumnError::StaleReference`].

use std::ops::Deref;
use std::sync::{Arc, Weak};

use eyre::{bail, Result};

use super::VectorBase;
use crate::config::{DEFAULT_VECTOR_SIZE, ESTIMATED_VALUE_SIZE};
use crate::error::ColumnError;
use crate::memory::{Arena, ArenaSlot};

#[derive(Debug, Clone)]
enum BinarySlot {
    Arena(ArenaSlot),
    Borrowed {
        source: Weak<[u8]>,
        start: usize,
        len: usize,
    },
}

/// A resolved row value; dereferences to the row's bytes.
#[derive(Debug, Clone)]
pub enum BinaryValue<'a> {
    Arena(&'a [u8]),
    Shared {
        source: Arc<[u8]>,
        start: usize,
        len: usize,
    },
}

impl Deref for BinaryValue<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            BinaryValue::Arena(bytes) => bytes,
            BinaryValue::Shared { source, start, len } => &source[*start..*start + *len],
        }
    }
}

impl AsRef<[u8]> for BinaryValue<'_> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

#[derive(Debug)]
pub struct BinaryColumnVector {
    base: VectorBase,
    values: Vec<Option<BinarySlot>>,
    starts: Vec<u32>,
    lens: Vec<u32>,
    arena: Arena,
}

impl Default for BinaryColumnVector {
    fn default() -> Self {
        Self::new(DEFAULT_VECTOR_SIZE)
    }
}

impl BinaryColumnVector {
    pub fn new(len: usize) -> Self {
        let mut base = VectorBase::new(len);
        base.account(len * Self::ROW_OVERHEAD);
        Self {
            base,
            values: vec![None; len],
            starts: vec![0; len],
            lens: vec![0; len],
            arena: Arena::new(len.saturating_mul(ESTIMATED_VALUE_SIZE)),
        }
    }

    const ROW_OVERHEAD: usize =
        std::mem::size_of::<Option<BinarySlot>>() + 2 * std::mem::size_of::<u32>();

    vector_base_accessors!();

    /// Grows the per-row arrays. The arena grows on its own as values are
    /// added.
    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if !self.base.grow(size, preserve_data) {
            return;
        }
        if !preserve_data {
            self.values.iter_mut().for_each(|v| *v = None);
            self.starts.iter_mut().for_each(|s| *s = 0);
            self.lens.iter_mut().for_each(|l| *l = 0);
        }
        self.values.resize(size, None);
        self.starts.resize(size, 0);
        self.lens.resize(size, 0);
        self.base.account(size * Self::ROW_OVERHEAD);
    }

    /// Points `row` at `len` bytes of `source` starting at `start` without
    /// copying. `None` marks the row null.
    pub fn set_ref(
        &mut self,
        row: usize,
        source: Option<&Arc<[u8]>>,
        start: usize,
        len: usize,
    ) -> Result<()> {
        self.base.check_row(row)?;
        let Some(source) = source else {
            self.values[row] = None;
            return self.base.set_null(row);
        };

        let in_range = start
            .checked_add(len)
            .is_some_and(|end| end <= source.len());
        if !in_range {
            bail!(ColumnError::InvalidArgument(format!(
                "range {}+{} is outside a {}-byte source",
                start,
                len,
                source.len()
            )));
        }
        let (Ok(start32), Ok(len32)) = (u32::try_from(start), u32::try_from(len)) else {
            bail!(ColumnError::InvalidArgument(format!(
                "range {}+{} does not fit a 32-bit offset",
                start, len
            )));
        };

        self.values[row] = Some(BinarySlot::Borrowed {
            source: Arc::downgrade(source),
            start,
            len,
        });
        self.starts[row] = start32;
        self.lens[row] = len32;
        self.base.mark_value(row);
        Ok(())
    }

    /// Copies `bytes` into the arena and points `row` at the copy.
    pub fn set_val(&mut self, row: usize, bytes: &[u8]) -> Result<()> {
        self.base.check_row(row)?;
        let slot = self.arena.alloc_copy(bytes)?;
        self.values[row] = Some(BinarySlot::Arena(slot));
        self.starts[row] = slot.offset() as u32;
        self.lens[row] = slot.len() as u32;
        self.base.mark_value(row);
        Ok(())
    }

    /// Copies `bytes` into the next row.
    pub fn add(&mut self, bytes: &[u8]) -> Result<()> {
        self.grow_for_append();
        self.set_val(self.base.write_index(), bytes)
    }

    pub fn add_str(&mut self, value: &str) -> Result<()> {
        self.add(value.as_bytes())
    }

    /// References `len` bytes of `source` in the next row.
    pub fn add_ref(&mut self, source: &Arc<[u8]>, start: usize, len: usize) -> Result<()> {
        self.grow_for_append();
        self.set_ref(self.base.write_index(), Some(source), start, len)
    }

    /// Bytes of `row`, `None` for null or unset rows.
    pub fn value(&self, row: usize) -> Result<Option<BinaryValue<'_>>> {
        if row >= self.base.write_index() {
            bail!(ColumnError::InvalidArgument(format!(
                "row {} has not been written, write index is {}",
                row,
                self.base.write_index()
            )));
        }
        if self.base.is_null(row) {
            return Ok(None);
        }
        match &self.values[row] {
            None => Ok(None),
            Some(BinarySlot::Arena(slot)) => match self.arena.get(slot) {
                Some(bytes) => Ok(Some(BinaryValue::Arena(bytes))),
                None => bail!(ColumnError::StaleReference { row }),
            },
            Some(BinarySlot::Borrowed { source, start, len }) => match source.upgrade() {
                Some(source) => Ok(Some(BinaryValue::Shared {
                    source,
                    start: *start,
                    len: *len,
                })),
                None => bail!(ColumnError::StaleReference { row }),
            },
        }
    }

    pub fn current(&self) -> Result<Option<BinaryValue<'_>>> {
        match self.base.current_row() {
            Some(row) => self.value(row),
            None => Ok(None),
        }
    }

    /// Offset of each row's bytes within its arena chunk or source buffer.
    pub fn starts(&self) -> &[u32] {
        &self.starts
    }

    pub fn lens(&self) -> &[u32] {
        &self.lens
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Rewinds the vector and starts a new arena generation; every
    /// previously returned arena view becomes stale.
    pub fn reset(&mut self) {
        self.base.reset();
        self.values.iter_mut().for_each(|v| *v = None);
        self.arena.reset();
    }

    pub fn close(&mut self) {
        if self.base.close() {
            self.values = Vec::new();
            self.starts = Vec::new();
            self.lens = Vec::new();
            self.arena.release();
        }
    }
}

//! Per-pixel and per-chunk statistics.
//!
//! Every writer keeps two [`StatsRecorder`]s: one for the open pixel and one
//! for the whole column chunk. When a pixel closes, its recorder is merged
//! into the chunk recorder and a [`PixelStatistic`] is appended to the
//! [`ColumnChunkIndex`].

/// Value counts and bounds for a run of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRecorder {
    value_count: u64,
    null_count: u64,
    min: Option<i128>,
    max: Option<i128>,
    total_length: u64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a null row.
    pub fn increment(&mut self) {
        self.null_count += 1;
    }

    pub fn update_integer(&mut self, value: i128) {
        self.value_count += 1;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Records a variable-length value by its byte length.
    pub fn update_binary(&mut self, len: usize) {
        self.value_count += 1;
        self.total_length += len as u64;
    }

    pub fn merge(&mut self, other: &StatsRecorder) {
        self.value_count += other.value_count;
        self.null_count += other.null_count;
        self.total_length += other.total_length;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Non-null values recorded.
    pub fn value_count(&self) -> u64 {
        self.value_count
    }

    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    pub fn has_null(&self) -> bool {
        self.null_count > 0
    }

    pub fn min(&self) -> Option<i128> {
        self.min
    }

    pub fn max(&self) -> Option<i128> {
        self.max
    }

    /// Sum of the lengths of binary values recorded.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }
}

/// Location and statistics of one closed pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelStatistic {
    /// Sink position of the pixel's first payload byte.
    pub position: usize,
    /// Payload bytes written for the pixel.
    pub length: usize,
    pub rows: usize,
    /// Offset of the pixel's bitmap within the chunk's null stream, present
    /// only when the pixel holds a null.
    pub null_offset: Option<usize>,
    pub stats: StatsRecorder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnChunkIndex {
    pixels: Vec<PixelStatistic>,
    is_null_offset: Option<usize>,
}

impl ColumnChunkIndex {
    pub fn pixel_statistics(&self) -> &[PixelStatistic] {
        &self.pixels
    }

    pub fn pixel_positions(&self) -> Vec<usize> {
        self.pixels.iter().map(|p| p.position).collect()
    }

    /// Sink position of the null stream, set by `flush`.
    pub fn is_null_offset(&self) -> Option<usize> {
        self.is_null_offset
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub(crate) fn push(&mut self, pixel: PixelStatistic) {
        self.pixels.push(pixel);
    }

    pub(crate) fn set_is_null_offset(&mut self, offset: usize) {
        self.is_null_offset = Some(offset);
    }
}

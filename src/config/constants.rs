//! # Format Constants
//!
//! This module centralizes the numeric constants of the column format. Values
//! that depend on each other are co-located and their relationships are
//! enforced through compile-time assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! SMALL_ARENA_MIN_SIZE (16 KiB)
//!       │
//!       ├─> LARGE_VALUE_THRESHOLD (1 MiB, must be >=)
//!       │     Values above the threshold get a dedicated chunk. If the
//!       │     threshold were below the initial small chunk, values that fit
//!       │     the small arena would still be routed to dedicated chunks.
//!       │
//!       └─> MAX_ARENA_CHUNK_SIZE (i32::MAX, must be >=)
//!             Offsets are serialized as 32-bit integers in the starts table,
//!             so no chunk may grow past what a 32-bit offset can address.
//!
//! DECIMAL_MAX_WIDTH_INT16 (4)
//!       └─> DECIMAL_MAX_WIDTH_INT32 (9)
//!             └─> DECIMAL_MAX_WIDTH_INT64 (18)
//!                   └─> DECIMAL_MAX_WIDTH_INT128 (38)
//!                         Strictly ascending; each tier is the largest
//!                         digit count whose every value fits the integer.
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use pixelcol::config::{DEFAULT_PIXEL_STRIDE, LARGE_VALUE_THRESHOLD};
//! ```

// ============================================================================
// PIXEL LAYOUT
// ============================================================================

/// Default number of rows per pixel.
pub const DEFAULT_PIXEL_STRIDE: usize = 10_000;

/// Default capacity (rows) of a freshly constructed column vector.
pub const DEFAULT_VECTOR_SIZE: usize = 1024;

/// Width in bytes of one entry in the string starts table and of the
/// trailing back-pointer.
pub const STARTS_ENTRY_SIZE: usize = 4;

// ============================================================================
// ARENA CONFIGURATION
// These constants are tightly coupled - changing one may require changing others
// ============================================================================

/// Minimum size of the small-object arena chunk in bytes.
pub const SMALL_ARENA_MIN_SIZE: usize = 16 * 1024;

/// Per-row byte estimate used to size the first small-object chunk.
pub const ESTIMATED_VALUE_SIZE: usize = 16;

/// Values strictly larger than this get a dedicated chunk sized exactly to
/// the value instead of doubling the small-object arena.
pub const LARGE_VALUE_THRESHOLD: usize = 1024 * 1024;

/// Largest chunk the arena may allocate.
pub const MAX_ARENA_CHUNK_SIZE: usize = i32::MAX as usize;

const _: () = assert!(
    LARGE_VALUE_THRESHOLD >= SMALL_ARENA_MIN_SIZE,
    "LARGE_VALUE_THRESHOLD must be >= SMALL_ARENA_MIN_SIZE"
);

const _: () = assert!(
    MAX_ARENA_CHUNK_SIZE >= LARGE_VALUE_THRESHOLD,
    "MAX_ARENA_CHUNK_SIZE must be able to hold a threshold-sized value"
);

// ============================================================================
// DECIMAL PHYSICAL WIDTHS
// ============================================================================

/// Largest precision stored in a 16-bit integer.
pub const DECIMAL_MAX_WIDTH_INT16: u8 = 4;

/// Largest precision stored in a 32-bit integer.
pub const DECIMAL_MAX_WIDTH_INT32: u8 = 9;

/// Largest precision stored in a 64-bit integer.
pub const DECIMAL_MAX_WIDTH_INT64: u8 = 18;

/// Largest precision stored in a 128-bit integer, and the largest supported.
pub const DECIMAL_MAX_WIDTH_INT128: u8 = 38;

const _: () = assert!(
    DECIMAL_MAX_WIDTH_INT16 < DECIMAL_MAX_WIDTH_INT32
        && DECIMAL_MAX_WIDTH_INT32 < DECIMAL_MAX_WIDTH_INT64
        && DECIMAL_MAX_WIDTH_INT64 < DECIMAL_MAX_WIDTH_INT128,
    "decimal width thresholds must be strictly ascending"
);

// ============================================================================
// TEMPORAL
// ============================================================================

/// Largest supported number of fractional-second digits.
pub const MAX_TIMESTAMP_PRECISION: u8 = 6;

pub const MICROS_PER_SECOND: i64 = 1_000_000;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub const MICROS_PER_DAY: i64 = SECONDS_PER_DAY * MICROS_PER_SECOND;

// ============================================================================
// RUN-LENGTH ENCODING
// ============================================================================

/// Shortest run of identical values emitted as a repeat run.
pub const MIN_REPEAT_RUN: usize = 3;

/// Longest literal run buffered before it is emitted.
pub const MAX_LITERAL_RUN: usize = 128;

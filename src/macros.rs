//! # Internal Macros
//!
//! ## vector_base_accessors!
//!
//! Every column vector embeds a [`VectorBase`](crate::vector::VectorBase) in a
//! field named `base` and implements an inherent
//! `ensure_size(&mut self, size: usize, preserve_data: bool)`. This macro
//! generates the accessors and null-handling methods that only touch the
//! base, plus the private `grow_for_append` used by every `add*` method.
//!
//! ### Usage
//!
//! ```ignore
//! pub struct DateColumnVector {
//!     base: VectorBase,
//!     days: Vec<i32>,
//! }
//!
//! impl DateColumnVector {
//!     vector_base_accessors!();
//!
//!     pub fn ensure_size(&mut self, size: usize, preserve_data: bool) { ... }
//! }
//!
//! // Generates:
//! // pub fn base(&self) -> &VectorBase
//! // pub fn length(&self) -> usize
//! // pub fn write_index(&self) -> usize
//! // ...
//! // pub fn add_null(&mut self)
//! // fn grow_for_append(&mut self)
//! ```

macro_rules! vector_base_accessors {
    () => {
        #[inline]
        pub fn base(&self) -> &$crate::vector::VectorBase {
            &self.base
        }

        /// Allocated capacity in rows.
        #[inline]
        pub fn length(&self) -> usize {
            self.base.length()
        }

        #[inline]
        pub fn write_index(&self) -> usize {
            self.base.write_index()
        }

        #[inline]
        pub fn read_index(&self) -> usize {
            self.base.read_index()
        }

        #[inline]
        pub fn is_null(&self, row: usize) -> bool {
            self.base.is_null(row)
        }

        #[inline]
        pub fn no_nulls(&self) -> bool {
            self.base.no_nulls()
        }

        #[inline]
        pub fn memory_usage(&self) -> usize {
            self.base.memory_usage()
        }

        #[inline]
        pub fn is_closed(&self) -> bool {
            self.base.is_closed()
        }

        /// Moves the read cursor one row forward.
        #[inline]
        pub fn advance(&mut self) {
            self.base.advance();
        }

        pub fn set_null(&mut self, row: usize) -> ::eyre::Result<()> {
            self.base.set_null(row)
        }

        /// Appends a null row, growing the vector if it is full.
        pub fn add_null(&mut self) {
            self.grow_for_append();
            self.base.push_null();
        }

        #[inline]
        fn grow_for_append(&mut self) {
            if let Some(size) = self.base.growth_target() {
                self.ensure_size(size, true);
            }
        }
    };
}

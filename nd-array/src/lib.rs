//! Library crate for nd_array
//!
//! Generic N-dimensional numeric arrays with NumPy-like semantics: arbitrary rank shapes, stride
//! based indexing, broadcasting, lazy composable views, axis reductions and tensor contraction.

use small_vec::{SmallVec, small_vec};
use std::rc::Rc;

mod access;
mod batch;
mod constructive;
mod contract;
mod display;
mod error;
mod iterator;
mod math;
mod misc;
mod numeric;
mod reduce;
pub mod shape;
mod slicing;
mod view;

pub use crate::batch::BatchIterator;
pub use crate::error::ArrayError;
pub use crate::iterator::RowIter;
pub use crate::numeric::{DType, Numeric};
pub use crate::view::NdView;

pub type Result<T> = std::result::Result<T, error::ArrayError>;

/// Number of axes kept inline before shapes and indices spill to the heap.
pub const INLINE_RANK: usize = 4;

/// Per-axis sizes (or strides) of an array.
pub type Shape = SmallVec<usize, INLINE_RANK>;

/// A multi-dimensional array of `T` addressed by a row-major flat offset.
///
/// The array either owns its data (a contiguous block or a single repeated value) or derives
/// every element on demand from parent arrays. Derived arrays are produced by view
/// transformations: they hold no storage, never mutate their parents and reject writes.
///
/// Owning data is shared between clones and copied on the first write, so an array taken from a
/// view keeps the values it had when it was evaluated.
///
/// # Strides
/// `strides` follow the row-major layout of `shape`, except for transposed arrays where they
/// record how a multi-index of the array maps into the flat space of its parent.
#[derive(Clone)]
pub struct NdArray<T> {
    shape: Shape,
    strides: Shape,
    count: usize,
    source: Source<T>,
}

/// Where the elements of an array come from.
#[derive(Clone)]
enum Source<T> {
    /// Dense row-major storage.
    Owned(Rc<Vec<T>>),
    /// The same value at every offset.
    Filled(T),
    /// Elements computed from a parent by offset.
    Derived(Rc<dyn Fn(usize) -> Result<T>>),
}

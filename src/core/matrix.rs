//! Strided matrix views over a shared backing store.
//!
//! A [`Matrix`] is a cheap handle: the element buffer lives behind an
//! fixed-length [`Storage`] and every view (row, column, region) is the same
//! buffer plus its own `(left, top, width, height, row_size)` bookkeeping.
//! Creating a view never copies elements, and a write through any handle is
//! visible through every other handle covering the same cell.
//!
//! Element `(x, y)` of a view lives at flat index
//! `left + top * row_size + x + y * row_size` of the backing store.
//!
//! # Example
//!
//! ```
//! use pixelmatrix::core::Matrix;
//!
//! let m = Matrix::<u8>::from_vec(4, 4, (0..16).collect()).unwrap();
//! let window = m.region(1, 1, 2, 2).unwrap();
//! window.set(0, 0, 99).unwrap();
//! assert_eq!(m.get(1, 1).unwrap(), 99);
//! ```

use crate::core::error::{Bounds, MatrixError, MatrixResult};
use crate::core::types::{Element, ElementType};
use parking_lot::{MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// Shared, lockable backing store of a matrix and all of its views.
///
/// The length is fixed at creation: write access hands out a slice, never the
/// buffer itself, so no handle can grow or shrink the store under a view.
pub struct Storage<T> {
    cells: Arc<RwLock<Box<[T]>>>,
}

impl<T> Storage<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            cells: Arc::new(RwLock::new(data.into_boxed_slice())),
        }
    }

    /// Number of cells. Never changes.
    pub fn len(&self) -> usize {
        self.cells.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared read access to every cell.
    pub fn read(&self) -> RwLockReadGuard<'_, Box<[T]>> {
        self.cells.read()
    }

    /// Exclusive write access to every cell.
    pub fn write(&self) -> MappedRwLockWriteGuard<'_, [T]> {
        RwLockWriteGuard::map(self.cells.write(), |cells| &mut **cells)
    }

    /// Whether both handles point at the same cells.
    pub fn ptr_eq(&self, other: &Storage<T>) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            cells: Arc::clone(&self.cells),
        }
    }
}

impl<T> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").field("len", &self.len()).finish()
    }
}

/// Wrap a buffer so it can be handed to [`Matrix::from_storage`] while the
/// caller keeps its own handle.
pub fn shared<T>(data: Vec<T>) -> Storage<T> {
    Storage::new(data)
}

/// A 2-D view over a flat, row-major backing store.
///
/// `Clone` clones the handle, not the elements: the clone aliases the same
/// cells. Use [`Matrix::deep_clone`] for an independent copy. Mutating methods
/// take `&self` because several handles may legitimately write the same store.
#[derive(Clone)]
pub struct Matrix<T: Element> {
    data: Storage<T>,
    data_size: usize,
    width: usize,
    height: usize,
    row_size: usize,
    left: usize,
    top: usize,
}

impl<T: Element> Matrix<T> {
    /// Allocate a zero-filled `width` x `height` matrix.
    pub fn new(width: usize, height: usize) -> MatrixResult<Self> {
        let area = check_dimensions(width, height)?;
        Ok(Self::full(shared(vec![T::default(); area]), width, height))
    }

    /// Take ownership of `data` as the backing store.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> MatrixResult<Self> {
        let area = check_dimensions(width, height)?;
        if data.len() != area {
            return Err(MatrixError::SizeMismatch {
                expected: area,
                actual: data.len(),
            });
        }
        Ok(Self::full(shared(data), width, height))
    }

    /// Wrap a caller-held store. Writes through the matrix are visible to the
    /// caller and the other way round.
    pub fn from_storage(width: usize, height: usize, data: Storage<T>) -> MatrixResult<Self> {
        let area = check_dimensions(width, height)?;
        let len = data.len();
        if len != area {
            return Err(MatrixError::SizeMismatch {
                expected: area,
                actual: len,
            });
        }
        Ok(Self::full(data, width, height))
    }

    /// Build a matrix by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> MatrixResult<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let area = check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(area);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self::full(shared(data), width, height))
    }

    /// Build a matrix from literal rows.
    ///
    /// # Panics
    ///
    /// If `W == 0 || H == 0`.
    pub fn from_rows<const W: usize, const H: usize>(rows: [[T; W]; H]) -> Self {
        assert!(W > 0 && H > 0, "width and height must be non-zero");
        let data = rows.iter().flatten().copied().collect();
        Self::full(shared(data), W, H)
    }

    fn full(data: Storage<T>, width: usize, height: usize) -> Self {
        Self {
            data,
            data_size: width * height,
            width,
            height,
            row_size: width,
            left: 0,
            top: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Shape
    // ------------------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` of this view.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Elements per row of the backing store.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn top(&self) -> usize {
        self.top
    }

    /// Flat index of this view's `(0, 0)`.
    pub fn start(&self) -> usize {
        self.left + self.top * self.row_size
    }

    /// Elements to advance after a logical row to reach the next one.
    pub fn skip(&self) -> usize {
        self.row_size - self.width
    }

    /// Length of the backing store.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Whether this view covers the entire backing store.
    pub fn is_full(&self) -> bool {
        self.left == 0 && self.top == 0 && self.width == self.row_size
            && self.width * self.height == self.data_size
    }

    pub fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    /// Handle to the backing store.
    pub fn storage(&self) -> Storage<T> {
        self.data.clone()
    }

    /// Whether both views sit on the same backing store.
    pub fn shares_storage_with(&self, other: &Matrix<T>) -> bool {
        self.data.ptr_eq(&other.data)
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        self.start() + x + y * self.row_size
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    /// Read element `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> MatrixResult<T> {
        self.check_cell(x, y)?;
        Ok(self.data.read()[self.index(x, y)])
    }

    /// Write element `(x, y)`.
    pub fn set(&self, x: usize, y: usize, value: T) -> MatrixResult<()> {
        self.check_cell(x, y)?;
        let index = self.index(x, y);
        self.data.write()[index] = value;
        Ok(())
    }

    fn check_cell(&self, x: usize, y: usize) -> MatrixResult<()> {
        if x >= self.width {
            return Err(MatrixError::out_of_range("x", x, self.width));
        }
        if y >= self.height {
            return Err(MatrixError::out_of_range("y", y, self.height));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// One-row view of row `y`.
    pub fn row(&self, y: usize) -> MatrixResult<Self> {
        if y >= self.height {
            return Err(MatrixError::out_of_range("row", y, self.height));
        }
        Ok(self.view(0, y, self.width, 1))
    }

    /// One-column view of column `x`. Its skip is `row_size - 1`.
    pub fn column(&self, x: usize) -> MatrixResult<Self> {
        if x >= self.width {
            return Err(MatrixError::out_of_range("column", x, self.width));
        }
        Ok(self.view(x, 0, 1, self.height))
    }

    /// Sub-rectangle view. The rectangle must lie inside this view.
    pub fn region(&self, left: usize, top: usize, width: usize, height: usize) -> MatrixResult<Self> {
        check_dimensions(width, height)?;
        if left >= self.width {
            return Err(MatrixError::out_of_range("region left", left, self.width));
        }
        if top >= self.height {
            return Err(MatrixError::out_of_range("region top", top, self.height));
        }
        if width > self.width - left {
            return Err(MatrixError::OutOfRange {
                what: "region width",
                value: width,
                range: Bounds { start: 1, end: self.width - left + 1 },
            });
        }
        if height > self.height - top {
            return Err(MatrixError::OutOfRange {
                what: "region height",
                value: height,
                range: Bounds { start: 1, end: self.height - top + 1 },
            });
        }
        Ok(self.view(left, top, width, height))
    }

    fn view(&self, left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            data: self.data.clone(),
            data_size: self.data_size,
            width,
            height,
            row_size: self.row_size,
            left: self.left + left,
            top: self.top + top,
        }
    }

    // ------------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------------

    /// Row-major copy of the cells this view covers.
    pub fn to_vec(&self) -> Vec<T> {
        let data = self.data.read();
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let base = self.index(0, y);
            out.extend_from_slice(&data[base..base + self.width]);
        }
        out
    }

    /// Independent, compact copy of this view.
    pub fn deep_clone(&self) -> Self {
        Self::full(shared(self.to_vec()), self.width, self.height)
    }

    /// New compact matrix holding `f` of every cell.
    pub fn map<U, F>(&self, mut f: F) -> Matrix<U>
    where
        U: Element,
        F: FnMut(T) -> U,
    {
        let data = self.to_vec().into_iter().map(&mut f).collect();
        Matrix::full(shared(data), self.width, self.height)
    }

    /// Call `f(x, y, value)` for every cell in row-major order.
    ///
    /// `f` sees a snapshot taken before the first call and runs with the store
    /// unlocked, so it may read or write through any view.
    pub fn for_each_indexed<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, T),
    {
        let snapshot = self.to_vec();
        for (y, row) in snapshot.chunks_exact(self.width).enumerate() {
            for (x, value) in row.iter().enumerate() {
                f(x, y, *value);
            }
        }
    }

    /// Set every cell of this view to `value`.
    pub fn fill(&self, value: T) {
        self.update(|cell| *cell = value);
    }

    /// Rewrite every cell of this view.
    ///
    /// `f` runs on a snapshot with the store unlocked and the results are
    /// written back in one pass, so writes `f` makes through aliasing views
    /// to cells of this view are overwritten.
    pub fn update<F>(&self, f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cells = self.to_vec();
        cells.iter_mut().for_each(f);
        self.write_rows(&cells);
    }

    fn write_rows(&self, cells: &[T]) {
        let mut data = self.data.write();
        for (y, row) in cells.chunks_exact(self.width).enumerate() {
            let base = self.index(0, y);
            data[base..base + self.width].copy_from_slice(row);
        }
    }

    /// Combine every cell with the matching cell of `source`, in place.
    ///
    /// `source` is read into a snapshot before this view is locked, so the two
    /// may share (and even overlap on) the same store.
    pub fn zip_update<U, F>(&self, source: &Matrix<U>, mut f: F) -> MatrixResult<()>
    where
        U: Element,
        F: FnMut(&mut T, U),
    {
        if source.shape() != self.shape() {
            return Err(MatrixError::ShapeMismatch {
                expected: self.shape(),
                actual: source.shape(),
            });
        }
        let snapshot = source.to_vec();
        let mut cells = self.to_vec();
        for (cell, value) in cells.iter_mut().zip(snapshot) {
            f(cell, value);
        }
        self.write_rows(&cells);
        Ok(())
    }

    /// Overwrite this view with the cells of a same-shaped `source`.
    pub fn copy_from(&self, source: &Matrix<T>) -> MatrixResult<()> {
        self.zip_update(source, |cell, value| *cell = value)
    }
}

/// Reject zero extents and areas that do not fit in `usize`. Returns the area.
fn check_dimensions(width: usize, height: usize) -> MatrixResult<usize> {
    match width.checked_mul(height) {
        Some(area) if area > 0 => Ok(area),
        _ => Err(MatrixError::InvalidDimensions { width, height }),
    }
}

impl<T: Element> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("element_type", &T::ELEMENT_TYPE)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_size", &self.row_size)
            .field("left", &self.left)
            .field("top", &self.top)
            .field("data_size", &self.data_size)
            .finish()
    }
}

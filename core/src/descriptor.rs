use crate::{CoreError, Result};

/// Dense row-major matrix of `f32` descriptors, one descriptor per row.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorMatrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl DescriptorMatrix {
    /// Wrap a flat row-major buffer holding `data.len() / cols` rows.
    pub fn new(data: Vec<f32>, cols: usize) -> Result<Self> {
        if cols == 0 {
            if !data.is_empty() {
                return Err(CoreError::ShapeMismatch(format!(
                    "{} values supplied for a zero-column matrix",
                    data.len()
                )));
            }
            return Ok(Self::empty(0));
        }

        if data.len() % cols != 0 {
            return Err(CoreError::ShapeMismatch(format!(
                "buffer of {} values is not a multiple of {} columns",
                data.len(),
                cols
            )));
        }

        let rows = data.len() / cols;
        Ok(Self { data, rows, cols })
    }

    /// A matrix with no rows and the given descriptor width.
    pub fn empty(cols: usize) -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols,
        }
    }

    /// Build a matrix from one vector per descriptor. All rows must share a length.
    ///
    /// An empty slice yields a zero-row, zero-column matrix.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let cols = match rows.first() {
            Some(r) => r.as_ref().len(),
            None => return Ok(Self::empty(0)),
        };

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(CoreError::ShapeMismatch(format!(
                    "row {} has {} columns, expected {}",
                    idx,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow descriptor `idx`. Panics if `idx >= rows()`.
    #[inline]
    pub fn row(&self, idx: usize) -> &[f32] {
        let start = idx * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
    RankMismatch { expected: usize, got: usize },
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
            TensorError::RankMismatch { expected, got } => {
                write!(f, "rank mismatch: expected {expected} dimensions, got {got}")
            }
            TensorError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for leading dimension {len}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

/// Dense row-major array with an explicit shape.
///
/// Heatmap stacks are `[C, H, W]`, pasted masks are `[H, W]`.
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("data", &self.data)
            .finish()
    }
}

fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    shape.iter().try_fold(1usize, |acc, &dim| {
        acc.checked_mul(dim).ok_or(TensorError::ShapeOverflow)
    })
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a tensor by evaluating `f` at every flat index.
    pub fn from_fn(shape: Vec<usize>, f: impl FnMut(usize) -> T) -> Result<Self, TensorError> {
        let count = element_count(&shape)?;
        let data = (0..count).map(f).collect();
        Ok(Self { shape, data })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dims2(&self) -> Result<(usize, usize), TensorError> {
        match self.shape.as_slice() {
            &[h, w] => Ok((h, w)),
            other => Err(TensorError::RankMismatch {
                expected: 2,
                got: other.len(),
            }),
        }
    }

    pub fn dims3(&self) -> Result<(usize, usize, usize), TensorError> {
        match self.shape.as_slice() {
            &[c, h, w] => Ok((c, h, w)),
            other => Err(TensorError::RankMismatch {
                expected: 3,
                got: other.len(),
            }),
        }
    }

    pub fn dims4(&self) -> Result<(usize, usize, usize, usize), TensorError> {
        match self.shape.as_slice() {
            &[n, c, h, w] => Ok((n, c, h, w)),
            other => Err(TensorError::RankMismatch {
                expected: 4,
                got: other.len(),
            }),
        }
    }

    /// Number of elements in one slice along the leading dimension.
    fn slice_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Borrow slice `index` of the leading dimension, e.g. one channel of a
    /// `[C, H, W]` stack.
    pub fn slice(&self, index: usize) -> Result<&[T], TensorError> {
        let len = self.shape.first().copied().ok_or(TensorError::RankMismatch {
            expected: 1,
            got: 0,
        })?;
        if index >= len {
            return Err(TensorError::IndexOutOfBounds { index, len });
        }
        let stride = self.slice_len();
        Ok(&self.data[index * stride..(index + 1) * stride])
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Tensor<U> {
        Tensor {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Tensor<T> {
    /// Copy the leading-dimension range `start..end` into a new tensor.
    pub fn narrow(&self, start: usize, end: usize) -> Result<Self, TensorError> {
        let len = self.shape.first().copied().ok_or(TensorError::RankMismatch {
            expected: 1,
            got: 0,
        })?;
        if start > end || end > len {
            return Err(TensorError::IndexOutOfBounds { index: end, len });
        }
        let stride = self.slice_len();
        let mut shape = self.shape.clone();
        shape[0] = end - start;
        Ok(Self {
            shape,
            data: self.data[start * stride..end * stride].to_vec(),
        })
    }
}

impl<T: Default + Clone> Tensor<T> {
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TensorError> {
        let count = element_count(&shape)?;
        Ok(Self {
            shape,
            data: vec![T::default(); count],
        })
    }
}

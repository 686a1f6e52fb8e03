//! Pairwise travel cost matrix.

use thiserror::Error;

/// Error returned when a matrix cell is addressed out of bounds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("matrix cell ({from}, {to}) is out of bounds for size {size}")]
pub struct MatrixBoundsError {
    /// Requested origin index.
    pub from: usize,
    /// Requested destination index.
    pub to: usize,
    /// Matrix dimension.
    pub size: usize,
}

/// Travel cost between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelLeg {
    /// Driving distance in metres.
    pub meters: u32,
    /// Driving time in seconds.
    pub seconds: u32,
}

impl TravelLeg {
    /// A zero-cost leg; every diagonal cell holds one.
    pub const ZERO: Self = Self {
        meters: 0,
        seconds: 0,
    };
}

/// Square matrix of pairwise travel costs, indexed by the point order the
/// estimator was given.
///
/// Cells are optional: an external table service may fail to route some
/// pair, and the optimizer degrades to identity ordering rather than
/// inventing numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelMatrix {
    size: usize,
    legs: Vec<Option<TravelLeg>>,
}

impl TravelMatrix {
    /// Creates a matrix with zero-cost diagonal cells and every other cell
    /// unknown.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut legs = vec![None; size * size];
        for index in 0..size {
            if let Some(cell) = legs.get_mut(index * size + index) {
                *cell = Some(TravelLeg::ZERO);
            }
        }
        Self { size, legs }
    }

    /// Returns the matrix dimension.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Sets one cell.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixBoundsError`] when either index is out of range.
    pub fn set_leg(
        &mut self,
        from: usize,
        to: usize,
        leg: TravelLeg,
    ) -> Result<(), MatrixBoundsError> {
        let size = self.size;
        if from >= size || to >= size {
            return Err(MatrixBoundsError { from, to, size });
        }
        if let Some(cell) = self.legs.get_mut(from * size + to) {
            *cell = Some(leg);
        }
        Ok(())
    }

    /// Returns one cell, or `None` when it is out of range or unknown.
    #[must_use]
    pub fn leg(&self, from: usize, to: usize) -> Option<TravelLeg> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.legs.get(from * self.size + to).copied().flatten()
    }

    /// Returns `true` when every cell is known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(Option::is_some)
    }
}

//! Generic dense grid addressed by cell coordinates

use crate::core::types::CellCoord;

/// Dense 2D grid sized to the map bounds, O(1) lookup per cell
#[derive(Debug, Clone)]
pub struct Grid<T: Clone> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    /// Build a grid from row-major data. Returns None on a size mismatch.
    pub fn from_data(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    #[inline]
    fn index(&self, cell: CellCoord) -> usize {
        cell.y as usize * self.width + cell.x as usize
    }

    #[inline]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        if self.in_bounds(cell) {
            Some(&self.data[self.index(cell)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, cell: CellCoord) -> Option<&mut T> {
        if self.in_bounds(cell) {
            let idx = self.index(cell);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    /// Set the value at `cell`. Out-of-bounds writes are ignored and
    /// reported as false.
    pub fn set(&mut self, cell: CellCoord, value: T) -> bool {
        if let Some(slot) = self.get_mut(cell) {
            *slot = value;
            true
        } else {
            false
        }
    }

    /// Iterate over all cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(i, value)| {
            let cell = CellCoord::new((i % width) as i32, (i / width) as i32);
            (cell, value)
        })
    }
}

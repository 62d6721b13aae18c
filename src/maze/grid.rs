/// A `(row, col)` position in a grid.
pub type Coord = (usize, usize);

/// Dense row-major storage for one value per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Box<[T]>,
    rows: usize,
    cols: usize,
}

impl<T: Clone> Grid<T> {
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        let data = vec![value; rows * cols].into_boxed_slice();
        Grid { data, rows, cols }
    }

    /// Overwrites every slot with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<T> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        let (row, col) = coord;
        if row >= self.rows || col >= self.cols {
            panic!(
                "IndexOutOfRange: coordinate ({}, {}) is outside the {}x{} grid",
                row, col, self.rows, self.cols
            );
        }
        row * self.cols + col
    }
}

impl<T> std::ops::Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl<T> std::ops::IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing() {
        let mut grid = Grid::new(3, 4, 0u32);
        grid[(2, 3)] = 7;
        assert_eq!(grid[(2, 3)], 7);
        assert_eq!(grid.iter().filter(|&&v| v == 7).count(), 1);
        assert_eq!(grid.len(), 12);
    }

    #[test]
    fn test_coords_are_row_major() {
        let grid = Grid::new(2, 2, ());
        let coords = grid.coords().collect::<Vec<_>>();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    #[should_panic(expected = "IndexOutOfRange")]
    fn test_out_of_range_panics() {
        let grid = Grid::new(2, 2, 0u8);
        let _ = grid[(0, 2)];
    }
}

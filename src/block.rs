//! Axis-aligned rectangular regions.
//!
//! A [`Block`] is a half-open row/column range. It drives both the 4-way
//! split of the airlight search and the fixed-size tiling of the
//! transmission estimator, where the last tile in each direction is clipped
//! at the image border.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl Block {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        debug_assert!(row_start <= row_end && col_start <= col_end);
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// Block covering a whole `width × height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, height, 0, width)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.row_end - self.row_start
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.col_end - self.col_start
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Split at `floor(rows / 2)` and `floor(cols / 2)`.
    ///
    /// Order: top-left, bottom-left, top-right, bottom-right. Callers rely on
    /// this order for tie-breaking.
    pub fn quadrants(&self) -> [Block; 4] {
        let mid_row = self.row_start + self.rows() / 2;
        let mid_col = self.col_start + self.cols() / 2;
        [
            Block::new(self.row_start, mid_row, self.col_start, mid_col),
            Block::new(mid_row, self.row_end, self.col_start, mid_col),
            Block::new(self.row_start, mid_row, mid_col, self.col_end),
            Block::new(mid_row, self.row_end, mid_col, self.col_end),
        ]
    }

    /// Tiles of `patch × patch` covering `width × height` in row-major
    /// order, clipped at the right and bottom borders.
    pub fn tiles(width: usize, height: usize, patch: usize) -> impl Iterator<Item = Block> {
        debug_assert!(patch > 0);
        (0..height).step_by(patch).flat_map(move |row| {
            let row_end = (row + patch).min(height);
            (0..width)
                .step_by(patch)
                .map(move |col| Block::new(row, row_end, col, (col + patch).min(width)))
        })
    }

    /// Tiles of one tile-row starting at `row`.
    pub fn tile_row(width: usize, height: usize, row: usize, patch: usize) -> Vec<Block> {
        let row_end = (row + patch).min(height);
        (0..width)
            .step_by(patch)
            .map(|col| Block::new(row, row_end, col, (col + patch).min(width)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrants_cover_odd_sized_region() {
        let q = Block::full(5, 3).quadrants();
        assert_eq!(q[0], Block::new(0, 1, 0, 2));
        assert_eq!(q[1], Block::new(1, 3, 0, 2));
        assert_eq!(q[2], Block::new(0, 1, 2, 5));
        assert_eq!(q[3], Block::new(1, 3, 2, 5));
        assert_eq!(q.iter().map(Block::area).sum::<usize>(), 15);
    }

    #[test]
    fn tiles_clip_at_border() {
        let tiles: Vec<Block> = Block::tiles(5, 3, 2).collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[2], Block::new(0, 2, 4, 5));
        assert_eq!(tiles[5], Block::new(2, 3, 4, 5));
        assert_eq!(tiles.iter().map(Block::area).sum::<usize>(), 15);
    }

    #[test]
    fn oversized_patch_is_one_tile() {
        let tiles: Vec<Block> = Block::tiles(4, 4, 16).collect();
        assert_eq!(tiles, vec![Block::full(4, 4)]);
    }
}

//! Tetromino kinds, base shapes and clockwise rotation.

/// Tetromino kinds (I, O, T, S, Z, J, L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::S, Self::Z, Self::J, Self::L];

    /// Base (unrotated) shape rows, top row first.
    fn template(&self) -> &'static [&'static [u8]] {
        match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::T => &[&[0, 1, 0], &[1, 1, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Self::J => &[&[1, 0, 0], &[1, 1, 1]],
            Self::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    pub fn base_shape(&self) -> Shape {
        Shape::from_rows(self.template())
    }

    /// Colour index 0..7 for theme.piece_color().
    pub fn color_index(&self) -> u8 {
        match self {
            Self::I => 0, // Cyan
            Self::O => 1, // Yellow
            Self::T => 2, // Purple
            Self::S => 3, // Green
            Self::Z => 4, // Red
            Self::J => 5, // Blue
            Self::L => 6, // Orange
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::J => 'J',
            Self::L => 'L',
        }
    }
}

/// Rectangular 0/1 matrix describing one rotation state of a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|&c| c != 0).collect())
            .collect();
        Self { rows }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Offsets `(dx, dy)` of every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.filled_cells().count()
    }

    /// Clockwise quarter turn: `new[i][j] = old[h - 1 - j][i]`.
    ///
    /// An `h x w` matrix becomes `w x h`; nothing is re-centred.
    pub fn rotated_cw(&self) -> Self {
        let h = self.height();
        let rows = (0..self.width())
            .map(|i| (0..h).map(|j| self.rows[h - 1 - j][i]).collect())
            .collect();
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in TetrominoKind::ALL {
            assert_eq!(kind.base_shape().cell_count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let t = TetrominoKind::T.base_shape();
        let r = t.rotated_cw();
        assert_eq!(r, Shape::from_rows(&[[1, 0], [1, 1], [1, 0]]));
        let r2 = r.rotated_cw();
        assert_eq!(r2, Shape::from_rows(&[[1, 1, 1], [0, 1, 0]]));
    }

    #[test]
    fn test_rotate_i_alternates_dimensions() {
        let i = TetrominoKind::I.base_shape();
        let v = i.rotated_cw();
        assert_eq!((v.width(), v.height()), (1, 4));
        let h = v.rotated_cw();
        assert_eq!((h.width(), h.height()), (4, 1));
        assert_eq!(h, i);
    }

    #[test]
    fn test_rotate_matches_transpose_reverse_rule() {
        let s = Shape::from_rows(&[[1, 0, 0], [1, 1, 0]]);
        let r = s.rotated_cw();
        for i in 0..r.height() {
            for j in 0..r.width() {
                assert_eq!(r.is_filled(j, i), s.is_filled(i, s.height() - 1 - j));
            }
        }
    }

    #[test]
    fn test_four_rotations_cycle_back() {
        for kind in TetrominoKind::ALL {
            let base = kind.base_shape();
            let back = base.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(back, base, "{:?}", kind);
        }
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let o = TetrominoKind::O.base_shape();
        assert_eq!(o.rotated_cw(), o);
    }

    #[test]
    fn test_filled_cells_row_major() {
        let cells: Vec<_> = TetrominoKind::J.base_shape().filled_cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 1), (2, 1)]);
    }
}

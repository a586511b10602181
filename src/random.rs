//! Next-piece selection behind a pluggable source.

use crate::tetromino::TetrominoKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};

/// Supplies the kind of each upcoming piece.
pub trait PieceSource: std::fmt::Debug {
    fn next_kind(&mut self) -> TetrominoKind;
}

/// Independent uniform draw from the seven kinds on every call (no bag).
#[derive(Debug, Clone)]
pub struct UniformSource<R = StdRng> {
    rng: R,
}

impl UniformSource<StdRng> {
    /// The random seed is initialized from the OS's random data source.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + std::fmt::Debug> PieceSource for UniformSource<R> {
    fn next_kind(&mut self) -> TetrominoKind {
        let i = self.rng.random_range(0..TetrominoKind::ALL.len());
        TetrominoKind::ALL[i]
    }
}

/// Replays a fixed list of kinds in order, wrapping around.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    kinds: Vec<TetrominoKind>,
    index: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(kinds: &[TetrominoKind]) -> Self {
        assert!(!kinds.is_empty(), "scripted source needs at least one kind");
        Self {
            kinds: kinds.to_vec(),
            index: 0,
        }
    }
}

#[cfg(test)]
impl PieceSource for ScriptedSource {
    fn next_kind(&mut self) -> TetrominoKind {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }
}

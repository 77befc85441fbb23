//! Injectable dice sources.
//!
//! All sources produce values in `1..=sides`. Production callers wrap a real
//! RNG (see the runtime crate); tests use [`FixedDice`] or [`ScriptedDice`] to
//! make every roll of a resolution predictable.

/// Source of uniformly distributed die results.
pub trait DiceSource {
    /// Roll a die with `sides` faces (1..=sides inclusive).
    fn roll(&mut self, sides: u8) -> u8;

    /// Roll a six-sided die.
    fn d6(&mut self) -> u8 {
        self.roll(6)
    }
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll(&mut self, sides: u8) -> u8 {
        (**self).roll(sides)
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll(&mut self, sides: u8) -> u8 {
        (**self).roll(sides)
    }
}

/// Always rolls the same face (clamped to the die being rolled).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedDice(pub u8);

impl DiceSource for FixedDice {
    fn roll(&mut self, sides: u8) -> u8 {
        self.0.clamp(1, sides.max(1))
    }
}

/// Replays a fixed sequence of faces, cycling when exhausted.
///
/// An empty script behaves like [`FixedDice`] showing 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Number of dice rolled so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, sides: u8) -> u8 {
        let face = if self.faces.is_empty() {
            1
        } else {
            self.faces[self.cursor % self.faces.len()]
        };
        self.cursor += 1;
        face.clamp(1, sides.max(1))
    }
}

/// Self-contained PCG-XSH-RR stream.
///
/// Deterministic for a given seed, with no dependency on an external RNG crate.
/// Useful for replaying a resolution from a stored seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgDice {
    state: u64,
}

impl PcgDice {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn from_seed(seed: u64) -> Self {
        Self {
            state: mix_seed(seed, 0),
        }
    }

    #[inline]
    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let state = self.step();
        Self::output(state)
    }
}

impl DiceSource for PcgDice {
    fn roll(&mut self, sides: u8) -> u8 {
        let sides = u32::from(sides.max(1));
        ((self.next_u32() % sides) + 1) as u8
    }
}

/// Derive an independent seed for a sub-stream (e.g. one simulation shard).
///
/// Uses a SplitMix64-style avalanche so nearby inputs produce unrelated seeds.
pub fn mix_seed(seed: u64, stream: u64) -> u64 {
    let mut hash = seed ^ stream.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;
    hash
}

//! Sources of the ten-sided draw that decides between exact and random paths.

use std::{collections::VecDeque, ops::RangeInclusive};

use rand::Rng;

/// Values a draw may take.
pub const DRAW_RANGE: RangeInclusive<u8> = 1..=10;

/// Produces draws in [`DRAW_RANGE`].
pub trait Roll {
    /// Draws the next value.
    fn draw(&mut self) -> u8;
}

/// Uniform draws taken from a random number generator.
#[derive(Clone, Debug)]
pub struct RngRoll<R> {
    rng: R,
}

impl<R: Rng> RngRoll<R> {
    /// Wraps the generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> Roll for RngRoll<R> {
    fn draw(&mut self) -> u8 {
        self.rng.gen_range(DRAW_RANGE)
    }
}

/// Replays a fixed sequence of draws, repeating the last one once exhausted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedRoll {
    queue: VecDeque<u8>,
    last: u8,
}

impl FixedRoll {
    /// Always draws `value`.
    #[must_use]
    pub fn always(value: u8) -> Self {
        Self {
            queue: VecDeque::new(),
            last: value,
        }
    }

    /// Draws `values` in order, then keeps repeating the final value. An
    /// empty sequence behaves like [`FixedRoll::always`] with the top draw.
    #[must_use]
    pub fn sequence(values: impl IntoIterator<Item = u8>) -> Self {
        let queue: VecDeque<u8> = values.into_iter().collect();
        let last = queue.back().copied().unwrap_or(*DRAW_RANGE.end());
        Self { queue, last }
    }
}

impl Roll for FixedRoll {
    fn draw(&mut self) -> u8 {
        self.queue.pop_front().unwrap_or(self.last)
    }
}

impl<T: Roll + ?Sized> Roll for &mut T {
    fn draw(&mut self) -> u8 {
        (**self).draw()
    }
}

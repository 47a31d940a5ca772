//! Per-frame movement request as a set of axis flags.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Which movement axes are requested this frame. Opposite flags may both be
/// set and cancel each other out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementIntent(pub u8);

impl MovementIntent {
    pub const NONE: Self = Self(0);
    pub const FORWARD: Self = Self(1 << 0);
    pub const BACKWARD: Self = Self(1 << 1);
    pub const LEFT: Self = Self(1 << 2);
    pub const RIGHT: Self = Self(1 << 3);
    pub const UP: Self = Self(1 << 4);
    pub const DOWN: Self = Self(1 << 5);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Set `flag` when `on` is true. Handy when folding key state.
    pub fn set(&mut self, flag: Self, on: bool) {
        if on {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl BitOr for MovementIntent {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MovementIntent {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for MovementIntent {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

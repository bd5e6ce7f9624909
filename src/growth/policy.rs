/// Opaque-neighbor flags of a frontier pixel.
///
/// Four bits, most significant first: west, north, south, east.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NeighborFlags(u8);

impl NeighborFlags {
    /// West neighbor is opaque.
    pub const WEST: u8 = 0b1000;
    /// North neighbor is opaque.
    pub const NORTH: u8 = 0b0100;
    /// South neighbor is opaque.
    pub const SOUTH: u8 = 0b0010;
    /// East neighbor is opaque.
    pub const EAST: u8 = 0b0001;
    /// Mask of all four direction bits.
    pub const ALL: u8 = 0b1111;

    /// Build flags from the low four bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Raw four-bit field.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// West neighbor is opaque.
    pub const fn west(self) -> bool {
        self.0 & Self::WEST != 0
    }

    /// North neighbor is opaque.
    pub const fn north(self) -> bool {
        self.0 & Self::NORTH != 0
    }

    /// South neighbor is opaque.
    pub const fn south(self) -> bool {
        self.0 & Self::SOUTH != 0
    }

    /// East neighbor is opaque.
    pub const fn east(self) -> bool {
        self.0 & Self::EAST != 0
    }

    /// Number of opaque horizontal neighbors (west, east).
    pub const fn horizontal(self) -> u8 {
        self.west() as u8 + self.east() as u8
    }

    /// Number of opaque vertical neighbors (north, south).
    pub const fn vertical(self) -> u8 {
        self.north() as u8 + self.south() as u8
    }

    /// Return `true` when no neighbor is opaque.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Decides whether a frontier pixel becomes opaque, from its neighbor flags.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthPolicy {
    /// Always grow.
    Always,
    /// Grow when at least one neighbor is opaque.
    AnyNeighbor,
    /// Grow on outward corners: exactly one horizontal and one vertical neighbor.
    Corners,
    /// Grow everywhere except outward corners.
    NotCorners,
    /// Grow from horizontal neighbors only, never where a vertical neighbor exists.
    StrictHorizontal,
    /// Grow from vertical neighbors only, never where a horizontal neighbor exists.
    StrictVertical,
    /// Caller-supplied decision function.
    #[serde(skip)]
    Custom(fn(NeighborFlags) -> bool),
}

impl GrowthPolicy {
    /// Evaluate the policy for one pixel.
    #[inline]
    pub fn grows(&self, n: NeighborFlags) -> bool {
        match self {
            Self::Always => true,
            Self::AnyNeighbor => !n.is_empty(),
            Self::Corners => is_corner(n),
            Self::NotCorners => !is_corner(n),
            Self::StrictHorizontal => n.vertical() == 0 && n.horizontal() > 0,
            Self::StrictVertical => n.horizontal() == 0 && n.vertical() > 0,
            Self::Custom(f) => f(n),
        }
    }

    /// Stable kebab-case name, `custom` for caller-supplied functions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::AnyNeighbor => "any-neighbor",
            Self::Corners => "corners",
            Self::NotCorners => "not-corners",
            Self::StrictHorizontal => "strict-horizontal",
            Self::StrictVertical => "strict-vertical",
            Self::Custom(_) => "custom",
        }
    }
}

fn is_corner(n: NeighborFlags) -> bool {
    n.horizontal() == 1 && n.vertical() == 1
}

#[cfg(test)]
#[path = "../../tests/unit/growth/policy.rs"]
mod tests;

// Block coordinates, sides and connection bitmasks

use glam::IVec3;
use std::fmt;

/// Integer coordinate of a single world cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location(pub IVec3);

impl Location {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    /// The neighboring cell on the given side
    pub fn offset(self, side: Side) -> Self {
        Self(self.0 + side.direction())
    }

    /// This cell shifted vertically by `dy`
    pub fn raised(self, dy: i32) -> Self {
        Self(self.0 + IVec3::new(0, dy, 0))
    }

    pub fn above(self) -> Self {
        self.raised(1)
    }

    pub fn below(self) -> Self {
        self.raised(-1)
    }
}

impl From<IVec3> for Location {
    fn from(value: IVec3) -> Self {
        Self(value)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

/// One of the six faces of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Left,
    Right,
    Front,
    Back,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Top,
        Side::Left,
        Side::Right,
        Side::Front,
        Side::Back,
        Side::Bottom,
    ];

    /// The four sides a track can run along
    pub const HORIZONTAL: [Side; 4] = [Side::Left, Side::Right, Side::Front, Side::Back];

    /// Unit offset to the neighbor on this side
    pub fn direction(self) -> IVec3 {
        match self {
            Side::Top => IVec3::Y,
            Side::Bottom => IVec3::NEG_Y,
            Side::Left => IVec3::NEG_X,
            Side::Right => IVec3::X,
            Side::Front => IVec3::NEG_Z,
            Side::Back => IVec3::Z,
        }
    }

    pub fn reverse(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }

    /// Flag used for this side in a connection mask
    pub const fn flag(self) -> SideFlags {
        match self {
            Side::Top => SideFlags::TOP,
            Side::Left => SideFlags::LEFT,
            Side::Right => SideFlags::RIGHT,
            Side::Front => SideFlags::FRONT,
            Side::Back => SideFlags::BACK,
            Side::Bottom => SideFlags::BOTTOM,
        }
    }
}

bitflags::bitflags! {
    /// Set of sides packed into the low six bits of a byte
    ///
    /// Rail block identifiers are the decimal rendering of this byte, so
    /// `"6"` is a piece connecting left and right.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SideFlags: u8 {
        const TOP = 1 << 0;
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const FRONT = 1 << 3;
        const BACK = 1 << 4;
        const BOTTOM = 1 << 5;
    }
}

impl From<Side> for SideFlags {
    fn from(side: Side) -> Self {
        side.flag()
    }
}

impl SideFlags {
    pub fn from_sides<I: IntoIterator<Item = Side>>(sides: I) -> Self {
        sides.into_iter().map(Side::flag).collect()
    }

    /// Decode a rail identifier such as `"12"`
    pub fn parse(identifier: &str) -> Option<Self> {
        identifier.parse::<u8>().ok().and_then(Self::from_bits)
    }

    /// Number of connected sides, vertical ones included
    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }

    pub fn horizontal_count(self) -> u32 {
        (self & Self::HORIZONTAL).bits().count_ones()
    }

    pub fn sides(self) -> impl Iterator<Item = Side> {
        Side::ALL.into_iter().filter(move |side| self.contains(side.flag()))
    }

    /// Identifier string used for the rail variant with these connections
    pub fn identifier(self) -> String {
        self.bits().to_string()
    }

    /// The four sides a track can run along
    const HORIZONTAL: Self = Self::LEFT
        .union(Self::RIGHT)
        .union(Self::FRONT)
        .union(Self::BACK);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_flags_cover_mask() {
        let all = SideFlags::from_sides(Side::ALL);
        assert_eq!(all, SideFlags::all());
        assert_eq!(all.bits(), 0b11_1111);
        assert_eq!(Side::Back.flag().bits(), 16);
    }

    #[test]
    fn test_reverse_is_opposite_direction() {
        for side in Side::ALL {
            assert_eq!(side.direction(), -side.reverse().direction());
            assert_eq!(side.reverse().reverse(), side);
        }
    }

    #[test]
    fn test_location_offsets() {
        let origin = Location::new(0, 0, 0);
        assert_eq!(origin.offset(Side::Right), Location::new(1, 0, 0));
        assert_eq!(origin.offset(Side::Front), Location::new(0, 0, -1));
        assert_eq!(origin.above(), Location::new(0, 1, 0));
        assert_eq!(origin.raised(-1), origin.below());
    }

    #[test]
    fn test_parse_identifier() {
        let flags = SideFlags::parse("6").unwrap();
        assert!(flags.contains(Side::Left.flag()));
        assert!(flags.contains(SideFlags::RIGHT));
        assert_eq!(flags.count(), 2);
        assert_eq!(flags.identifier(), "6");
    }

    #[test]
    fn test_parse_rejects_non_masks() {
        assert!(SideFlags::parse("64").is_none());
        assert!(SideFlags::parse("-1").is_none());
        assert!(SideFlags::parse("junction").is_none());
        assert!(SideFlags::parse("").is_none());
    }

    #[test]
    fn test_count_includes_vertical() {
        let sloped = SideFlags::from_sides([Side::Left, Side::Top]);
        assert_eq!(sloped.count(), 2);
        assert_eq!(sloped.horizontal_count(), 1);
    }

    #[test]
    fn test_sides_roundtrip() {
        let flags = SideFlags::from_sides([Side::Front, Side::Back]);
        let sides: Vec<_> = flags.sides().collect();
        assert_eq!(sides, vec![Side::Front, Side::Back]);
        assert_eq!(SideFlags::from_sides(sides), flags);
    }
}

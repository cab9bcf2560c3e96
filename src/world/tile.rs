//! Tile definitions
//!
//! A tile is one grid cell: an occupancy flag, a wall state on each of its
//! four sides, and the rendering hints (palettes and sprite slot) that the
//! map file carries along.

use serde::{Deserialize, Serialize};

/// Palette indices understood by the map renderer
pub mod palette {
    pub const DEFAULT: i16 = 0;
    pub const BLACK: i16 = 1;
    pub const WHITE: i16 = 2;
    pub const RED: i16 = 3;
    pub const GREEN: i16 = 4;
    pub const BLUE: i16 = 5;
    pub const YELLOW: i16 = 6;
    pub const MAGENTA: i16 = 7;
    pub const CYAN: i16 = 8;
}

/// State of one side of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WallState {
    #[default]
    None,
    Wall,
    Door,
}

impl WallState {
    /// Can something walk across this side?
    pub fn is_passable(&self) -> bool {
        !matches!(self, WallState::Wall)
    }

    /// 2-bit form used by the map file
    pub fn bits(&self) -> u8 {
        match self {
            WallState::None => 0,
            WallState::Wall => 1,
            WallState::Door => 2,
        }
    }

    /// Decode a 2-bit field; both 2 and 3 are doors
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => WallState::None,
            1 => WallState::Wall,
            _ => WallState::Door,
        }
    }
}

/// One of the four sides of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Up, Side::Down, Side::Left, Side::Right];

    pub fn opposite(&self) -> Side {
        match self {
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Grid step (dx, dy) towards the neighbor on this side
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Side::Up => (0, -1),
            Side::Down => (0, 1),
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
        }
    }

    fn index(&self) -> usize {
        match self {
            Side::Up => 0,
            Side::Down => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }
}

/// What is drawn on top of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sprite {
    #[default]
    None,
    /// Index into the renderer's sprite list
    Index(u32),
    /// A single character drawn in the given palette
    Glyph { ch: u8, palette: u8 },
}

/// Raw sprite value meaning "no sprite"
pub const NO_SPRITE: i32 = -1;

impl Sprite {
    /// Encode into the signed integer stored in the map file.
    ///
    /// Returns `None` for sprites the encoding cannot tell apart: indices
    /// above `i32::MAX`, and palette-0 glyphs with `ch` 0 or 1, which would
    /// read back as index 0 or as no sprite.
    pub fn to_raw(&self) -> Option<i32> {
        match *self {
            Sprite::None => Some(NO_SPRITE),
            Sprite::Index(idx) => i32::try_from(idx).ok(),
            Sprite::Glyph { ch, palette } => {
                let packed = (i32::from(palette) << 8) | i32::from(ch);
                (packed > 1).then_some(-packed)
            }
        }
    }

    pub fn from_raw(raw: i32) -> Self {
        if raw == NO_SPRITE {
            Sprite::None
        } else if raw >= 0 {
            Sprite::Index(raw as u32)
        } else {
            let packed = raw.unsigned_abs();
            Sprite::Glyph {
                ch: (packed & 0xff) as u8,
                palette: ((packed >> 8) & 0xff) as u8,
            }
        }
    }

    pub fn glyph(&self) -> Option<char> {
        match self {
            Sprite::Glyph { ch, .. } => Some(*ch as char),
            _ => None,
        }
    }
}

/// A single tile in the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub occupied: bool,
    walls: [WallState; 4],
    /// Background palette override (0 = renderer default)
    pub bg_palette: i16,
    pub sprite: Sprite,
    /// Palette override for the sprite
    pub sprite_palette: i16,
}

impl Tile {
    /// An unoccupied tile with no walls
    pub fn empty() -> Self {
        Self {
            occupied: false,
            walls: [WallState::None; 4],
            bg_palette: palette::DEFAULT,
            sprite: Sprite::None,
            sprite_palette: palette::DEFAULT,
        }
    }

    pub fn wall(&self, side: Side) -> WallState {
        self.walls[side.index()]
    }

    pub fn set_wall(&mut self, side: Side, state: WallState) {
        self.walls[side.index()] = state;
    }

    pub fn up(&self) -> WallState {
        self.wall(Side::Up)
    }

    pub fn down(&self) -> WallState {
        self.wall(Side::Down)
    }

    pub fn left(&self) -> WallState {
        self.wall(Side::Left)
    }

    pub fn right(&self) -> WallState {
        self.wall(Side::Right)
    }

    /// Pack the four walls as `(left<<6)|(right<<4)|(up<<2)|down`
    pub fn wall_byte(&self) -> u8 {
        (self.left().bits() << 6)
            | (self.right().bits() << 4)
            | (self.up().bits() << 2)
            | self.down().bits()
    }

    /// Inverse of [`Tile::wall_byte`]
    pub fn set_wall_byte(&mut self, byte: u8) {
        self.set_wall(Side::Left, WallState::from_bits(byte >> 6));
        self.set_wall(Side::Right, WallState::from_bits(byte >> 4));
        self.set_wall(Side::Up, WallState::from_bits(byte >> 2));
        self.set_wall(Side::Down, WallState::from_bits(byte));
    }

    pub fn door_count(&self) -> usize {
        self.walls.iter().filter(|w| **w == WallState::Door).count()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_byte_layout() {
        let mut tile = Tile::empty();
        tile.set_wall(Side::Left, WallState::Wall);
        tile.set_wall(Side::Down, WallState::Door);
        assert_eq!(tile.wall_byte(), 0b01_00_00_10);
    }

    #[test]
    fn test_wall_byte_three_reads_as_door() {
        let mut tile = Tile::empty();
        tile.set_wall_byte(0b11_01_00_11);
        assert_eq!(tile.left(), WallState::Door);
        assert_eq!(tile.right(), WallState::Wall);
        assert_eq!(tile.up(), WallState::None);
        assert_eq!(tile.down(), WallState::Door);
        assert_eq!(tile.door_count(), 2);
    }

    #[test]
    fn test_glyph_sprite_encoding() {
        let sprite = Sprite::Glyph { ch: b'S', palette: palette::GREEN as u8 };
        assert_eq!(sprite.to_raw(), Some(-((4 << 8) | 'S' as i32)));
        assert_eq!(Sprite::from_raw(sprite.to_raw().unwrap()), sprite);
        assert_eq!(Sprite::from_raw(NO_SPRITE), Sprite::None);
        assert_eq!(Sprite::from_raw(7), Sprite::Index(7));
    }

    #[test]
    fn test_ambiguous_sprites_not_encoded() {
        assert_eq!(Sprite::Index(i32::MAX as u32).to_raw(), Some(i32::MAX));
        assert_eq!(Sprite::Index(i32::MAX as u32 + 1).to_raw(), None);
        assert_eq!(Sprite::Glyph { ch: 0, palette: 0 }.to_raw(), None);
        assert_eq!(Sprite::Glyph { ch: 1, palette: 0 }.to_raw(), None);

        // Everything that does encode comes back unchanged
        for sprite in [
            Sprite::None,
            Sprite::Index(0),
            Sprite::Glyph { ch: 2, palette: 0 },
            Sprite::Glyph { ch: 0, palette: 1 },
            Sprite::Glyph { ch: 255, palette: 255 },
        ] {
            assert_eq!(sprite.to_raw().map(Sprite::from_raw), Some(sprite));
        }
    }

    #[test]
    fn test_extreme_raw_sprite_does_not_panic() {
        assert_eq!(Sprite::from_raw(i32::MIN), Sprite::Glyph { ch: 0, palette: 0 });
    }

    #[test]
    fn test_opposite_sides() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            let (dx, dy) = side.offset();
            let (ox, oy) = side.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }
}

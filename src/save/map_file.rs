//! Map file format
//!
//! Plain text, one tile per line:
//!
//! ```text
//! <rows> <cols>
//! <bgPalette> <wallByte> <isEmpty> <spriteIndex> <spritePalette>
//! ...
//! ```
//!
//! Tiles are listed row by row. The sprite fields may be left off and fall
//! back to "no sprite" and the default palette; anything shorter than three
//! fields is rejected. Whatever follows the last tile line is not read.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::world::tile::{palette, Sprite, NO_SPRITE};
use crate::world::{Map, MapError, Tile};

/// Fields every tile line must carry
const REQUIRED_FIELDS: usize = 3;

/// Map file errors
#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("map file is empty")]
    MissingHeader,

    #[error("invalid map header: {0:?}")]
    InvalidHeader(String),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("map file ends before the tile at row {row}, column {col}")]
    MissingTile { row: i32, col: i32 },

    #[error("tile at row {row}, column {col} has {found} fields, expected at least {REQUIRED_FIELDS}")]
    ShortTile { row: i32, col: i32, found: usize },

    #[error("tile at row {row}, column {col}: {sprite:?} has no file encoding")]
    UnencodableSprite { row: i32, col: i32, sprite: Sprite },

    #[error("tile at row {row}, column {col}: invalid {field} {value:?}")]
    InvalidField {
        row: i32,
        col: i32,
        field: &'static str,
        value: String,
    },
}

/// Write a map in the text format. Fails on a sprite that would not read
/// back as itself; lines before it may already have been written.
pub fn write_map<W: Write>(map: &Map, out: &mut W) -> Result<(), MapFileError> {
    writeln!(out, "{} {}", map.rows, map.cols)?;
    for (idx, tile) in map.tiles.iter().enumerate() {
        let sprite = tile.sprite.to_raw().ok_or_else(|| {
            let (col, row) = map.idx_to_xy(idx);
            MapFileError::UnencodableSprite {
                row,
                col,
                sprite: tile.sprite,
            }
        })?;
        writeln!(
            out,
            "{} {} {} {} {}",
            tile.bg_palette,
            tile.wall_byte(),
            if tile.occupied { 0 } else { -1 },
            sprite,
            tile.sprite_palette
        )?;
    }
    Ok(())
}

/// Read a map written by [`write_map`]. Nothing is returned unless every
/// tile was read.
pub fn read_map<R: BufRead>(input: R) -> Result<Map, MapFileError> {
    let mut lines = input.lines();

    let header = lines.next().ok_or(MapFileError::MissingHeader)??;
    let (rows, cols) = parse_header(&header)?;
    let mut map = Map::new(rows, cols)?;

    let mut lines = lines.filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()));
    for idx in 0..map.tiles.len() {
        let (col, row) = map.idx_to_xy(idx);
        let line = lines.next().ok_or(MapFileError::MissingTile { row, col })??;
        map.tiles[idx] = parse_tile(&line, row, col)?;
    }

    log::debug!("Read {}x{} map", rows, cols);
    Ok(map)
}

/// Save a map to a file
pub fn save_map(map: &Map, path: &Path) -> Result<(), MapFileError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_map(map, &mut out)?;
    out.flush()?;
    log::info!("Map written to {}", path.display());
    Ok(())
}

/// Load a map from a file
pub fn load_map(path: &Path) -> Result<Map, MapFileError> {
    let map = read_map(BufReader::new(File::open(path)?))?;
    log::info!("Map loaded from {}", path.display());
    Ok(map)
}

fn parse_header(line: &str) -> Result<(i32, i32), MapFileError> {
    let invalid = || MapFileError::InvalidHeader(line.to_string());
    let mut fields = line.split_whitespace();

    let rows = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    let cols = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    Ok((rows, cols))
}

fn parse_tile(line: &str, row: i32, col: i32) -> Result<Tile, MapFileError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(MapFileError::ShortTile {
            row,
            col,
            found: fields.len(),
        });
    }

    fn field<T: std::str::FromStr>(
        fields: &[&str],
        idx: usize,
        name: &'static str,
        row: i32,
        col: i32,
    ) -> Result<Option<T>, MapFileError> {
        match fields.get(idx) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| MapFileError::InvalidField {
                row,
                col,
                field: name,
                value: raw.to_string(),
            }),
        }
    }

    let mut tile = Tile::empty();
    tile.bg_palette = field(&fields, 0, "background palette", row, col)?.unwrap_or(palette::DEFAULT);
    tile.set_wall_byte(field(&fields, 1, "wall byte", row, col)?.unwrap_or(0u8));
    tile.occupied = field::<i32>(&fields, 2, "empty flag", row, col)?.unwrap_or(-1) == 0;
    tile.sprite = Sprite::from_raw(field(&fields, 3, "sprite index", row, col)?.unwrap_or(NO_SPRITE));
    tile.sprite_palette = field(&fields, 4, "sprite palette", row, col)?.unwrap_or(palette::DEFAULT);
    Ok(tile)
}

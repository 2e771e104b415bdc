// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The tatami placement model.
//!
//! A room `xmax × ymax` is covered by `n = xmax·ymax / 2` tiles. Tile `i` is
//! three variables: the origin `(x_i, y_i)` of its lower-left corner and its
//! x-extent `w_i ∈ {1, 2}`. Its y-extent is `3 - w_i`, so the opposite corner
//! is `(x_i + w_i, y_i + 3 - w_i)`.
//!
//! Variables are declared as all x-origins, then all y-origins, then all
//! x-extents; a solution lists values in that order.
//!
//! Besides exact cover (bounds and pairwise non-overlap) the model carries
//! symmetry breaking: tiles are numbered in increasing `(x, y)` order, the
//! first tile sits at the origin, the last tile touches the far corner, and
//! in a square room the first two tiles share an x-origin. Pairs of tiles
//! whose far and near corners coincide are excluded, which rules out four
//! tiles meeting at one point.

use crate::domain::VarId;
use crate::error::TatamiError;
use crate::model::{Constraint, LinExpr, Model, ModelBuilder};
use std::fmt;

/// Largest supported room side.
pub const MAX_SIDE: u32 = 64;

/// Combined length of a tile's two sides.
pub const TILE_LENGTH: i32 = 3;

/// Dimensions of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Room {
    pub xmax: u32,
    pub ymax: u32,
}

impl Room {
    pub fn new(xmax: u32, ymax: u32) -> Self {
        Self { xmax, ymax }
    }

    /// Number of unit cells.
    pub fn area(self) -> u64 {
        u64::from(self.xmax) * u64::from(self.ymax)
    }

    pub fn is_square(self) -> bool {
        self.xmax == self.ymax
    }

    /// Number of tiles covering the room, if its area is even.
    pub fn num_tiles(self) -> Option<usize> {
        let area = self.area();
        (area % 2 == 0).then(|| (area / 2) as usize)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.xmax, self.ymax)
    }
}

/// The variables of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileVars {
    pub x: VarId,
    pub y: VarId,
    pub x_extent: VarId,
}

impl TileVars {
    /// `x + w`
    pub fn x_end(&self) -> LinExpr {
        self.x + self.x_extent
    }

    /// `y + 3 - w`
    pub fn y_end(&self) -> LinExpr {
        self.y + TILE_LENGTH - self.x_extent
    }
}

/// A model together with the tile structure it was built from.
#[derive(Debug, Clone)]
pub struct TatamiModel {
    room: Room,
    model: Model,
    tiles: Vec<TileVars>,
}

impl TatamiModel {
    pub fn room(&self) -> Room {
        self.room
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn tiles(&self) -> &[TileVars] {
        &self.tiles
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }
}

/// Build the placement model for `room`.
///
/// Fails with [`TatamiError::OddArea`] before declaring anything when the
/// area is odd, and with [`TatamiError::RoomTooLarge`] when a side exceeds
/// [`MAX_SIDE`]. A room with zero area has no tiles, no constraints and a
/// single empty solution, whatever the length of its other side.
pub fn build_model(room: Room) -> Result<TatamiModel, TatamiError> {
    let Room { xmax, ymax } = room;
    let n = room.num_tiles().ok_or(TatamiError::OddArea {
        xmax,
        ymax,
        area: room.area(),
    })?;
    // With no tiles no coordinate is ever declared, so any side length works
    if n > 0 && (xmax > MAX_SIDE || ymax > MAX_SIDE) {
        return Err(TatamiError::RoomTooLarge { xmax, ymax });
    }
    let (xmax, ymax) = (i64::from(xmax), i64::from(ymax));

    let mut builder = ModelBuilder::new();
    let xs = (0..n)
        .map(|_| builder.new_var(0..xmax))
        .collect::<Result<Vec<_>, _>>()?;
    let ys = (0..n)
        .map(|_| builder.new_var(0..ymax))
        .collect::<Result<Vec<_>, _>>()?;
    let extents = (0..n)
        .map(|_| builder.new_var([1, 2]))
        .collect::<Result<Vec<_>, _>>()?;
    let tiles: Vec<TileVars> = (0..n)
        .map(|i| TileVars {
            x: xs[i],
            y: ys[i],
            x_extent: extents[i],
        })
        .collect();

    for tile in &tiles {
        builder.post(Constraint::less_equal(tile.x_end(), xmax));
        builder.post(Constraint::less_equal(tile.y_end(), ymax));
    }

    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            // b is left of, right of, above or below a
            builder.post(
                Constraint::less_equal(b.x_end(), a.x)
                    | Constraint::greater_equal(b.x, a.x_end())
                    | Constraint::greater_equal(b.y, a.y_end())
                    | Constraint::less_equal(b.y_end(), a.y),
            );
        }
    }

    for pair in tiles.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        builder.post(
            Constraint::less_than(a.x, b.x)
                | (Constraint::equal(a.x, b.x) & Constraint::less_than(a.y, b.y)),
        );
    }

    // Only the far corner of the lower-numbered tile is compared with the
    // near corner of the higher-numbered one.
    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            builder.post(
                Constraint::not_equal(a.x_end(), b.x) | Constraint::not_equal(a.y_end(), b.y),
            );
        }
    }

    if room.is_square() && n >= 2 {
        builder.post(Constraint::equal(tiles[0].x, tiles[1].x));
    }

    if let (Some(first), Some(last)) = (tiles.first(), tiles.last()) {
        builder
            .post(Constraint::equal(first.x, 0))
            .post(Constraint::equal(first.y, 0))
            .post(Constraint::equal(last.x_end(), xmax))
            .post(Constraint::equal(last.y_end(), ymax));
    }

    let model = builder.build();
    log::debug!(
        "room {}: {} tiles, {} variables, {} constraints",
        room,
        n,
        model.num_vars(),
        model.constraints().len()
    );

    Ok(TatamiModel { room, model, tiles })
}

/// A placed tile, decoded from a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub x_extent: i32,
}

impl Tile {
    /// Decode the flat `[x.., y.., w..]` vector into tiles.
    ///
    /// Trailing values that do not make up a full triple are ignored.
    pub fn decode(values: &[i32]) -> Vec<Tile> {
        let n = values.len() / 3;
        (0..n)
            .map(|i| Tile {
                x: values[i],
                y: values[n + i],
                x_extent: values[2 * n + i],
            })
            .collect()
    }

    pub fn width(&self) -> i32 {
        self.x_extent
    }

    pub fn height(&self) -> i32 {
        TILE_LENGTH - self.x_extent
    }

    /// `(x, y, x_end, y_end)`
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.x + self.width(), self.y + self.height())
    }

    /// Unit cells covered, as lower-left corners.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, y0, x1, y1) = self.rect();
        (x0..x1).flat_map(move |x| (y0..y1).map(move |y| (x, y)))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x0, y0, x1, y1) = self.rect();
        write!(f, "({}, {})-({}, {})", x0, y0, x1, y1)
    }
}

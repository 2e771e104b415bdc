// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

pub mod predicates;

use std::collections::HashMap;

use tatami_search::context::SearchContext;
use tatami_search::{build_model, Predicate, PredicateResult, Room, Solutions, Tile};

/// Every solution of `xmax × ymax`, as flat value vectors, in search order.
pub fn solve(xmax: u32, ymax: u32) -> Vec<Vec<i32>> {
    let tatami = build_model(Room::new(xmax, ymax)).expect("even room");
    Solutions::new(tatami.model())
        .map(|solution| solution.into_values())
        .collect()
}

/// Check that `tiles` cover every cell of the room exactly once.
pub fn covers_exactly(room: Room, tiles: &[Tile]) -> bool {
    let (xmax, ymax) = (room.xmax as i32, room.ymax as i32);
    let mut seen = vec![false; (xmax * ymax) as usize];
    for tile in tiles {
        for (x, y) in tile.cells() {
            if x < 0 || y < 0 || x >= xmax || y >= ymax {
                return false;
            }
            let cell = &mut seen[(y * xmax + x) as usize];
            if *cell {
                return false;
            }
            *cell = true;
        }
    }
    seen.iter().all(|&covered| covered)
}

/// Find an interior point where four tile corners meet.
pub fn four_corner_point(room: Room, tiles: &[Tile]) -> Option<(i32, i32)> {
    let mut corners: HashMap<(i32, i32), usize> = HashMap::new();
    for tile in tiles {
        let (x0, y0, x1, y1) = tile.rect();
        for point in [(x0, y0), (x0, y1), (x1, y0), (x1, y1)] {
            *corners.entry(point).or_default() += 1;
        }
    }
    let (xmax, ymax) = (room.xmax as i32, room.ymax as i32);
    corners
        .into_iter()
        .filter(|&((x, y), count)| count == 4 && x > 0 && y > 0 && x < xmax && y < ymax)
        .map(|(point, _)| point)
        .min()
}

/// Check that tiles are numbered in strictly increasing `(x, y)` order.
pub fn is_ordered(tiles: &[Tile]) -> bool {
    tiles.windows(2).all(|pair| (pair[0].x, pair[0].y) < (pair[1].x, pair[1].y))
}

/// A predicate that copies every complete assignment it sees, then
/// succeeds. Followed by `FailPredicate`, it collects a whole search space
/// in a single engine run.
#[derive(Debug, Default)]
pub struct CollectPredicate {
    pub seen: std::rc::Rc<std::cell::RefCell<Vec<Vec<i32>>>>,
}

impl Predicate for CollectPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        match ctx.store.assignment() {
            Some(values) => {
                self.seen.borrow_mut().push(values);
                PredicateResult::Success
            }
            None => PredicateResult::Failure,
        }
    }

    fn name(&self) -> &str {
        "Collect"
    }
}

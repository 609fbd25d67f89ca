//! Breadth-first search on the 4-connected grid
//!
//! A same-shaped grid of parent coordinates is both the visited set and the
//! back-pointers used to rebuild the path.

use std::collections::VecDeque;

use super::{Grid, Position};

/// Shortest 4-connected path from `from` to `to`, both ends included.
///
/// `passable` decides which cells may be entered; `from` is always allowed.
/// Returns `None` when `to` cannot be reached or either end is out of bounds.
pub fn shortest_path<F>(
    grid: &Grid,
    from: Position,
    to: Position,
    passable: F,
) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    let parents = search(grid, from, Some(to), &passable)?;
    let idx = |p: Position| (p.y * grid.width + p.x) as usize;
    parents[idx(to)]?;

    let mut path = vec![to];
    let mut current = to;
    while current != from {
        current = parents[idx(current)]?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Every cell reachable from `from` through `passable` cells
pub fn flood_fill<F>(grid: &Grid, from: Position, passable: F) -> Vec<Position>
where
    F: Fn(Position) -> bool,
{
    let Some(parents) = search(grid, from, None, &passable) else {
        return Vec::new();
    };
    parents
        .iter()
        .enumerate()
        .filter(|(_, parent)| parent.is_some())
        .map(|(i, _)| Position::new(i as i32 % grid.width, i as i32 / grid.width))
        .collect()
}

/// Walkable-cell reachability, the usual connectivity check
pub fn is_reachable(grid: &Grid, from: Position, to: Position) -> bool {
    shortest_path(grid, from, to, |p| grid.is_walkable(p.x, p.y)).is_some()
}

fn search<F>(
    grid: &Grid,
    from: Position,
    goal: Option<Position>,
    passable: &F,
) -> Option<Vec<Option<Position>>>
where
    F: Fn(Position) -> bool,
{
    if !grid.in_bounds(from.x, from.y) {
        return None;
    }
    if let Some(goal) = goal {
        if !grid.in_bounds(goal.x, goal.y) {
            return None;
        }
    }

    let idx = |p: Position| (p.y * grid.width + p.x) as usize;
    let mut parents: Vec<Option<Position>> = vec![None; (grid.width * grid.height) as usize];
    parents[idx(from)] = Some(from);

    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if Some(current) == goal {
            break;
        }
        for next in current.cardinal_neighbors() {
            if !grid.in_bounds(next.x, next.y) || parents[idx(next)].is_some() {
                continue;
            }
            if !passable(next) {
                continue;
            }
            parents[idx(next)] = Some(current);
            queue.push_back(next);
        }
    }

    Some(parents)
}

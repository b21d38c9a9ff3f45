//! ECO Maze progress.
//!
//! A user's level moves a marker along a fixed path through the maze. Level 1
//! sits at the entrance; every completed loop (purchase, listing, verified
//! action) raises the level by one until the exit at step [`MAX_STEPS`].

use serde::{Deserialize, Serialize};

/// Number of steps from the entrance to the exit.
pub const MAX_STEPS: usize = 20;

/// A point on the maze grid (0..=100 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

const fn p(x: u8, y: u8) -> Point {
    Point { x, y }
}

/// Path through the maze, one point per step plus the entrance.
pub const PATH: [Point; MAX_STEPS + 1] = [
    p(5, 8),
    p(15, 15),
    p(25, 15),
    p(25, 25),
    p(15, 25),
    p(15, 45),
    p(35, 45),
    p(35, 35),
    p(55, 35),
    p(55, 15),
    p(75, 15),
    p(75, 45),
    p(55, 45),
    p(55, 65),
    p(25, 65),
    p(25, 85),
    p(45, 85),
    p(45, 75),
    p(75, 75),
    p(75, 85),
    p(95, 85),
];

/// Step reached at a given level: `level - 1`, clamped to `0..=MAX_STEPS`.
#[must_use]
pub fn current_step(level: i32) -> usize {
    usize::try_from(level.saturating_sub(1))
        .unwrap_or(0)
        .min(MAX_STEPS)
}

/// Whether the exit has been reached.
#[must_use]
pub const fn is_finished(step: usize) -> bool {
    step >= MAX_STEPS
}

/// SVG path data tracing the route from the entrance to `step`.
#[must_use]
pub fn yarn_path(step: usize) -> String {
    let end = step.min(MAX_STEPS);
    PATH.iter()
        .take(end + 1)
        .enumerate()
        .map(|(i, point)| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{command} {} {}", point.x, point.y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Snapshot of a user's position in the maze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeProgress {
    pub current_step: usize,
    pub max_steps: usize,
    pub finished: bool,
    pub path: String,
    pub position: Point,
}

impl MazeProgress {
    /// Progress for a signed-in user's level; signed-out visitors use
    /// `None` and stay at the entrance.
    #[must_use]
    pub fn from_level(level: Option<i32>) -> Self {
        let step = level.map_or(0, current_step);
        Self {
            current_step: step,
            max_steps: MAX_STEPS,
            finished: is_finished(step),
            path: yarn_path(step),
            position: PATH.get(step).copied().unwrap_or(PATH[MAX_STEPS]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_step() {
        assert_eq!(current_step(1), 0);
        assert_eq!(current_step(5), 4);
        assert_eq!(current_step(21), 20);
        assert_eq!(current_step(30), 20);
        assert_eq!(current_step(0), 0);
        assert_eq!(current_step(-3), 0);
        assert_eq!(current_step(i32::MIN), 0);
    }

    #[test]
    fn test_finished() {
        assert!(!is_finished(current_step(20)));
        assert!(is_finished(current_step(30)));
    }

    #[test]
    fn test_yarn_path() {
        assert_eq!(yarn_path(0), "M 5 8");
        assert_eq!(yarn_path(2), "M 5 8 L 15 15 L 25 15");
        assert!(yarn_path(99).ends_with("L 95 85"));
        assert_eq!(yarn_path(MAX_STEPS).matches('L').count(), MAX_STEPS);
    }

    #[test]
    fn test_progress_snapshot() {
        let progress = MazeProgress::from_level(Some(5));
        assert_eq!(progress.current_step, 4);
        assert_eq!(progress.position, Point { x: 25, y: 25 });
        assert!(!progress.finished);

        let guest = MazeProgress::from_level(None);
        assert_eq!(guest.current_step, 0);
        assert_eq!(guest.path, "M 5 8");

        let done = MazeProgress::from_level(Some(30));
        assert!(done.finished);
        assert_eq!(done.position, Point { x: 95, y: 85 });
    }
}

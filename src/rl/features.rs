//! Hand-engineered features for approximate Q-learning
//!
//! Every feature describes the board as it would look after the action is
//! taken: distance from the new head to the food, and how far the new head
//! can see along three rays (ahead, left, right of the new heading) before
//! hitting an obstacle or leaving the board.

use std::collections::BTreeMap;

use crate::game::{Action, Direction, OccupancyGrid, Position};
use crate::rl::environment::{BoardSensors, Environment};

pub const BIAS: &str = "bias";
pub const FOOD_DISTANCE: &str = "food_distance";
pub const OBSTACLE_AHEAD: &str = "obstacle_ahead";
pub const OBSTACLE_LEFT: &str = "obstacle_left";
pub const OBSTACLE_RIGHT: &str = "obstacle_right";

/// Every assembled feature is divided by this
pub const FEATURE_SCALE: f64 = 10.0;

/// Sparse named feature values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Value of a feature; features that did not fire read as 0.0
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn divide_all(&mut self, divisor: f64) {
        for value in self.values.values_mut() {
            *value /= divisor;
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut features = FeatureVector::new();
        for (name, value) in iter {
            features.insert(name, value);
        }
        features
    }
}

/// Maps a (state, action) pair to features
pub trait FeatureExtractor<E: Environment> {
    fn extract(&self, env: &E, state: &E::State, action: E::Action) -> FeatureVector;
}

/// Distances to the nearest obstacle along three rays, normalized by the
/// board extent each ray sweeps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSensors {
    pub ahead: f64,
    pub left: f64,
    pub right: f64,
}

impl ObstacleSensors {
    pub const ZERO: ObstacleSensors = ObstacleSensors {
        ahead: 0.0,
        left: 0.0,
        right: 0.0,
    };
}

/// Read the three obstacle sensors from `head` facing `heading`
///
/// A head outside the grid reads all zeros; the grid is never indexed in
/// that case.
pub fn obstacle_sensors(grid: &OccupancyGrid, head: Position, heading: Direction) -> ObstacleSensors {
    if !grid.contains(head) {
        return ObstacleSensors::ZERO;
    }

    ObstacleSensors {
        ahead: ray_distance(grid, head, heading),
        left: ray_distance(grid, head, heading.turned_left()),
        right: ray_distance(grid, head, heading.turned_right()),
    }
}

/// Steps from `from` to the first occupied cell (or the first cell off the
/// board), divided by the board dimension along `direction`
fn ray_distance(grid: &OccupancyGrid, from: Position, direction: Direction) -> f64 {
    let span = match direction {
        Direction::Left | Direction::Right => grid.width(),
        Direction::Up | Direction::Down => grid.height(),
    };

    let mut pos = from;
    let mut steps = 0usize;
    loop {
        pos = pos.moved_in_direction(direction);
        steps += 1;
        if !grid.contains(pos) || grid.is_occupied(pos) {
            break;
        }
    }

    steps as f64 / span as f64
}

/// Feature extractor for the snake board
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeFeatures;

impl<E> FeatureExtractor<E> for SnakeFeatures
where
    E: Environment<Action = Action>,
    E::State: BoardSensors,
{
    fn extract(&self, env: &E, state: &E::State, action: Action) -> FeatureVector {
        let next_state = env.successor(state, action);
        let heading = next_state.heading();
        let next_head = state.head().moved_in_direction(heading);

        let area = (state.width() * state.height()) as f64;
        let sensors = obstacle_sensors(&next_state.occupancy(), next_head, heading);

        let mut features: FeatureVector = [
            (BIAS, 1.0),
            (FOOD_DISTANCE, next_head.distance(state.food()) / area),
            (OBSTACLE_AHEAD, sensors.ahead),
            (OBSTACLE_LEFT, sensors.left),
            (OBSTACLE_RIGHT, sensors.right),
        ]
        .into_iter()
        .collect();

        features.divide_all(FEATURE_SCALE);
        features
    }
}

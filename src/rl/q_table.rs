//! Q-table for exact tabular Q-learning

use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use anyhow::Result;

use crate::rl::environment::Environment;
use crate::rl::model::ValueModel;
use crate::rl::persistence::{load_checkpoint, save_checkpoint, ModelKind};

/// Default checkpoint file for tabular agents
pub const QTABLE_CHECKPOINT: &str = "qvalues.json";

/// Q-table mapping (state key, action) pairs to Q-values
///
/// Keys are exact: two boards share an entry only if their keys compare
/// equal. Entries are never pruned.
#[derive(Debug, Clone)]
pub struct QTable<K, A> {
    q_values: HashMap<(K, A), f64>,
}

impl<K, A> Default for QTable<K, A> {
    fn default() -> Self {
        Self {
            q_values: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, A: Copy + Eq + Hash> QTable<K, A> {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, key: &K, action: A) -> f64 {
        self.q_values
            .get(&(key.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, key: K, action: A, value: f64) {
        self.q_values.insert((key, action), value);
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, A, f64)> {
        self.q_values
            .iter()
            .map(|((key, action), &value)| (key, *action, value))
    }

    /// Replace every entry with `entries`
    pub fn replace(&mut self, entries: impl IntoIterator<Item = (K, A, f64)>) {
        self.q_values = entries
            .into_iter()
            .map(|(key, action, value)| ((key, action), value))
            .collect();
    }
}

impl<E: Environment> ValueModel<E> for QTable<E::Key, E::Action> {
    fn q_value(&self, env: &E, state: &E::State, action: E::Action) -> f64 {
        self.get(&env.state_key(state), action)
    }

    /// Q(s,a) ← Q(s,a) + α[target − Q(s,a)]
    fn update(&mut self, env: &E, state: &E::State, action: E::Action, target: f64, alpha: f64) {
        let key = env.state_key(state);
        let current_q = self.get(&key, action);
        self.set(key, action, current_q + alpha * (target - current_q));
    }

    fn save(&self, path: &Path) -> Result<()> {
        let entries: Vec<(&E::Key, E::Action, f64)> = self.iter().collect();
        log::info!("Number of Q-states explored: {}", entries.len());
        save_checkpoint(path, ModelKind::QTable, entries.len(), &entries)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let checkpoint = load_checkpoint::<Vec<(E::Key, E::Action, f64)>>(path, ModelKind::QTable)?;
        self.replace(checkpoint.values);
        Ok(())
    }

    fn default_checkpoint(&self) -> &'static str {
        QTABLE_CHECKPOINT
    }

    fn name(&self) -> &'static str {
        "QLearningAgent"
    }

    fn len(&self) -> usize {
        self.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::testing::{Move, TableEnv};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tempfile::TempDir;

    #[test]
    fn test_qtable_initialization() {
        let qtable: QTable<u32, Move> = QTable::new();
        assert_eq!(qtable.get(&0, Move::A), 0.0);
        assert_eq!(qtable.size(), 0);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        qtable.set(3u32, Move::B, 1.5);
        assert_eq!(qtable.get(&3, Move::B), 1.5);
        assert_eq!(qtable.get(&3, Move::A), 0.0);
    }

    #[test]
    fn test_td_update_from_zero() {
        let env = TableEnv::default();
        let mut qtable: QTable<u32, Move> = QTable::new();

        // target = 10 + 0.9 * 0
        ValueModel::<TableEnv>::update(&mut qtable, &env, &0, Move::A, 10.0 + 0.9 * 0.0, 0.5);

        assert_eq!(qtable.get(&0, Move::A), 5.0);
    }

    #[test]
    fn test_td_update_moves_toward_target() {
        let env = TableEnv::default();
        let mut qtable = QTable::new();
        qtable.set(1u32, Move::B, 4.0);

        ValueModel::<TableEnv>::update(&mut qtable, &env, &1, Move::B, 2.0, 0.25);

        // 4 + 0.25 * (2 - 4)
        assert_eq!(qtable.get(&1, Move::B), 3.5);
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(QTABLE_CHECKPOINT);

        let mut qtable = QTable::new();
        qtable.set(0u32, Move::A, 1.25);
        qtable.set(0u32, Move::B, -3.5);
        qtable.set(7u32, Move::C, 0.1);
        ValueModel::<TableEnv>::save(&qtable, &path).unwrap();

        let mut restored: QTable<u32, Move> = QTable::new();
        restored.set(99, Move::A, 8.0); // discarded by load
        ValueModel::<TableEnv>::load(&mut restored, &path).unwrap();

        assert_eq!(restored.size(), qtable.size());
        for (key, action, value) in qtable.iter() {
            assert_eq!(restored.get(key, action), value);
        }
        assert_eq!(restored.get(&99, Move::A), 0.0);
    }

    #[test]
    fn test_checkpoint_reload_is_bit_exact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(QTABLE_CHECKPOINT);
        let mut rng = StdRng::seed_from_u64(31);

        let mut qtable: QTable<u32, Move> = QTable::new();
        for key in 0..2_000u32 {
            for action in [Move::A, Move::B, Move::C] {
                let magnitude = 10f64.powi(rng.gen_range(-15..15));
                let sign = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
                qtable.set(key, action, sign * rng.gen::<f64>() * magnitude);
            }
        }
        ValueModel::<TableEnv>::save(&qtable, &path).unwrap();

        let mut restored: QTable<u32, Move> = QTable::new();
        ValueModel::<TableEnv>::load(&mut restored, &path).unwrap();

        assert_eq!(restored.size(), qtable.size());
        for (key, action, value) in qtable.iter() {
            assert_eq!(
                restored.get(key, action).to_bits(),
                value.to_bits(),
                "q({}, {:?})",
                key,
                action
            );
        }
    }

    #[test]
    fn test_load_missing_checkpoint_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut qtable: QTable<u32, Move> = QTable::new();
        qtable.set(1, Move::A, 2.0);

        let result = ValueModel::<TableEnv>::load(&mut qtable, &temp_dir.path().join("none.json"));

        assert!(result.is_err());
        // A failed load leaves the table as it was
        assert_eq!(qtable.get(&1, Move::A), 2.0);
    }
}

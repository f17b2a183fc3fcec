//! Linear Q-function over extracted features

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::rl::environment::Environment;
use crate::rl::features::FeatureExtractor;
use crate::rl::model::ValueModel;
use crate::rl::persistence::{load_checkpoint, save_checkpoint, ModelKind};

/// Default checkpoint file for approximate agents
pub const WEIGHTS_CHECKPOINT: &str = "approxq_weights.json";

/// Q(s,a) = Σ_f w[f] · feature[f]
///
/// One weight per feature name, shared by every state and action, so an
/// update generalizes to unseen states that fire the same features.
#[derive(Debug, Clone, Default)]
pub struct LinearModel<X> {
    extractor: X,
    weights: BTreeMap<String, f64>,
}

impl<X> LinearModel<X> {
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            weights: BTreeMap::new(),
        }
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    /// Weight of a feature; unseen features read as 0.0
    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    pub fn set_weight(&mut self, feature: &str, value: f64) {
        self.weights.insert(feature.to_string(), value);
    }

    pub fn extractor(&self) -> &X {
        &self.extractor
    }
}

impl<E, X> ValueModel<E> for LinearModel<X>
where
    E: Environment,
    X: FeatureExtractor<E>,
{
    fn q_value(&self, env: &E, state: &E::State, action: E::Action) -> f64 {
        self.extractor
            .extract(env, state, action)
            .iter()
            .map(|(feature, value)| self.weight(feature) * value)
            .sum()
    }

    /// Semi-gradient step: w[f] ← w[f] + α · (target − Q(s,a)) · feature[f]
    fn update(&mut self, env: &E, state: &E::State, action: E::Action, target: f64, alpha: f64) {
        let features = self.extractor.extract(env, state, action);
        let current_q: f64 = features
            .iter()
            .map(|(feature, value)| self.weight(feature) * value)
            .sum();
        let difference = target - current_q;

        for (feature, value) in features.iter() {
            let weight = self.weights.entry(feature.to_string()).or_insert(0.0);
            *weight += alpha * difference * value;
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        log::info!("Saving weights: {:?}", self.weights);
        save_checkpoint(path, ModelKind::LinearWeights, self.weights.len(), &self.weights)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let checkpoint =
            load_checkpoint::<BTreeMap<String, f64>>(path, ModelKind::LinearWeights)?;
        self.weights = checkpoint.values;
        Ok(())
    }

    fn default_checkpoint(&self) -> &'static str {
        WEIGHTS_CHECKPOINT
    }

    fn name(&self) -> &'static str {
        "ApproxQAgent"
    }

    fn len(&self) -> usize {
        self.weights.len()
    }
}

//! Greedy policy and state value over a Q-function

use rand::seq::SliceRandom;
use rand::Rng;

use crate::rl::environment::Environment;
use crate::rl::model::ValueModel;

/// max_a Q(state, a) over legal actions; 0.0 for terminal states
pub fn state_value<E, M>(model: &M, env: &E, state: &E::State) -> f64
where
    E: Environment,
    M: ValueModel<E> + ?Sized,
{
    let legal_actions = env.legal_actions(state);
    if legal_actions.is_empty() {
        return 0.0;
    }

    legal_actions
        .into_iter()
        .map(|action| model.q_value(env, state, action))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Action with the highest Q-value, ties broken uniformly at random
///
/// Returns `None` for terminal states.
pub fn greedy_action<E, M, R>(model: &M, env: &E, state: &E::State, rng: &mut R) -> Option<E::Action>
where
    E: Environment,
    M: ValueModel<E> + ?Sized,
    R: Rng + ?Sized,
{
    let mut max_q = f64::NEG_INFINITY;
    let mut best_actions = Vec::new();

    for action in env.legal_actions(state) {
        let q = model.q_value(env, state, action);
        if q > max_q {
            max_q = q;
            best_actions.clear();
            best_actions.push(action);
        } else if q == max_q {
            best_actions.push(action);
        }
    }

    best_actions.choose(rng).copied()
}

use crate::encode;
use crate::encode::STATE_LEN;
use crate::engine::Action;
use crate::engine::Engine;
use crate::engine::Phase;
use crate::engine::N_ACTIONS;
use crate::net::BUCKET_ODDS;
use crate::net::RAISE_BUCKETS;
use crate::Chips;
use crate::GymError;
use crate::Utility;

/// The conventional reset/step/legal-actions facade over the Engine.
/// Rewards are sparse: zero on every interior step, the acting seat's
/// net chip delta once the hand completes. Risk transforms are applied
/// by the trainer on top of these raw chips, never here.
pub struct HoldemEnv {
    engine: Engine,
}

#[derive(Debug, Clone, Copy)]
pub struct StepInfo {
    pub phase: Phase,
    pub pot: Chips,
}

pub struct Step {
    pub obs: [f32; STATE_LEN],
    pub reward: Utility,
    pub done: bool,
    pub info: StepInfo,
}

impl HoldemEnv {
    pub fn new(stacks: &[Chips], seed: u64) -> Self {
        Self {
            engine: Engine::new(stacks, seed),
        }
    }

    /// start a new hand and observe it from the first actor's seat
    pub fn reset(&mut self) -> [f32; STATE_LEN] {
        self.engine.reset();
        self.observe(self.engine.actor())
    }

    /// apply the current actor's action
    pub fn step(&mut self, action: Action) -> Result<Step, GymError> {
        let seat = self.engine.actor();
        self.engine.step(action)?;
        let done = self.engine.is_done();
        let vantage = if done { seat } else { self.engine.actor() };
        Ok(Step {
            obs: self.observe(vantage),
            reward: if done {
                self.engine.payoffs()[seat] as Utility
            } else {
                0.0
            },
            done,
            info: StepInfo {
                phase: self.engine.phase(),
                pot: self.engine.pot(),
            },
        })
    }

    pub fn n(&self) -> usize {
        self.engine.n()
    }
    pub fn current(&self) -> usize {
        self.engine.actor()
    }
    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }
    pub fn observe(&self, seat: usize) -> [f32; STATE_LEN] {
        encode::encode(&self.engine, seat)
    }
    pub fn legal_actions(&self, seat: usize) -> Vec<Action> {
        self.engine.legal_actions(seat)
    }
    /// raw chip deltas per seat, once done
    pub fn payoffs(&self) -> Vec<i64> {
        self.engine.payoffs()
    }
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// legality of the four action types for the seat to act
    pub fn kind_mask(&self) -> [bool; N_ACTIONS] {
        self.engine.kind_mask()
    }

    /// which raise buckets the actor's stack can actually size; all
    /// false whenever raising itself is illegal
    pub fn bucket_mask(&self) -> [bool; RAISE_BUCKETS] {
        let mut mask = [false; RAISE_BUCKETS];
        if !self.engine.kind_mask()[3] {
            return mask;
        }
        let all_in = self.engine.all_in_to(self.engine.actor());
        for (bucket, slot) in mask.iter_mut().enumerate().take(RAISE_BUCKETS - 1) {
            *slot = self.raise_target(bucket) < all_in;
        }
        mask[RAISE_BUCKETS - 1] = true;
        mask
    }

    /// realize a sampled (action kind, raise bucket) as an engine
    /// action, sizing raises off the pot and snapping into the legal
    /// range the way the betting rules demand
    pub fn to_action(&self, kind: usize, bucket: Option<usize>) -> Action {
        match kind {
            0 => Action::Fold,
            1 => Action::Check,
            2 => Action::Call,
            _ => Action::Raise(self.raise_target(bucket.expect("raise without a bucket"))),
        }
    }

    /// the degenerate-distribution default: fold, or check when
    /// nothing is owed and folding is therefore not on the menu
    pub fn fold_or_check(&self) -> Action {
        if self.engine.is_allowed(&Action::Fold) {
            Action::Fold
        } else {
            Action::Check
        }
    }

    fn raise_target(&self, bucket: usize) -> Chips {
        let actor = self.engine.actor();
        let all_in = self.engine.all_in_to(actor);
        if bucket >= RAISE_BUCKETS - 1 {
            return all_in;
        }
        let (num, den) = BUCKET_ODDS[bucket];
        let pot = self.engine.pot() + self.engine.to_call(actor);
        let least = self.engine.min_raise_to() - self.engine.bet();
        let raise_by = (pot * num / den).max(least);
        (self.engine.bet() + raise_by).min(all_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewards_are_terminal_only() {
        let mut env = HoldemEnv::new(&[100, 100], 21);
        env.reset();
        let step = env.step(Action::Call).unwrap();
        assert!(!step.done);
        assert_eq!(step.reward, 0.0);
        let mut last = env.step(Action::Check).unwrap();
        while !last.done {
            last = env.step(Action::Check).unwrap();
        }
        let payoffs = env.payoffs();
        assert_eq!(payoffs.iter().sum::<i64>(), 0);
    }

    #[test]
    fn masked_pairs_realize_to_legal_actions() {
        let mut env = HoldemEnv::new(&[100, 100, 100], 22);
        for _ in 0..20 {
            env.reset();
            while !env.is_done() {
                let kinds = env.kind_mask();
                let buckets = env.bucket_mask();
                for kind in 0..N_ACTIONS {
                    if !kinds[kind] {
                        continue;
                    }
                    if kind < 3 {
                        let action = env.to_action(kind, None);
                        assert!(env.engine().is_allowed(&action), "{} illegal", action);
                    } else {
                        for (bucket, legal) in buckets.iter().enumerate() {
                            if *legal {
                                let action = env.to_action(kind, Some(bucket));
                                assert!(env.engine().is_allowed(&action), "{} illegal", action);
                            }
                        }
                    }
                }
                // walk the hand forward cheaply
                let action = env.fold_or_check();
                env.step(action).unwrap();
            }
        }
    }

    #[test]
    fn all_in_bucket_is_available_whenever_raising_is() {
        let mut env = HoldemEnv::new(&[100, 100], 23);
        env.reset();
        if env.kind_mask()[3] {
            assert!(env.bucket_mask()[RAISE_BUCKETS - 1]);
        }
    }

    #[test]
    fn fold_or_check_is_always_legal() {
        let mut env = HoldemEnv::new(&[100, 100, 100], 24);
        for _ in 0..10 {
            env.reset();
            while !env.is_done() {
                let action = env.fold_or_check();
                assert!(env.engine().is_allowed(&action));
                env.step(action).unwrap();
            }
        }
    }
}

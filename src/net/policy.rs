use super::mask;
use crate::encode::STATE_LEN;
use crate::engine::N_ACTIONS;
use crate::GymError;
use crate::Utility;
use candle_core::Device;
use candle_core::Tensor;
use candle_nn::linear;
use candle_nn::Linear;
use candle_nn::Module;
use candle_nn::VarBuilder;
use rand::Rng;

/// raise sizes the policy can pick from: pot fractions, then all-in
pub const RAISE_BUCKETS: usize = 5;
pub const BUCKET_ODDS: [(u32, u32); RAISE_BUCKETS - 1] = [
    (1, 2), // 0.50 pot
    (3, 4), // 0.75 pot
    (1, 1), // 1.00 pot
    (3, 2), // 1.50 pot
];

/// position of the raise logit in the action head
const RAISE_KIND: usize = 3;
/// position of the fold logit, the degenerate-input default
const FOLD_KIND: usize = 0;

/// Shared two-layer trunk feeding three heads: action-type logits,
/// raise-size logits, and a scalar state value.
pub struct PolicyValueNet {
    l1: Linear,
    l2: Linear,
    action_head: Linear,
    raise_head: Linear,
    value_head: Linear,
}

/// One sampled decision, with the quantities the trainer records.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub kind: usize,
    pub bucket: Option<usize>,
    pub logp: Utility,
    pub value: Utility,
    /// the masked distribution degenerated and we defaulted to fold;
    /// nothing here should enter a gradient
    pub fallback: bool,
}

impl PolicyValueNet {
    pub fn new(hidden: usize, vb: &VarBuilder) -> Result<Self, GymError> {
        Ok(Self {
            l1: linear(STATE_LEN, hidden, vb.pp("l1"))?,
            l2: linear(hidden, hidden, vb.pp("l2"))?,
            action_head: linear(hidden, N_ACTIONS, vb.pp("action_head"))?,
            raise_head: linear(hidden, RAISE_BUCKETS, vb.pp("raise_head"))?,
            value_head: linear(hidden, 1, vb.pp("value_head"))?,
        })
    }

    /// returns (action logits, raise logits, value), batched
    pub fn forward(&self, x: &Tensor) -> Result<(Tensor, Tensor, Tensor), GymError> {
        let h = self.l1.forward(x)?.relu()?;
        let h = self.l2.forward(&h)?.relu()?;
        Ok((
            self.action_head.forward(&h)?,
            self.raise_head.forward(&h)?,
            self.value_head.forward(&h)?,
        ))
    }

    /// Sample one decision for an encoded state under the legality
    /// masks. When the masked distribution degenerates -- no legal
    /// action (as when queried about an inactive seat), or non-finite
    /// mass -- this deterministically folds and warns instead of
    /// erroring, so a long training run survives the edge case.
    pub fn decide<R: Rng>(
        &self,
        state: &[f32; STATE_LEN],
        kinds: &[bool; N_ACTIONS],
        buckets: &[bool; RAISE_BUCKETS],
        device: &Device,
        rng: &mut R,
    ) -> Result<Decision, GymError> {
        let x = Tensor::from_vec(state.to_vec(), (1, STATE_LEN), device)?;
        let (action_logits, raise_logits, value) = self.forward(&x)?;
        let action_logits = action_logits.flatten_all()?.to_vec1::<f32>()?;
        let raise_logits = raise_logits.flatten_all()?.to_vec1::<f32>()?;
        let value = value.flatten_all()?.to_vec1::<f32>()?[0];
        let Some(dist) = mask::masked_distribution(&action_logits, kinds) else {
            log::warn!("degenerate action distribution, defaulting to fold");
            return Ok(Self::fold_default(value));
        };
        let kind = mask::sample(&dist, rng);
        let mut logp = dist[kind].ln();
        let mut bucket = None;
        if kind == RAISE_KIND {
            let Some(sizes) = mask::masked_distribution(&raise_logits, buckets) else {
                log::warn!("degenerate raise distribution, defaulting to fold");
                return Ok(Self::fold_default(value));
            };
            let pick = mask::sample(&sizes, rng);
            logp += sizes[pick].ln();
            bucket = Some(pick);
        }
        Ok(Decision {
            kind,
            bucket,
            logp,
            value,
            fallback: false,
        })
    }

    fn fold_default(value: Utility) -> Decision {
        Decision {
            kind: FOLD_KIND,
            bucket: None,
            logp: 0.0,
            value,
            fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_net() -> PolicyValueNet {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        PolicyValueNet::new(16, &vb).unwrap()
    }

    #[test]
    fn forward_shapes() {
        let net = small_net();
        let x = Tensor::zeros((3, STATE_LEN), DType::F32, &Device::Cpu).unwrap();
        let (actions, raises, values) = net.forward(&x).unwrap();
        assert_eq!(actions.dims(), &[3, N_ACTIONS]);
        assert_eq!(raises.dims(), &[3, RAISE_BUCKETS]);
        assert_eq!(values.dims(), &[3, 1]);
    }

    #[test]
    fn decide_respects_the_mask() {
        let net = small_net();
        let mut rng = StdRng::seed_from_u64(3);
        let state = [0f32; STATE_LEN];
        let kinds = [true, false, true, false];
        let buckets = [true; RAISE_BUCKETS];
        for _ in 0..50 {
            let decision = net
                .decide(&state, &kinds, &buckets, &Device::Cpu, &mut rng)
                .unwrap();
            assert!(decision.kind == 0 || decision.kind == 2);
            assert!(decision.bucket.is_none());
            assert!(!decision.fallback);
            assert!(decision.logp <= 0.0);
        }
    }

    #[test]
    fn raises_carry_a_legal_bucket() {
        let net = small_net();
        let mut rng = StdRng::seed_from_u64(5);
        let state = [0f32; STATE_LEN];
        let kinds = [false, false, false, true];
        let buckets = [false, false, true, false, true];
        for _ in 0..50 {
            let decision = net
                .decide(&state, &kinds, &buckets, &Device::Cpu, &mut rng)
                .unwrap();
            assert_eq!(decision.kind, RAISE_KIND);
            let bucket = decision.bucket.unwrap();
            assert!(bucket == 2 || bucket == RAISE_BUCKETS - 1);
        }
    }

    #[test]
    fn all_false_mask_folds_without_panicking() {
        let net = small_net();
        let mut rng = StdRng::seed_from_u64(7);
        let state = [0f32; STATE_LEN];
        let decision = net
            .decide(
                &state,
                &[false; N_ACTIONS],
                &[false; RAISE_BUCKETS],
                &Device::Cpu,
                &mut rng,
            )
            .unwrap();
        assert_eq!(decision.kind, FOLD_KIND);
        assert!(decision.fallback);
    }

    #[test]
    fn raise_with_no_sizeable_bucket_folds() {
        let net = small_net();
        let mut rng = StdRng::seed_from_u64(11);
        let state = [0f32; STATE_LEN];
        let kinds = [false, false, false, true];
        let decision = net
            .decide(&state, &kinds, &[false; RAISE_BUCKETS], &Device::Cpu, &mut rng)
            .unwrap();
        assert_eq!(decision.kind, FOLD_KIND);
        assert!(decision.fallback);
    }
}

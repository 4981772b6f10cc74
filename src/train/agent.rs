use super::trajectory::Trajectory;
use crate::encode::STATE_LEN;
use crate::engine::N_ACTIONS;
use crate::env::RiskProfile;
use crate::net::PolicyValueNet;
use crate::net::RAISE_BUCKETS;
use crate::GymError;
use crate::Utility;
use candle_core::backprop::GradStore;
use candle_core::DType;
use candle_core::Device;
use candle_core::Tensor;
use candle_core::Var;
use candle_core::D;
use candle_nn::ops::log_softmax;
use candle_nn::AdamW;
use candle_nn::Optimizer;
use candle_nn::VarBuilder;
use candle_nn::VarMap;
use std::path::Path;
use std::path::PathBuf;

/// additive logit offset that silences an illegal slot under softmax
const MASK_PENALTY: f32 = -1e9;

/// One learning agent: an identity, a risk posture, and a network with
/// its own parameters and optimizer. Updates touch this agent's
/// parameters only; nothing is shared across the roster.
pub struct AgentProfile {
    id: usize,
    risk: RiskProfile,
    varmap: VarMap,
    net: PolicyValueNet,
    optimizer: AdamW,
}

impl AgentProfile {
    pub fn new(
        id: usize,
        risk: RiskProfile,
        hidden: usize,
        learning_rate: f64,
        device: &Device,
    ) -> Result<Self, GymError> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let net = PolicyValueNet::new(hidden, &vb)?;
        let optimizer = AdamW::new_lr(varmap.all_vars(), learning_rate)?;
        Ok(Self {
            id,
            risk,
            varmap,
            net,
            optimizer,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn risk(&self) -> RiskProfile {
        self.risk
    }
    pub fn net(&self) -> &PolicyValueNet {
        &self.net
    }

    /// Monte-Carlo REINFORCE over one hand: replay the recorded states
    /// through the network, rebuild the masked log-probabilities of the
    /// sampled actions (and raise buckets), and descend
    /// -log pi(a|s) * G with the whole-hand return G applied uniformly
    /// to every step. No baseline is subtracted; the value head is
    /// computed but deliberately left out of the loss.
    pub fn update(
        &mut self,
        trajectory: &Trajectory,
        shaped_return: Utility,
        clip: f64,
        device: &Device,
    ) -> Result<Utility, GymError> {
        if trajectory.is_empty() {
            return Ok(0.0);
        }
        let t = trajectory.len();
        let mut states = Vec::with_capacity(t * STATE_LEN);
        let mut kinds = Vec::with_capacity(t);
        let mut kind_penalty = Vec::with_capacity(t * N_ACTIONS);
        let mut rows = Vec::new();
        let mut buckets = Vec::new();
        let mut bucket_penalty = Vec::new();
        for (i, sample) in trajectory.samples.iter().enumerate() {
            states.extend_from_slice(&sample.state);
            kinds.push(sample.kind as u32);
            kind_penalty.extend(sample.kind_mask.iter().map(Self::penalty));
            if let Some(bucket) = sample.bucket {
                rows.push(i as u32);
                buckets.push(bucket as u32);
                bucket_penalty.extend(sample.bucket_mask.iter().map(Self::penalty));
            }
        }

        let x = Tensor::from_vec(states, (t, STATE_LEN), device)?;
        let (action_logits, raise_logits, _values) = self.net.forward(&x)?;
        let penalty = Tensor::from_vec(kind_penalty, (t, N_ACTIONS), device)?;
        let logp = log_softmax(&action_logits.add(&penalty)?, D::Minus1)?;
        let idx = Tensor::from_vec(kinds, (t, 1), device)?;
        let mut chosen = logp.gather(&idx, 1)?.sum_all()?;
        if !rows.is_empty() {
            let n = rows.len();
            let rows = Tensor::from_vec(rows, n, device)?;
            let rlogits = raise_logits.index_select(&rows, 0)?;
            let rpenalty = Tensor::from_vec(bucket_penalty, (n, RAISE_BUCKETS), device)?;
            let rlogp = log_softmax(&rlogits.add(&rpenalty)?, D::Minus1)?;
            let ridx = Tensor::from_vec(buckets, (n, 1), device)?;
            chosen = chosen.add(&rlogp.gather(&ridx, 1)?.sum_all()?)?;
        }

        let loss = (chosen * (-f64::from(shaped_return) / t as f64))?;
        let mut grads = loss.backward()?;
        clip_gradients(&mut grads, &self.varmap.all_vars(), clip)?;
        self.optimizer.step(&grads)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// checkpoint file name, keyed by identity and risk posture
    pub fn file_name(&self) -> String {
        format!("poker_agent_{}_{}.safetensors", self.id, self.risk)
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf, GymError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        self.varmap.save(&path)?;
        log::debug!("saved agent {} to {}", self.id, path.display());
        Ok(path)
    }

    /// restore parameters from a checkpoint written by [save](Self::save)
    pub fn load(&mut self, dir: &Path) -> Result<(), GymError> {
        let path = dir.join(self.file_name());
        self.varmap.load(&path)?;
        log::debug!("loaded agent {} from {}", self.id, path.display());
        Ok(())
    }

    fn penalty(legal: &bool) -> f32 {
        if *legal {
            0.0
        } else {
            MASK_PENALTY
        }
    }
}

/// Scale all gradients down together when their global L2 norm exceeds
/// the threshold, so one outsized hand cannot blow up the parameters.
fn clip_gradients(grads: &mut GradStore, vars: &[Var], max_norm: f64) -> Result<(), GymError> {
    let mut total = 0f64;
    for var in vars {
        if let Some(grad) = grads.get(var.as_tensor()) {
            total += f64::from(grad.sqr()?.sum_all()?.to_scalar::<f32>()?);
        }
    }
    let norm = total.sqrt();
    if norm <= max_norm {
        return Ok(());
    }
    let scale = max_norm / norm;
    for var in vars {
        if let Some(grad) = grads.remove(var.as_tensor()) {
            grads.insert(var.as_tensor(), (&grad * scale)?);
        }
    }
    Ok(())
}

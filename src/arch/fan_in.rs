use log::{trace, warn};
use rayon::prelude::*;

use super::{Model, Sequential};
use crate::{InferenceErr, Result, params::ParamCursor, tensor::Tensor};

/// Several independent branches whose outputs are joined by the head.
///
/// Each branch takes one input and they run in parallel, the head's first layer receives the
/// branch outputs in order (usually a `Concatenate`). Parameters are laid out branch by branch
/// and the head's come last.
#[derive(Debug, Clone)]
pub struct FanIn {
    branches: Vec<Sequential>,
    head: Sequential,
}

impl FanIn {
    /// Creates a new `FanIn`.
    ///
    /// # Arguments
    /// * `branches` - The branches, one per input.
    /// * `head` - The model the branch outputs are fed to.
    ///
    /// # Returns
    /// A new `FanIn` instance.
    pub fn new<I>(branches: I, head: Sequential) -> Self
    where
        I: IntoIterator<Item = Sequential>,
    {
        Self {
            branches: branches.into_iter().collect(),
            head,
        }
    }

    pub fn branches(&self) -> &[Sequential] {
        &self.branches
    }

    pub fn head(&self) -> &Sequential {
        &self.head
    }
}

impl Model for FanIn {
    type Input = [Tensor];

    fn size(&self) -> usize {
        self.branches.iter().map(Model::size).sum::<usize>() + self.head.size()
    }

    fn load(&mut self, buf: &[f32]) -> Result<usize> {
        let required = self.size();
        if buf.len() < required {
            return Err(InferenceErr::InsufficientBuffer {
                required,
                available: buf.len(),
            });
        }

        let mut cursor = ParamCursor::new(buf);
        for branch in &mut self.branches {
            branch.load_from(&mut cursor)?;
        }
        self.head.load_from(&mut cursor)?;

        Ok(cursor.offset())
    }

    fn forward(&self, xs: &[Tensor]) -> Result<Tensor> {
        if xs.len() != self.branches.len() {
            warn!("{} inputs for {} branches", xs.len(), self.branches.len());
            return Err(InferenceErr::MisconfiguredLayer {
                layer: "fan_in",
                reason: "input count differs from branch count",
            });
        }

        let outs = self
            .branches
            .par_iter()
            .zip(xs)
            .map(|(branch, x)| branch.forward(x))
            .collect::<Result<Vec<_>>>()?;
        trace!(
            "branch outputs {:?}",
            outs.iter().map(|y| y.shape()).collect::<Vec<_>>()
        );

        self.head.forward_many(&outs)
    }
}

//! Commit policy: when a pending edit is folded into the base image.
//!
//! Folding writes the pipeline output up to and including the committed
//! category's stage into the base buffer, and the baked parameters return
//! to identity. The preview is the same before and after a commit; the next
//! edit starts fresh on top of the committed pixels.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mode::{EditCategory, EditState};
use crate::params::AdjustmentParameters;
use crate::pipeline::Pipeline;
use crate::raster::RasterBuffer;

/// Whether category switches and confirms fold edits into the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Fold the pending edit when the user switches category or confirms.
    #[default]
    OnCategorySwitch,
    /// Never fold: edits of every category stay live on the original base.
    Disabled,
}

/// A pending edit to fold into the base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fold {
    pub category: EditCategory,
    /// Parameters at the moment of the commit, before the category resets.
    pub params: AdjustmentParameters,
}

/// Decides which transitions commit, and performs the fold.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitController {
    policy: CommitPolicy,
}

impl CommitController {
    pub fn new(policy: CommitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    pub fn enabled(&self) -> bool {
        self.policy == CommitPolicy::OnCategorySwitch
    }

    /// Fold required when an edit of `entering` starts while in `state`.
    ///
    /// Only a pending edit of the other category is folded.
    pub fn on_switch(
        &self,
        state: EditState,
        entering: EditCategory,
        params: &AdjustmentParameters,
    ) -> Option<Fold> {
        let leaving = state.category()?;
        if leaving == entering {
            return None;
        }
        self.pending_fold(leaving, params)
    }

    /// Fold required by an explicit confirm while in `state`.
    pub fn on_confirm(&self, state: EditState, params: &AdjustmentParameters) -> Option<Fold> {
        self.pending_fold(state.category()?, params)
    }

    fn pending_fold(&self, category: EditCategory, params: &AdjustmentParameters) -> Option<Fold> {
        (self.enabled() && params.has_pending(category)).then_some(Fold {
            category,
            params: *params,
        })
    }

    /// Compute the new base buffer for `fold`.
    pub fn commit(&self, pipeline: &Pipeline, base: &RasterBuffer, fold: &Fold) -> RasterBuffer {
        info!(category = fold.category.name(), "committing edit into base");
        pipeline.fold(base, &fold.params, fold.category)
    }
}

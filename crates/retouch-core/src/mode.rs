//! Edit-mode state machine.
//!
//! Brightness/contrast ("basic") and smoothing are exclusive live edits: a
//! pending edit in one category is committed before the other starts, so the
//! two never compound on a shared base buffer. Color, sharpen and geometric
//! edits are live in every state and never change it. A smoothing commit
//! bakes the color and sharpen edits along with it, since those stages run
//! on either side of smoothing.
//!
//! ```text
//!            edit basic                    edit smoothing / select variant
//!   Idle ---------------> EditingBasic <---------------------------------+
//!    ^  \                   |      ^                                     |
//!    |   \ edit smoothing   |      | edit basic (folds smoothing)        |
//!    |    +-------------> EditingSmoothing ------------------------------+
//!    |                        |                (folds basic)
//!    +---- confirm / load ----+
//! ```
//!
//! [`ModeController::transition`] is pure: it computes the next state and
//! parameter set and tells the caller which pending edit, if any, to fold
//! into the base. The caller performs the fold and then adopts the
//! transition with [`ModeController::apply`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::{CommitController, Fold};
use crate::params::{
    AdjustmentParameters, ParameterChange, ParameterLimits, ResetScope, SmoothingVariant,
};

/// An exclusive edit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditCategory {
    Basic,
    Smoothing,
}

impl EditCategory {
    pub fn name(self) -> &'static str {
        match self {
            EditCategory::Basic => "basic",
            EditCategory::Smoothing => "smoothing",
        }
    }

    /// The state in which this category is being edited.
    pub fn state(self) -> EditState {
        match self {
            EditCategory::Basic => EditState::EditingBasic,
            EditCategory::Smoothing => EditState::EditingSmoothing,
        }
    }
}

/// Which exclusive edit, if any, is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    #[default]
    Idle,
    EditingBasic,
    EditingSmoothing,
}

impl EditState {
    pub fn category(self) -> Option<EditCategory> {
        match self {
            EditState::Idle => None,
            EditState::EditingBasic => Some(EditCategory::Basic),
            EditState::EditingSmoothing => Some(EditCategory::Smoothing),
        }
    }
}

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeEvent {
    /// A control changed one parameter.
    Edit(ParameterChange),
    /// A smoothing variant was picked.
    SelectVariant(SmoothingVariant),
    /// Commit the current category and return to idle.
    Confirm,
    /// A reset control was pressed.
    Reset(ResetScope),
    /// A new image replaced the base.
    ImageLoaded,
}

/// Outcome of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: EditState,
    pub variant: SmoothingVariant,
    pub params: AdjustmentParameters,
    /// Edit to fold into the base before adopting `params`.
    pub fold: Option<Fold>,
}

/// Tracks the live edit category and the armed smoothing variant.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    state: EditState,
    variant: SmoothingVariant,
    limits: ParameterLimits,
}

impl ModeController {
    pub fn new(limits: ParameterLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn active_variant(&self) -> SmoothingVariant {
        self.variant
    }

    pub fn limits(&self) -> &ParameterLimits {
        &self.limits
    }

    /// Compute the effect of `event` without changing any state.
    pub fn transition(
        &self,
        params: &AdjustmentParameters,
        event: ModeEvent,
        commit: &CommitController,
    ) -> Transition {
        let mut next = Transition {
            state: self.state,
            variant: self.variant,
            params: *params,
            fold: None,
        };

        match event {
            ModeEvent::Edit(change) => {
                if let Some(category) = change.category() {
                    self.enter(&mut next, category, commit);
                }
                change.apply_to(&mut next.params, &self.limits);
            }
            ModeEvent::SelectVariant(SmoothingVariant::None) => {
                next.params.reset(ResetScope::Smoothing);
                next.variant = SmoothingVariant::None;
                if self.state == EditState::EditingSmoothing {
                    next.state = EditState::Idle;
                }
            }
            ModeEvent::SelectVariant(variant) => {
                // The kernel size carries over to the new filter
                self.enter(&mut next, EditCategory::Smoothing, commit);
                next.params.variant = variant;
                next.variant = variant;
            }
            ModeEvent::Confirm => {
                next.fold = commit.on_confirm(self.state, params);
                if let Some(fold) = &next.fold {
                    next.params.clear_folded(fold.category);
                }
                next.state = EditState::Idle;
            }
            ModeEvent::Reset(scope) => {
                next.params.reset(scope);
                let vacated = match scope {
                    ResetScope::All => true,
                    ResetScope::Basic => self.state == EditState::EditingBasic,
                    ResetScope::Smoothing => self.state == EditState::EditingSmoothing,
                    _ => false,
                };
                if vacated {
                    next.state = EditState::Idle;
                }
                if matches!(scope, ResetScope::All | ResetScope::Smoothing) {
                    next.variant = SmoothingVariant::None;
                }
            }
            ModeEvent::ImageLoaded => {
                next.params = AdjustmentParameters::default();
                next.variant = SmoothingVariant::None;
                next.state = EditState::Idle;
            }
        }

        debug!(
            from = ?self.state,
            to = ?next.state,
            variant = next.variant.name(),
            fold = next.fold.map(|f| f.category.name()),
            "mode transition"
        );
        next
    }

    /// Adopt a transition computed by [`ModeController::transition`].
    pub fn apply(&mut self, transition: &Transition) {
        self.state = transition.state;
        self.variant = transition.variant;
    }

    fn enter(&self, next: &mut Transition, category: EditCategory, commit: &CommitController) {
        next.fold = commit.on_switch(self.state, category, &next.params);
        if let Some(fold) = &next.fold {
            next.params.clear_folded(fold.category);
        }
        next.state = category.state();
    }
}

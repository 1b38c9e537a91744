//! Asset slot state and transition planning
//!
//! Each entity kind has exactly one asset slot. The planner maps the shape
//! of an incoming request (is there an upload? was removal asked for?) plus
//! the slot's current reference onto the one operation the manager runs.
//! Pure functions, so the full matrix is testable without a drive.

/// Lifecycle state of an entity's asset slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No reference stored
    Absent,
    /// A reference is stored and presumed live
    Existing,
    /// A new object is being attached over a stored reference
    Replacing,
    /// The reference was cleared and the object dropped
    Removed,
}

impl SlotState {
    pub fn of(current: Option<&str>) -> SlotState {
        match current {
            Some(_) => SlotState::Existing,
            None => SlotState::Absent,
        }
    }
}

/// The operation a request requires on a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPlan {
    /// Store the upload in an empty slot
    Attach,
    /// Store the upload, then drop the object behind `current`
    Replace { current: String },
    /// Clear the slot, then drop the object behind `current`
    Remove { current: String },
    /// Nothing to do
    Keep,
}

impl SlotPlan {
    /// State the slot moves toward while the plan executes
    pub fn target_state(&self, from: SlotState) -> SlotState {
        match self {
            SlotPlan::Attach => SlotState::Existing,
            SlotPlan::Replace { .. } => SlotState::Replacing,
            SlotPlan::Remove { .. } => SlotState::Removed,
            SlotPlan::Keep => from,
        }
    }
}

/// Plan the slot operation for one request
pub fn plan_transition(current: Option<&str>, has_upload: bool, remove: bool) -> SlotPlan {
    match (current, has_upload, remove) {
        (None, true, _) => SlotPlan::Attach,
        (Some(current), true, _) => SlotPlan::Replace {
            current: current.to_string(),
        },
        (Some(current), false, true) => SlotPlan::Remove {
            current: current.to_string(),
        },
        (None, false, true) => SlotPlan::Keep,
        (_, false, false) => SlotPlan::Keep,
    }
}

//! Per-instance identifier namespace for rendering and registration

use crate::activity::extract::{read_required, ActivityRecord};
use crate::core::types::{GameType, InstanceId};

/// Everything the renderer needs to scope one game instance on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub instance_id: InstanceId,
    pub game_type: GameType,
    /// Whether the host tracks this activity toward course completion
    pub required: bool,
}

impl RenderContext {
    /// Derive the context from an activity record.
    ///
    /// Records without a usable id get a fresh random one, so two anonymous
    /// activities on one page still never collide.
    pub fn from_record(record: &ActivityRecord) -> Self {
        let instance_id = record
            .id
            .as_deref()
            .and_then(InstanceId::sanitize)
            .unwrap_or_else(|| {
                tracing::debug!("Activity has no usable id, generating one");
                InstanceId::generate()
            });

        Self {
            instance_id,
            game_type: record.game_type.clone(),
            required: read_required(&record.config),
        }
    }

    /// DOM id of the instance's root container
    pub fn root_id(&self) -> String {
        format!("{}_{}", self.game_type.tag(), self.instance_id)
    }

    /// DOM id for a named part inside this instance
    pub fn part_id(&self, part: &str) -> String {
        format!("{}-{}", self.root_id(), part)
    }
}

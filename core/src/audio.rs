use crate::entity::EntityId;

/// A clip the host has been told to play.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playback {
    pub entity: EntityId,
    pub source: String,
}

/// The single audio stream shared by the whole vault. Starting a clip
/// supersedes whatever was playing; at most one clip is active.
#[derive(Debug, Clone, Default)]
pub struct AudioSlot {
    active: Option<Playback>,
}

impl AudioSlot {
    /// Make `source` the active clip. Returns the clip it replaced, if any.
    pub fn play(&mut self, entity: EntityId, source: impl Into<String>) -> Option<Playback> {
        self.active.replace(Playback {
            entity,
            source: source.into(),
        })
    }

    pub fn stop(&mut self) -> Option<Playback> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&Playback> {
        self.active.as_ref()
    }
}

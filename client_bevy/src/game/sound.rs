use bevy::prelude::*;
use vault_core::{EntityId, VaultEvent};

use super::{UpdateSet, VaultMessage};

pub struct SoundPlugin;

/// The clip currently playing for a card. Despawned when it finishes or is superseded.
#[derive(Component, Debug)]
pub(crate) struct ActiveClip {
    pub(crate) entity: EntityId,
}

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (stop_clips, play_clips)
                .chain()
                .in_set(UpdateSet::Visuals),
        );
    }
}

fn stop_clips(
    mut commands: Commands,
    mut reader: MessageReader<VaultMessage>,
    q_clips: Query<(Entity, &ActiveClip)>,
) {
    for VaultMessage(event) in reader.read() {
        let VaultEvent::StopAudio(playback) = event else {
            continue;
        };
        for (clip_entity, clip) in &q_clips {
            if clip.entity == playback.entity {
                commands.entity(clip_entity).despawn();
            }
        }
    }
}

fn play_clips(
    mut commands: Commands,
    mut reader: MessageReader<VaultMessage>,
    asset_server: Res<AssetServer>,
) {
    for VaultMessage(event) in reader.read() {
        let VaultEvent::PlayAudio(playback) = event else {
            continue;
        };
        debug!("Starting clip {} for card {}", playback.source, playback.entity);
        commands.spawn((
            AudioPlayer::new(asset_server.load::<AudioSource>(playback.source.clone())),
            PlaybackSettings::DESPAWN,
            ActiveClip {
                entity: playback.entity,
            },
        ));
    }
}

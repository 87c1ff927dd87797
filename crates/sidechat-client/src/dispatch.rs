//! Collaborator traits and the playback command executor.

use std::sync::Arc;

use sidechat_core::protocol::command::PlayerCommand;

/// Receives human-visible chat lines. Implemented by the UI layer; must be
/// safe to call at any time after construction, even while the panel is
/// hidden.
pub trait TranscriptSink: Send + Sync {
    fn append(&self, user: &str, text: &str);
}

/// Playback control surface of the host player. The command executor is its
/// only caller; it owns no player state.
pub trait PlayerControl: Send + Sync {
    fn pause(&self);
    fn play(&self);
    fn seek(&self, time: f64);
    fn set_rate(&self, value: f64);
    fn set_muted(&self, muted: bool);
    fn set_source(&self, src: &str, media_type: &str);
    /// Whether the current source can be rewound to zero (false for live
    /// edges without a seekable start).
    fn seekable_to_start(&self) -> bool;
}

/// Maps each recognized command to exactly one playback side effect.
///
/// Execution is fire-and-forget with respect to the sync loop: none of the
/// `PlayerControl` methods return errors, so nothing here can propagate
/// outward. Malformed input never reaches this point — parsing already
/// dropped it.
pub struct CommandExecutor {
    player: Arc<dyn PlayerControl>,
}

impl CommandExecutor {
    pub fn new(player: Arc<dyn PlayerControl>) -> Self {
        Self { player }
    }

    pub fn execute(&self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Pause => self.player.pause(),
            PlayerCommand::Play => self.player.play(),
            PlayerCommand::Restart => {
                if self.player.seekable_to_start() {
                    self.player.seek(0.0);
                }
                self.player.play();
            }
            PlayerCommand::Seek { time } => self.player.seek(time),
            PlayerCommand::Rate { value } => self.player.set_rate(value),
            PlayerCommand::Mute => self.player.set_muted(true),
            PlayerCommand::Unmute => self.player.set_muted(false),
            PlayerCommand::LoadSource { src, media_type } => {
                self.player.set_source(&src, &media_type)
            }
        }
    }
}

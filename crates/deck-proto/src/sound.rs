use crate::channel::HoverSound;

/// Channel sound cues.  Calls return immediately; playback is the
/// implementation's business.
pub trait SoundCues: Send {
    /// `None` means the channel resolved to no hover sound.
    fn play_channel_hover(&mut self, sound: Option<&HoverSound>);
    fn play_channel_click(&mut self);
    fn stop_all_sounds(&mut self);
}

/// Silent cues, used when no player is available.
#[derive(Debug, Default)]
pub struct NoSound;

impl SoundCues for NoSound {
    fn play_channel_hover(&mut self, _sound: Option<&HoverSound>) {}
    fn play_channel_click(&mut self) {}
    fn stop_all_sounds(&mut self) {}
}

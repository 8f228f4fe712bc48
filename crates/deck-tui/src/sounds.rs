//! Channel sound cues played through short-lived mpv children.
//!
//! Every cue is its own `mpv --no-video` process.  Hover cues replace each
//! other; `stop_all_sounds` kills everything still playing.

use std::path::PathBuf;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use deck_proto::channel::HoverSound;
use deck_proto::sound::{NoSound, SoundCues};

pub struct MpvCues {
    binary: PathBuf,
    click: Option<String>,
    hover_child: Option<Child>,
    others: Vec<Child>,
}

impl MpvCues {
    pub fn new(binary: PathBuf, click: Option<String>) -> Self {
        Self {
            binary,
            click,
            hover_child: None,
            others: Vec::new(),
        }
    }

    fn spawn(&self, url: &str, volume: f32) -> Option<Child> {
        let result = Command::new(&self.binary)
            .args(cue_args(url, volume))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn();
        match result {
            Ok(child) => {
                debug!("cue {} pid {:?}", url, child.id());
                Some(child)
            }
            Err(e) => {
                warn!("failed to play {}: {}", url, e);
                None
            }
        }
    }

    /// Drop children that already exited.
    fn reap(&mut self) {
        self.others
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

fn cue_args(url: &str, volume: f32) -> Vec<String> {
    vec![
        "--no-video".to_string(),
        "--really-quiet".to_string(),
        format!(
            "--volume={}",
            (volume * 100.0).clamp(0.0, 100.0).round() as i64
        ),
        url.to_string(),
    ]
}

impl SoundCues for MpvCues {
    fn play_channel_hover(&mut self, sound: Option<&HoverSound>) {
        if let Some(mut prev) = self.hover_child.take() {
            let _ = prev.start_kill();
        }
        let Some(sound) = sound else {
            return;
        };
        self.hover_child = self.spawn(&sound.url, sound.volume);
    }

    fn play_channel_click(&mut self) {
        self.reap();
        if let Some(url) = self.click.clone() {
            if let Some(child) = self.spawn(&url, 0.6) {
                self.others.push(child);
            }
        }
    }

    fn stop_all_sounds(&mut self) {
        for mut child in self.hover_child.take().into_iter().chain(self.others.drain(..)) {
            let _ = child.start_kill();
        }
    }
}

/// mpv cues when a player is found, silence otherwise.
pub fn cues_for(click: Option<String>) -> Box<dyn SoundCues> {
    match deck_proto::platform::find_mpv_binary() {
        Some(binary) => {
            info!("sound cues via {}", binary.display());
            Box::new(MpvCues::new(binary, click))
        }
        None => {
            warn!("mpv not found; channel sounds disabled");
            Box::new(NoSound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_args_scale_volume() {
        let args = cue_args("/snd/hover.wav", 0.5);
        assert_eq!(args[2], "--volume=50");
        assert_eq!(args[3], "/snd/hover.wav");
        assert_eq!(cue_args("x", 3.0)[2], "--volume=100");
    }

    #[test]
    fn test_hover_without_any_sound_is_silent() {
        let mut cues = MpvCues::new(PathBuf::from("/nonexistent/mpv"), None);
        cues.play_channel_hover(None);
        assert!(cues.hover_child.is_none());
        cues.play_channel_click();
        assert!(cues.others.is_empty());
        cues.stop_all_sounds();
    }
}

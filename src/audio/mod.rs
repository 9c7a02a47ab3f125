//! # Audio Module
//!
//! Horn samples and spoken trim announcements.
//!
//! Playback is fire-and-forget: each request spawns a child process and
//! returns immediately. [`Audio::stop`] kills everything still playing.
//!
//! - Sound files: `<player> <file>` (`aplay` by default)
//! - Speech: `<speech> --stdout -a 200 -s 130 <text>` piped into `<player>`

use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

use crate::config::SoundConfig;
use crate::error::{Result, TeleopError};

/// Speech amplitude and words-per-minute passed to the synthesizer
const SPEECH_ARGS: [&str; 5] = ["--stdout", "-a", "200", "-s", "130"];

/// Sound capability
#[cfg_attr(test, mockall::automock)]
pub trait Audio {
    /// Start playing a sound file
    fn play(&mut self, file: &Path) -> Result<()>;

    /// Start speaking `text`
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Stop anything currently playing
    fn stop(&mut self) -> Result<()>;
}

/// Audio through external player processes
#[derive(Debug)]
pub struct SystemAudio {
    player: String,
    speech: String,
    children: Vec<Child>,
}

impl SystemAudio {
    /// Creates an audio backend from the `[sound]` configuration section
    #[must_use]
    pub fn new(config: &SoundConfig) -> Self {
        Self {
            player: config.player.clone(),
            speech: config.speech.clone(),
            children: Vec::new(),
        }
    }

    /// Number of playback processes still running
    pub fn active(&mut self) -> usize {
        self.reap();
        self.children.len()
    }

    /// Drops children that already exited
    fn reap(&mut self) {
        self.children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }

    fn spawn_error(program: &str, err: std::io::Error) -> TeleopError {
        TeleopError::Audio(format!("Failed to start {}: {}", program, err))
    }
}

impl Audio for SystemAudio {
    fn play(&mut self, file: &Path) -> Result<()> {
        self.reap();
        debug!("Playing {}", file.display());

        let child = Command::new(&self.player)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Self::spawn_error(&self.player, e))?;

        self.children.push(child);
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        self.reap();
        debug!("Speaking {:?}", text);

        let mut synth = Command::new(&self.speech)
            .args(SPEECH_ARGS)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Self::spawn_error(&self.speech, e))?;

        let Some(wave) = synth.stdout.take() else {
            let _ = synth.kill();
            return Err(TeleopError::Audio(format!("{} produced no output pipe", self.speech)));
        };

        let player = Command::new(&self.player)
            .stdin(Stdio::from(wave))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match player {
            Ok(player) => {
                self.children.push(synth);
                self.children.push(player);
                Ok(())
            }
            Err(e) => {
                let _ = synth.kill();
                let _ = synth.wait();
                Err(Self::spawn_error(&self.player, e))
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        let running = self.active();
        if running > 0 {
            debug!("Stopping {} audio process(es)", running);
        }

        for mut child in self.children.drain(..) {
            // Already exited is fine
            let _ = child.kill();
            if let Err(e) = child.wait() {
                warn!("Failed to reap audio process {}: {}", child.id(), e);
            }
        }
        Ok(())
    }
}

impl Drop for SystemAudio {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_with(player: &str, speech: &str) -> SystemAudio {
        SystemAudio::new(&SoundConfig {
            player: player.to_string(),
            speech: speech.to_string(),
            ..SoundConfig::default()
        })
    }

    #[test]
    fn test_new_from_config() {
        let audio = SystemAudio::new(&SoundConfig::default());
        assert_eq!(audio.player, "aplay");
        assert_eq!(audio.speech, "espeak");
        assert!(audio.children.is_empty());
    }

    #[test]
    fn test_play_is_non_blocking_and_stop_kills() {
        // `sleep 30` stands in for a long sample
        let mut audio = audio_with("sleep", "echo");
        audio.play(Path::new("30")).unwrap();
        assert_eq!(audio.active(), 1);

        audio.stop().unwrap();
        assert_eq!(audio.active(), 0);
    }

    #[test]
    fn test_speak_pipes_into_player() {
        let mut audio = audio_with("cat", "echo");
        audio.speak("Trim 3 degrees").unwrap();
        assert!(audio.active() <= 2);
        audio.stop().unwrap();
        assert_eq!(audio.active(), 0);
    }

    #[test]
    fn test_play_missing_player() {
        let mut audio = audio_with("/nonexistent/player", "echo");
        match audio.play(Path::new("horn.wav")) {
            Err(TeleopError::Audio(msg)) => assert!(msg.contains("/nonexistent/player")),
            other => panic!("Expected Audio error, got: {:?}", other),
        }
        assert_eq!(audio.active(), 0);
    }

    #[test]
    fn test_speak_missing_synthesizer() {
        let mut audio = audio_with("cat", "/nonexistent/espeak");
        assert!(matches!(audio.speak("hello"), Err(TeleopError::Audio(_))));
    }

    #[test]
    fn test_stop_with_nothing_playing() {
        let mut audio = audio_with("true", "echo");
        assert!(audio.stop().is_ok());
    }
}

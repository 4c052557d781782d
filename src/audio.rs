use std::io::Write;
use std::time::{Duration, Instant};

/// Game events that carry an audible cue. Engines queue these; the shell
/// decides how (and whether) they are heard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sound {
    // Tanks
    Fire,
    Explosion,
    PowerUp,
    ShieldAbsorb,
    // Tetris
    Rotate,
    Lock,
    LineClear,
    HardDrop,
    // Snake
    Eat,
    Countdown(u8),
    Go,
    // Cards
    Flip,
    Match,
    Mismatch,
    // Shared
    LevelUp,
    GameOver,
    Win,
}

/// Nominal tone for a cue. The terminal backend cannot honor frequency, but
/// the mapping is the contract for any richer output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tone {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

impl Sound {
    pub fn tone(self) -> Tone {
        let (freq_hz, duration_ms) = match self {
            Sound::Fire => (880, 40),
            Sound::Explosion => (110, 160),
            Sound::PowerUp => (1320, 120),
            Sound::ShieldAbsorb => (660, 80),
            Sound::Rotate => (700, 30),
            Sound::Lock => (240, 60),
            Sound::LineClear => (980, 180),
            Sound::HardDrop => (180, 50),
            Sound::Eat => (1040, 60),
            Sound::Countdown(n) => (440 + 110 * (3u16.saturating_sub(n as u16)), 120),
            Sound::Go => (880, 250),
            Sound::Flip => (520, 40),
            Sound::Match => (1180, 150),
            Sound::Mismatch => (200, 150),
            Sound::LevelUp => (1560, 220),
            Sound::GameOver => (130, 400),
            Sound::Win => (1760, 400),
        };
        Tone { freq_hz, duration_ms }
    }
}

const MIN_BELL_GAP: Duration = Duration::from_millis(90);

/// Fire-and-forget cue output. Every tone degrades to the terminal bell,
/// rate-limited so bursts of cues don't stack into a drone; write failures
/// are swallowed.
pub struct Audio {
    enabled: bool,
    last_bell: Option<Instant>,
}

impl Audio {
    pub fn new(enabled: bool) -> Self {
        Audio { enabled, last_bell: None }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn play(&mut self, sound: Sound) {
        if !self.enabled {
            return;
        }
        let _ = sound.tone();
        let now = Instant::now();
        if let Some(last) = self.last_bell {
            if now.duration_since(last) < MIN_BELL_GAP {
                return;
            }
        }
        self.last_bell = Some(now);
        let mut out = std::io::stdout();
        if out.write_all(b"\x07").and_then(|_| out.flush()).is_err() {
            // No bell available; stay silent.
            log::warn!("terminal bell write failed; audio cues dropped");
            self.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_has_a_tone() {
        let cues = [
            Sound::Fire,
            Sound::Explosion,
            Sound::PowerUp,
            Sound::ShieldAbsorb,
            Sound::Rotate,
            Sound::Lock,
            Sound::LineClear,
            Sound::HardDrop,
            Sound::Eat,
            Sound::Countdown(3),
            Sound::Go,
            Sound::Flip,
            Sound::Match,
            Sound::Mismatch,
            Sound::LevelUp,
            Sound::GameOver,
            Sound::Win,
        ];
        for cue in cues {
            let tone = cue.tone();
            assert!(tone.freq_hz > 0);
            assert!(tone.duration_ms > 0);
        }
    }

    #[test]
    fn countdown_steps_are_distinct() {
        let t3 = Sound::Countdown(3).tone();
        let t2 = Sound::Countdown(2).tone();
        let t1 = Sound::Countdown(1).tone();
        assert_ne!(t3.freq_hz, t2.freq_hz);
        assert_ne!(t2.freq_hz, t1.freq_hz);
    }

    #[test]
    fn disabled_output_stays_disabled() {
        let mut audio = Audio::new(false);
        audio.play(Sound::Fire);
        assert!(!audio.enabled());
    }
}

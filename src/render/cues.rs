//! Sound cues for game events
//!
//! The terminal has one sound, the bell, so every cue rings it once. Cues are
//! still kept apart so the log says which one fired.

use std::io::{self, Write};
use tracing::debug;

use crate::game::TickEvent;

const BELL: &[u8] = b"\x07";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    BonusEat,
    GameOver,
}

impl SoundCue {
    /// Cues a tick should trigger, in the order they happened
    pub fn from_event(event: &TickEvent) -> Vec<SoundCue> {
        let mut cues = Vec::new();
        if event.ate_food {
            cues.push(SoundCue::Eat);
        }
        if event.ate_bonus {
            cues.push(SoundCue::BonusEat);
        }
        if event.terminal.is_some() {
            cues.push(SoundCue::GameOver);
        }
        cues
    }
}

/// Plays cues on a terminal writer
pub struct CuePlayer<W: Write> {
    writer: W,
    enabled: bool,
}

impl<W: Write> CuePlayer<W> {
    pub fn new(writer: W, enabled: bool) -> Self {
        Self { writer, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn play(&mut self, cue: SoundCue) -> io::Result<()> {
        debug!(?cue, enabled = self.enabled, "sound cue");
        if !self.enabled {
            return Ok(());
        }

        self.writer.write_all(BELL)?;
        self.writer.flush()
    }

    /// Play every cue triggered by a tick
    pub fn play_event(&mut self, event: &TickEvent) -> io::Result<()> {
        for cue in SoundCue::from_event(event) {
            self.play(cue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionCause, Position};

    fn event() -> TickEvent {
        TickEvent {
            head: Position::new(100, 100),
            ate_food: false,
            ate_bonus: false,
            bonus_spawned: false,
            terminal: None,
        }
    }

    #[test]
    fn test_plain_move_is_silent() {
        assert!(SoundCue::from_event(&event()).is_empty());
    }

    #[test]
    fn test_cues_from_event() {
        let both = TickEvent {
            ate_food: true,
            ate_bonus: true,
            ..event()
        };
        assert_eq!(
            SoundCue::from_event(&both),
            vec![SoundCue::Eat, SoundCue::BonusEat]
        );

        let crashed = TickEvent {
            terminal: Some(CollisionCause::Wall),
            ..event()
        };
        assert_eq!(SoundCue::from_event(&crashed), vec![SoundCue::GameOver]);
    }

    #[test]
    fn test_player_rings_bell_per_cue() {
        let mut player = CuePlayer::new(Vec::new(), true);
        let both = TickEvent {
            ate_food: true,
            ate_bonus: true,
            ..event()
        };
        player.play_event(&both).unwrap();
        assert_eq!(player.writer, b"\x07\x07".to_vec());
    }

    #[test]
    fn test_disabled_player_is_silent() {
        let mut player = CuePlayer::new(Vec::new(), false);
        player.play(SoundCue::GameOver).unwrap();
        assert!(player.writer.is_empty());

        player.set_enabled(true);
        player.play(SoundCue::Eat).unwrap();
        assert_eq!(player.writer.len(), 1);
    }
}

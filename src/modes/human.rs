use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{GameConfig, Phase, Session};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{CuePlayer, RenderOptions, Renderer};

pub struct HumanMode {
    session: Session,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    cues: CuePlayer<Stderr>,
    options: RenderOptions,
    tick_interval: Duration,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let session =
            Session::new(config.world, seed).context("Failed to set up the game session")?;

        Ok(Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            cues: CuePlayer::new(stderr(), config.sound),
            options: RenderOptions {
                gradient: config.gradient,
                sound: config.sound,
            },
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "leaving"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One snake step per tick, 10 Hz by default
        let mut tick_timer = interval(self.tick_interval);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game()?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.session.phase() == Phase::Playing {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics, &self.options);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply_action(action)?;
        }

        Ok(())
    }

    fn apply_action(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Turn(direction) => {
                self.session.turn(direction);
            }
            KeyAction::Start => {
                if self.session.start()? {
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Restart => {
                if self.session.restart()? {
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Menu => {
                self.session.to_menu();
            }
            KeyAction::ToggleSound => {
                self.options.sound = !self.options.sound;
                self.cues.set_enabled(self.options.sound);
            }
            KeyAction::ToggleGradient => {
                self.options.gradient = !self.options.gradient;
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let Some(event) = self.session.tick() else {
            return Ok(());
        };

        self.metrics.on_tick(&event);
        self.cues
            .play_event(&event)
            .context("Failed to play sound cue")?;

        // Track game over
        if let Phase::GameOver { final_score, .. } = self.session.phase() {
            self.metrics.on_game_over(final_score);
            info!(
                final_score,
                foods = self.metrics.foods_eaten,
                bonuses = self.metrics.bonuses_eaten,
                time = %self.metrics.format_time(),
                "game finished"
            );
        }

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    fn mode() -> HumanMode {
        let config = GameConfig {
            sound: false,
            ..Default::default()
        };
        HumanMode::new(config, 77).unwrap()
    }

    #[test]
    fn test_starts_on_menu() {
        let mode = mode();
        assert_eq!(mode.session.phase(), Phase::Menu);
        assert_eq!(mode.tick_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_zero_tick_interval() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(HumanMode::new(config, 1).is_err());
    }

    #[test]
    fn test_start_and_turn() {
        let mut mode = mode();
        mode.apply_action(KeyAction::Start).unwrap();
        assert_eq!(mode.session.phase(), Phase::Playing);

        mode.apply_action(KeyAction::Turn(Direction::Up)).unwrap();
        mode.update_game().unwrap();
        let world = mode.session.world().unwrap();
        assert_eq!(world.heading(), Direction::Up);
    }

    #[test]
    fn test_game_over_updates_metrics_once() {
        let mut mode = mode();
        mode.apply_action(KeyAction::Start).unwrap();

        for _ in 0..100 {
            mode.update_game().unwrap();
        }

        assert!(matches!(mode.session.phase(), Phase::GameOver { .. }));
        assert_eq!(mode.metrics.games_played, 1);

        mode.apply_action(KeyAction::Restart).unwrap();
        assert_eq!(mode.session.phase(), Phase::Playing);
        assert_eq!(mode.metrics.foods_eaten, 0);
    }

    #[test]
    fn test_menu_and_quit() {
        let mut mode = mode();
        mode.apply_action(KeyAction::Start).unwrap();
        while mode.session.phase() == Phase::Playing {
            mode.update_game().unwrap();
        }

        mode.apply_action(KeyAction::Menu).unwrap();
        assert_eq!(mode.session.phase(), Phase::Menu);

        mode.apply_action(KeyAction::Quit).unwrap();
        assert!(mode.should_quit);
    }

    #[test]
    fn test_toggles() {
        let mut mode = mode();
        assert!(!mode.cues.is_enabled());

        mode.apply_action(KeyAction::ToggleSound).unwrap();
        assert!(mode.options.sound);
        assert!(mode.cues.is_enabled());

        mode.apply_action(KeyAction::ToggleGradient).unwrap();
        assert!(!mode.options.gradient);
    }
}

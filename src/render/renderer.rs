use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{CollisionCause, Phase, Position, Session, SnakeWorld};
use crate::metrics::GameMetrics;

const BACKGROUND: Color = Color::Rgb(100, 150, 200);
const WALL: Color = Color::Rgb(180, 180, 180);
const FOOD: Color = Color::Rgb(255, 0, 0);
const BONUS: Color = Color::Rgb(0, 0, 255);
const HEAD: (u8, u8, u8) = (0, 100, 0);
const TAIL: (u8, u8, u8) = (150, 255, 150);

/// Upper half block: foreground paints the top cell, background the bottom one
const HALF_BLOCK: &str = "▀";

/// Presentation switches the player can flip at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub gradient: bool,
    pub sound: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        session: &Session,
        metrics: &GameMetrics,
        options: &RenderOptions,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        match (session.phase(), session.world()) {
            (Phase::Playing, Some(world)) => {
                frame.render_widget(self.render_stats(world, metrics), chunks[0]);

                let field = world.playfield();
                let width = saturating_u16(field.columns()).saturating_add(2);
                let height = saturating_u16(field.rows()).div_ceil(2).saturating_add(2);
                let area = centered(chunks[1], width, height);
                frame.render_widget(self.render_grid(world, options), area);
            }
            (Phase::GameOver { cause, final_score }, _) => {
                let area = centered(chunks[1], 50, 11);
                frame.render_widget(self.render_game_over(cause, final_score, metrics), area);
            }
            _ => {
                let area = centered(chunks[1], 40, 12);
                frame.render_widget(self.render_menu(metrics, options), area);
            }
        }

        frame.render_widget(self.render_controls(options), chunks[2]);
    }

    fn render_grid(&self, world: &SnakeWorld, options: &RenderOptions) -> Paragraph<'_> {
        let field = world.playfield();
        let columns = field.columns() as usize;
        let rows = field.rows() as usize;
        let cells = paint_cells(world, options);

        let mut lines = Vec::with_capacity(rows.div_ceil(2));
        for top in (0..rows).step_by(2) {
            let spans: Vec<Span> = (0..columns)
                .map(|col| {
                    let upper = cells[top * columns + col];
                    let lower = if top + 1 < rows {
                        cells[(top + 1) * columns + col]
                    } else {
                        Color::Reset
                    };
                    Span::styled(HALF_BLOCK, Style::default().fg(upper).bg(lower))
                })
                .collect();
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(WALL))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, world: &SnakeWorld, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                world.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Food: ", Style::default().fg(Color::Yellow)),
            Span::styled(world.food_count().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
        ];
        if world.bonus().is_some() {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "BONUS!",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_menu(&self, metrics: &GameMetrics, options: &RenderOptions) -> Paragraph<'_> {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "S N A K E",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[Enter]",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Start Game"),
            ]),
            Line::from(vec![
                Span::styled(
                    "[Q]",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Exit Game"),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(
                format!(
                    "Sound {}  Gradient {}",
                    on_off(options.sound),
                    on_off(options.gradient)
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(WALL)),
        )
    }

    fn render_game_over(
        &self,
        cause: CollisionCause,
        final_score: u32,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                format!("Snake {}", cause),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Food eaten: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.foods_eaten.to_string(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled("Bonus eaten: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.bonuses_eaten.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "M",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for menu or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, options: &RenderOptions) -> Paragraph<'_> {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("N", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" sound {} | ", on_off(options.sound))),
            Span::styled("G", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" gradient {} | ", on_off(options.gradient))),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Colour of every playfield cell, row-major
fn paint_cells(world: &SnakeWorld, options: &RenderOptions) -> Vec<Color> {
    let field = world.playfield();
    let columns = field.columns();
    let rows = field.rows();
    let mut cells = vec![BACKGROUND; (columns * rows) as usize];

    let mut paint = |pos: Position, color: Color| {
        let (col, row) = field.grid_coords(pos);
        if (0..columns).contains(&col) && (0..rows).contains(&row) {
            cells[(row * columns + col) as usize] = color;
        }
    };

    paint(world.food(), FOOD);
    if let Some(bonus) = world.bonus() {
        paint(bonus, BONUS);
    }

    // Tail first so the head wins if anything overlaps
    let body = &world.snake().body;
    for (index, segment) in body.iter().enumerate().rev() {
        paint(*segment, segment_color(index, body.len(), options.gradient));
    }

    cells
}

/// Colour of the snake segment at `index` (0 is the head)
fn segment_color(index: usize, len: usize, gradient: bool) -> Color {
    if index == 0 {
        return rgb(HEAD);
    }
    if !gradient || len < 2 {
        return rgb(TAIL);
    }

    let t = index as f32 / (len - 1) as f32;
    let lerp = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Color::Rgb(lerp(HEAD.0, TAIL.0), lerp(HEAD.1, TAIL.1), lerp(HEAD.2, TAIL.2))
}

fn saturating_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// A rect of at most `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, WorldConfig};
    use ratatui::{Terminal, backend::TestBackend};

    const OPTIONS: RenderOptions = RenderOptions {
        gradient: true,
        sound: true,
    };

    fn screen_text(session: &Session, metrics: &GameMetrics) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, session, metrics, &OPTIONS))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_gradient_runs_head_to_tail() {
        assert_eq!(segment_color(0, 5, true), rgb(HEAD));
        assert_eq!(segment_color(4, 5, true), rgb(TAIL));
        assert_eq!(segment_color(2, 5, true), Color::Rgb(75, 178, 75));
    }

    #[test]
    fn test_flat_body_without_gradient() {
        assert_eq!(segment_color(0, 5, false), rgb(HEAD));
        assert_eq!(segment_color(1, 5, false), rgb(TAIL));
        assert_eq!(segment_color(3, 5, false), rgb(TAIL));
    }

    #[test]
    fn test_paint_cells() {
        let world = SnakeWorld::new_game(3, GameConfig::small().world).unwrap();
        let cells = paint_cells(&world, &OPTIONS);
        let field = world.playfield();
        let index = |pos| {
            let (col, row) = field.grid_coords(pos);
            (row * field.columns() + col) as usize
        };

        assert_eq!(cells.len(), 100);
        assert_eq!(cells[index(world.snake().head())], rgb(HEAD));
        assert_eq!(cells[index(world.food())], FOOD);
        assert_eq!(cells.iter().filter(|c| **c == BACKGROUND).count(), 98);
    }

    #[test]
    fn test_menu_screen() {
        let session = Session::new(WorldConfig::default(), 1).unwrap();
        let text = screen_text(&session, &GameMetrics::new());
        assert!(text.contains("Start Game"));
        assert!(text.contains("Exit Game"));
    }

    #[test]
    fn test_playing_screen_shows_score() {
        let mut session = Session::new(WorldConfig::default(), 1).unwrap();
        session.start().unwrap();
        let text = screen_text(&session, &GameMetrics::new());
        assert!(text.contains("Score: 0"));
        assert!(text.contains(HALF_BLOCK));
    }

    #[test]
    fn test_game_over_screen() {
        let mut session = Session::new(WorldConfig::default(), 1).unwrap();
        session.start().unwrap();
        while !session.tick().is_some_and(|event| event.is_terminal()) {}

        let mut metrics = GameMetrics::new();
        metrics.foods_eaten = 3;
        metrics.bonuses_eaten = 1;
        let text = screen_text(&session, &metrics);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Snake hit the wall"));
        assert!(text.contains("Food eaten: 3"));
        assert!(text.contains("Bonus eaten: 1"));
    }

    #[test]
    fn test_largest_grid_fits_small_terminal() {
        let side = crate::game::config::MAX_GRID_SIDE as i32 * 10;
        let mut session = Session::new(WorldConfig::new(side, side, 0, 10), 1).unwrap();
        session.start().unwrap();

        let text = screen_text(&session, &GameMetrics::new());
        assert!(text.contains("Score: 0"));
    }

    #[test]
    fn test_saturating_u16() {
        assert_eq!(saturating_u16(1024), 1024);
        assert_eq!(saturating_u16(-5), 0);
        assert_eq!(saturating_u16(i32::MAX), u16::MAX);
    }
}

use crossterm::event::{KeyCode, KeyEvent};
use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::catalog::{Catalog, Category, CZECH_ALPHABET};
use crate::game::{Feedback, Game};
use crate::session::{SessionSummary, Settings};

const HORIZONTAL_MARGIN: u16 = 5;
const LETTER_GRID_COLS: usize = 14;

pub const WORD_COUNT_CHOICES: [usize; 6] = [3, 5, 10, 15, 20, 30];

/// Section of the setup screen that currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFocus {
    Letters,
    Categories,
    Count,
    Uppercase,
}

/// What the app loop should do after a setup keypress
#[derive(Debug, Clone, PartialEq)]
pub enum SetupAction {
    None,
    Start(Settings),
    Quit,
}

/// Parent-facing setup screen: pick letters the child knows, word kinds,
/// game length, and casing. Keeps a live count of matching words and
/// refuses to start on an empty pool.
pub struct SetupScreen {
    catalog: Catalog,
    letters: Vec<(String, bool)>,
    categories: Vec<(Category, bool)>,
    counts: Vec<usize>,
    count_index: usize,
    uppercase_only: bool,
    focus: SetupFocus,
    letter_cursor: usize,
    category_cursor: usize,
    available: usize,
}

impl SetupScreen {
    pub fn new(catalog: Catalog, settings: &Settings) -> Self {
        let letters = CZECH_ALPHABET
            .iter()
            .map(|token| {
                (
                    token.to_string(),
                    settings.allowed_letters.contains(*token),
                )
            })
            .collect();

        let categories = Category::ALL
            .iter()
            .map(|category| (*category, settings.allowed_categories.contains(category)))
            .collect();

        let mut counts: Vec<usize> = WORD_COUNT_CHOICES.to_vec();
        if !counts.contains(&settings.word_count) {
            counts.push(settings.word_count);
        }
        let count_index = counts
            .iter()
            .position(|c| *c == settings.word_count)
            .unwrap_or(0);

        let mut screen = Self {
            catalog,
            letters,
            categories,
            counts,
            count_index,
            uppercase_only: settings.uppercase_only,
            focus: SetupFocus::Letters,
            letter_cursor: 0,
            category_cursor: 0,
            available: 0,
        };
        screen.recount();
        screen
    }

    pub fn settings(&self) -> Settings {
        Settings {
            allowed_letters: self
                .letters
                .iter()
                .filter(|(_, selected)| *selected)
                .map(|(token, _)| token.clone())
                .collect(),
            allowed_categories: self
                .categories
                .iter()
                .filter(|(_, selected)| *selected)
                .map(|(category, _)| *category)
                .collect(),
            word_count: self.counts[self.count_index],
            uppercase_only: self.uppercase_only,
        }
    }

    pub fn available_count(&self) -> usize {
        self.available
    }

    fn recount(&mut self) {
        let settings = self.settings();
        self.available = self
            .catalog
            .available_words(&settings.allowed_letters, &settings.allowed_categories)
            .len();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> SetupAction {
        match key.code {
            KeyCode::Esc => return SetupAction::Quit,
            KeyCode::Enter => {
                if self.available > 0 {
                    return SetupAction::Start(self.settings());
                }
            }
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Char(' ') => self.toggle_focused(),
            KeyCode::Char('a') | KeyCode::Char('A') => {
                if self.focus == SetupFocus::Letters {
                    self.toggle_all_letters();
                }
            }
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-(LETTER_GRID_COLS as isize)),
            KeyCode::Down => self.move_cursor(LETTER_GRID_COLS as isize),
            _ => {}
        }
        SetupAction::None
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = [
            SetupFocus::Letters,
            SetupFocus::Categories,
            SetupFocus::Count,
            SetupFocus::Uppercase,
        ];
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            SetupFocus::Letters => {
                let total = self.letters.len() as isize;
                self.letter_cursor =
                    ((self.letter_cursor as isize + delta).rem_euclid(total)) as usize;
            }
            SetupFocus::Categories => {
                // vertical movement means nothing in a single row
                if delta.abs() == 1 {
                    let total = self.categories.len() as isize;
                    self.category_cursor =
                        ((self.category_cursor as isize + delta).rem_euclid(total)) as usize;
                }
            }
            SetupFocus::Count => {
                if delta.abs() == 1 {
                    let total = self.counts.len() as isize;
                    self.count_index =
                        ((self.count_index as isize + delta).rem_euclid(total)) as usize;
                }
            }
            SetupFocus::Uppercase => {}
        }
    }

    fn toggle_focused(&mut self) {
        match self.focus {
            SetupFocus::Letters => {
                let (_, selected) = &mut self.letters[self.letter_cursor];
                *selected = !*selected;
            }
            SetupFocus::Categories => {
                let selected_count = self.categories.iter().filter(|(_, s)| *s).count();
                let (_, selected) = &mut self.categories[self.category_cursor];
                // never let the last word kind go away
                if *selected && selected_count == 1 {
                    return;
                }
                *selected = !*selected;
            }
            SetupFocus::Count => {}
            SetupFocus::Uppercase => self.uppercase_only = !self.uppercase_only,
        }
        self.recount();
    }

    fn toggle_all_letters(&mut self) {
        let all_selected = self.letters.iter().all(|(_, s)| *s);
        for (_, selected) in &mut self.letters {
            *selected = !all_selected;
        }
        self.recount();
    }
}

impl Widget for &SetupScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let selected_style = Style::default().fg(Color::Green).patch(bold);
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

        let grid_rows = self.letters.len().div_ceil(LETTER_GRID_COLS) as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(1)
            .constraints(
                [
                    Constraint::Length(2),         // title
                    Constraint::Length(1),         // letters heading
                    Constraint::Length(grid_rows), // letter grid
                    Constraint::Length(1),         // padding
                    Constraint::Length(1),         // categories
                    Constraint::Length(1),         // word count
                    Constraint::Length(1),         // uppercase
                    Constraint::Length(1),         // padding
                    Constraint::Length(1),         // available words
                    Constraint::Min(1),            // legend
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(Span::styled("Nastavení pro rodiče", bold))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let letters_heading = if self.focus == SetupFocus::Letters {
            Span::styled("1. Vyber písmenka", bold)
        } else {
            Span::styled("1. Vyber písmenka", dim)
        };
        Paragraph::new(letters_heading).render(chunks[1], buf);

        let grid_lines: Vec<Line> = self
            .letters
            .chunks(LETTER_GRID_COLS)
            .enumerate()
            .map(|(row, tokens)| {
                let spans: Vec<Span> = tokens
                    .iter()
                    .enumerate()
                    .map(|(col, (token, selected))| {
                        let index = row * LETTER_GRID_COLS + col;
                        let mut style = if *selected { selected_style } else { dim };
                        if self.focus == SetupFocus::Letters && index == self.letter_cursor {
                            style = style.patch(cursor_style);
                        }
                        Span::styled(format!("{token:<3}"), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Paragraph::new(grid_lines).render(chunks[2], buf);

        let category_spans: Vec<Span> = Itertools::intersperse(
            self.categories
                .iter()
                .enumerate()
                .map(|(index, (category, selected))| {
                    let mut style = if *selected { selected_style } else { dim };
                    if self.focus == SetupFocus::Categories && index == self.category_cursor {
                        style = style.patch(cursor_style);
                    }
                    Span::styled(category.label().to_string(), style)
                }),
            Span::raw("  "),
        )
        .collect();
        let mut category_line = vec![Span::styled("2. Druh slov:  ", bold)];
        category_line.extend(category_spans);
        Paragraph::new(Line::from(category_line)).render(chunks[4], buf);

        let count_spans: Vec<Span> = Itertools::intersperse(
            self.counts.iter().enumerate().map(|(index, count)| {
                let mut style = if index == self.count_index {
                    selected_style
                } else {
                    dim
                };
                if self.focus == SetupFocus::Count && index == self.count_index {
                    style = style.patch(cursor_style);
                }
                Span::styled(count.to_string(), style)
            }),
            Span::raw("  "),
        )
        .collect();
        let mut count_line = vec![Span::styled("3. Počet slov:  ", bold)];
        count_line.extend(count_spans);
        Paragraph::new(Line::from(count_line)).render(chunks[5], buf);

        let uppercase_style = if self.focus == SetupFocus::Uppercase {
            selected_style.patch(cursor_style)
        } else if self.uppercase_only {
            selected_style
        } else {
            dim
        };
        Paragraph::new(Line::from(vec![
            Span::styled("4. Pouze velká písmena: ", bold),
            Span::styled(if self.uppercase_only { "ANO" } else { "NE" }, uppercase_style),
        ]))
        .render(chunks[6], buf);

        let available_style = if self.available == 0 {
            Style::default().fg(Color::Red).patch(bold)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Paragraph::new(Span::styled(
            format!("Dostupných slov: {}", self.available),
            available_style,
        ))
        .render(chunks[8], buf);

        Paragraph::new(Span::styled(
            "(tab) sekce  (šipky) pohyb  (mezerník) výběr  (a) vše  (enter) start  (esc) konec",
            dim,
        ))
        .wrap(Wrap { trim: true })
        .render(chunks[9], buf);
    }
}

impl Widget for &Game {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(1)
            .constraints(
                [
                    Constraint::Length(1), // header
                    Constraint::Min(3),    // word
                    Constraint::Length(1), // feedback
                    Constraint::Length(1), // last heard
                    Constraint::Length(1), // padding
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        let (position, total) = self.progress();
        Paragraph::new(Span::styled(
            format!("Slovo {position} z {total}"),
            dim,
        ))
        .alignment(Alignment::Right)
        .render(chunks[0], buf);

        if !self.speech_supported() {
            Paragraph::new(Span::styled(
                "Rozpoznávání hlasu není k dispozici.",
                Style::default().fg(Color::Red).patch(bold),
            ))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
            return;
        }

        // Spacing the letters out reads larger on a terminal cell grid
        let spread: String = Itertools::intersperse(
            self.display_word().chars().map(|c| c.to_string()),
            " ".to_string(),
        )
        .collect();
        let word_area = centered_line(chunks[1]);
        Paragraph::new(Span::styled(
            spread,
            bold.fg(match self.feedback() {
                Feedback::Success => Color::Green,
                Feedback::Error => Color::Red,
                _ => Color::White,
            }),
        ))
        .alignment(Alignment::Center)
        .render(word_area, buf);

        let feedback_span = match self.feedback() {
            Feedback::Idle => Span::styled("Stiskni mezerník, až budeš číst", Style::default().fg(Color::Yellow)),
            Feedback::Listening => Span::styled("Poslouchám…", Style::default().fg(Color::Green)),
            Feedback::Processing => Span::styled("Přemýšlím…", Style::default().fg(Color::Cyan)),
            Feedback::Success => Span::styled(
                self.celebration.praise,
                Style::default().fg(Color::Green).patch(bold),
            ),
            Feedback::Error => Span::styled(
                "Něco se pokazilo, zkus to znovu",
                Style::default().fg(Color::Red),
            ),
        };
        Paragraph::new(feedback_span)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        if !self.last_heard().is_empty() && self.feedback() != Feedback::Success {
            Paragraph::new(Span::styled(
                format!("Slyším: \"{}\"", self.last_heard()),
                dim.add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled(
            "(mezerník) mluv/stop  (→) přeskočit  (esc) ukončit  |  piš, co dítě přečetlo, a potvrď enterem",
            dim,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        if self.celebration.is_active {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

/// Middle row of a taller area, for vertically centering one line
fn centered_line(area: Rect) -> Rect {
    let offset = area.height / 2;
    Rect {
        x: area.x,
        y: area.y + offset,
        width: area.width,
        height: 1,
    }
}

/// Finished-game screen fed by the recorded results
pub struct SummaryScreen {
    summary: SessionSummary,
}

impl SummaryScreen {
    pub fn new(summary: SessionSummary) -> Self {
        Self { summary }
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }
}

impl Widget for &SummaryScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let gold = Style::default().fg(Color::Yellow).patch(bold);

        let summary = &self.summary;
        let table_rows = summary.total() as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(1)
            .constraints(
                [
                    Constraint::Length(2),              // title
                    Constraint::Length(2),              // stars
                    Constraint::Length(2),              // score
                    Constraint::Length(2),              // mistakes
                    Constraint::Length(table_rows + 1), // detail table
                    Constraint::Min(1),                 // legend
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(Span::styled("Konec hry!", bold))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let stars: String = (0..3usize)
            .map(|i| if i < summary.stars() { "★ " } else { "☆ " })
            .collect();
        Paragraph::new(Span::styled(stars.trim_end().to_string(), gold))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let mut score = format!(
            "Přečteno: {} z {}",
            summary.correct_count(),
            summary.total()
        );
        if let Some(avg) = summary.average_reading_time() {
            score.push_str(&format!("   (průměrně {avg:.0} s na slovo)"));
        }
        Paragraph::new(Span::styled(score, bold))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let missed = summary.missed_words();
        let mistakes_line = if missed.is_empty() {
            Span::styled(
                "Fantastická práce! Všechno správně.",
                Style::default().fg(Color::Green).patch(bold),
            )
        } else {
            Span::styled(
                format!("Slova k procvičení: {}", missed.join(", ")),
                Style::default().fg(Color::Red),
            )
        };
        Paragraph::new(mistakes_line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let word_width = summary
            .results()
            .iter()
            .map(|r| r.word.width())
            .max()
            .unwrap_or(0);
        let table_lines: Vec<Line> = summary
            .results()
            .iter()
            .map(|result| {
                let mark = if result.success { "✓" } else { "✗" };
                let mark_style = if result.success {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                };
                let padding = " ".repeat(word_width - result.word.width());
                Line::from(vec![
                    Span::styled(mark.to_string(), mark_style),
                    Span::raw(format!(" {}{padding}", result.word)),
                    Span::styled(format!("  {:>3} s", result.reading_time), dim),
                ])
            })
            .collect();
        Paragraph::new(table_lines)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        Paragraph::new(Span::styled(
            "(q) rychlý test  (n) nová hra  (esc) konec",
            dim,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
    }
}

/// Overlay the confetti burst on top of the game screen
fn render_celebration_particles(
    celebration: &crate::celebration::CelebrationAnimation,
    area: Rect,
    buf: &mut Buffer,
) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];
            let alpha = 1.0 - (particle.age / particle.max_age);

            let style = if alpha > 0.6 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AttemptResult;
    use crate::speech::{RecordingSynthesizer, ScriptedRecognizer};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup_screen() -> SetupScreen {
        SetupScreen::new(Catalog::czech(), &Settings::default())
    }

    #[test]
    fn test_setup_default_has_words() {
        let screen = setup_screen();
        assert!(screen.available_count() > 0);
    }

    #[test]
    fn test_setup_toggle_letter_changes_count() {
        let mut screen = setup_screen();
        let before = screen.available_count();

        // cursor starts on "A"; dropping it shrinks the pool
        assert_eq!(screen.on_key(key(KeyCode::Char(' '))), SetupAction::None);
        assert!(screen.available_count() < before);
    }

    #[test]
    fn test_setup_select_all_letters() {
        let mut screen = setup_screen();
        screen.on_key(key(KeyCode::Char('a')));

        let settings = screen.settings();
        assert_eq!(settings.allowed_letters.len(), CZECH_ALPHABET.len());
        assert_eq!(screen.available_count(), Catalog::czech().len());
    }

    #[test]
    fn test_setup_cannot_drop_last_category() {
        let mut screen = setup_screen();
        screen.on_key(key(KeyCode::Tab)); // focus categories

        // drop three of the four
        for _ in 0..3 {
            screen.on_key(key(KeyCode::Char(' ')));
            screen.on_key(key(KeyCode::Right));
        }
        assert_eq!(screen.settings().allowed_categories.len(), 1);

        // the last one refuses to go
        screen.on_key(key(KeyCode::Char(' ')));
        assert_eq!(screen.settings().allowed_categories.len(), 1);
    }

    #[test]
    fn test_setup_start_with_empty_pool_refused() {
        let mut screen = setup_screen();
        screen.on_key(key(KeyCode::Char('a'))); // select all
        screen.on_key(key(KeyCode::Char('a'))); // deselect all
        assert_eq!(screen.available_count(), 0);

        assert_eq!(screen.on_key(key(KeyCode::Enter)), SetupAction::None);
    }

    #[test]
    fn test_setup_start_returns_settings() {
        let mut screen = setup_screen();
        match screen.on_key(key(KeyCode::Enter)) {
            SetupAction::Start(settings) => {
                assert_eq!(settings.word_count, 10);
                assert!(settings.uppercase_only);
            }
            other => panic!("expected Start, got {other:?}"),
        }
    }

    #[test]
    fn test_setup_word_count_cycling() {
        let mut screen = setup_screen();
        screen.on_key(key(KeyCode::Tab));
        screen.on_key(key(KeyCode::Tab)); // focus count

        screen.on_key(key(KeyCode::Right));
        assert_eq!(screen.settings().word_count, 15);
        screen.on_key(key(KeyCode::Left));
        screen.on_key(key(KeyCode::Left));
        assert_eq!(screen.settings().word_count, 5);
    }

    #[test]
    fn test_setup_custom_word_count_kept() {
        let mut settings = Settings::default();
        settings.word_count = 7;
        let screen = SetupScreen::new(Catalog::czech(), &settings);
        assert_eq!(screen.settings().word_count, 7);
    }

    #[test]
    fn test_setup_uppercase_toggle() {
        let mut screen = setup_screen();
        for _ in 0..3 {
            screen.on_key(key(KeyCode::Tab));
        }
        screen.on_key(key(KeyCode::Char(' ')));
        assert!(!screen.settings().uppercase_only);
    }

    #[test]
    fn test_setup_escape_quits() {
        let mut screen = setup_screen();
        assert_eq!(screen.on_key(key(KeyCode::Esc)), SetupAction::Quit);
    }

    #[test]
    fn test_setup_renders_without_panic() {
        let screen = setup_screen();
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        (&screen).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Dostupných"));
    }

    #[test]
    fn test_game_screen_renders_word() {
        let (recognizer, _tx) = ScriptedRecognizer::new();
        let game = Game::new(
            vec!["Máma".to_string()],
            true,
            Some(Box::new(recognizer)),
            Box::new(RecordingSynthesizer::default()),
        );

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&game).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains('M'));
        assert!(content.contains("Slovo 1 z 1"));
    }

    #[test]
    fn test_game_screen_unsupported_notice() {
        let game = Game::new(
            vec!["Máma".to_string()],
            false,
            None,
            Box::new(RecordingSynthesizer::default()),
        );

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&game).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("není k dispozici"));
    }

    #[test]
    fn test_summary_renders_stars_and_table() {
        let summary = SessionSummary::new(vec![
            AttemptResult {
                word: "Máma".to_string(),
                success: true,
                attempts: 1,
                reading_time: 2,
            },
            AttemptResult {
                word: "Kolo".to_string(),
                success: false,
                attempts: 0,
                reading_time: 4,
            },
        ]);
        let screen = SummaryScreen::new(summary);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&screen).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains('★'));
        assert!(content.contains("Kolo"));
        assert!(content.contains("procvičení"));
    }
}

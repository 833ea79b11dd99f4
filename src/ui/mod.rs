use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::{
    config::{self, InteractionMode, Settings},
    core::{Event, Session},
    render::FrameBuffer,
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub fn run(settings: &Settings) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, settings);
    shutdown_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Term, settings: &Settings) -> Result<()> {
    let started = Instant::now();
    let mut session = Session::new(settings, 0.0);
    let mut ui_state = UiState::new(settings.radius);
    ui_state.absorb(session.drain_events());
    ui_state.distinct_word_count = session.stats().distinct_word_count;

    let frame_interval = settings.frame_interval();
    let mut last_frame: Option<Instant> = None;
    let mut frame_counter = 0_u32;
    let mut last_fps_sample = Instant::now();
    let mut fps = 0.0_f32;

    loop {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Backspace => {
                        ui_state.input.pop();
                    }
                    KeyCode::Enter => {
                        session.add_word(&ui_state.input);
                        ui_state.input.clear();
                    }
                    KeyCode::Char(ch) => {
                        if !ch.is_control()
                            && ui_state.input.chars().count() < config::INPUT_MAX_CHARS
                        {
                            ui_state.input.push(ch);
                        }
                    }
                    _ => {}
                },
                CrosstermEvent::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        match ui_state.pointer_pixel(mouse.column, mouse.row) {
                            Some((x, y)) => session.set_pointer_position(x, y),
                            None => session.clear_pointer(),
                        }
                    }
                    _ => {}
                },
                CrosstermEvent::FocusLost => session.clear_pointer(),
                _ => {}
            }
        }
        ui_state.absorb(session.drain_events());

        if last_frame.is_none_or(|at| at.elapsed() >= frame_interval) {
            let area = terminal.size()?;
            let chunks = split(area);
            let inner = Block::default().borders(Borders::ALL).inner(chunks[1]);
            if ui_state.ensure_viewport(inner) {
                let size = ui_state.framebuf.pixel_size();
                session.set_viewport_size(size.x, size.y);
            }

            let now_ms = started.elapsed().as_secs_f64() * 1000.0;
            session.tick(now_ms, &mut ui_state.framebuf);

            if last_fps_sample.elapsed() >= Duration::from_secs(1) {
                fps = frame_counter as f32 / last_fps_sample.elapsed().as_secs_f32();
                frame_counter = 0;
                last_fps_sample = Instant::now();
            }

            let mode = match session.mode() {
                InteractionMode::HoverPause => "hover-pause",
                InteractionMode::PointerRotate => "pointer-rotate",
            };
            let blend = session.rotation().hover_blend();
            let top = top_word(&session);
            terminal.draw(|frame| {
                let header = Paragraph::new(format!(
                    "words: {} | layout: {} pts | top: {} | mode: {} | drift: {:.0}% | fps: {:.1}",
                    ui_state.distinct_word_count,
                    ui_state.layout_points,
                    top,
                    mode,
                    blend * 100.0,
                    fps
                ))
                .block(Block::default().borders(Borders::ALL).title("wordsphere"));
                frame.render_widget(header, chunks[0]);

                let viewport = Paragraph::new(ui_state.lines())
                    .block(Block::default().borders(Borders::ALL).title("Sphere"));
                frame.render_widget(viewport, chunks[1]);

                let footer = Paragraph::new(format!(
                    "input: {} | Enter: add word | mouse over sphere: pause | Esc: quit",
                    ui_state.input
                ))
                .block(Block::default().borders(Borders::ALL).title("Controls"));
                frame.render_widget(footer, chunks[2]);
            })?;

            last_frame = Some(Instant::now());
            frame_counter += 1;
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn top_word(session: &Session) -> String {
    session
        .words()
        .iter()
        .filter_map(|w| session.frequency(&w.text).map(|f| (f, w)))
        .max_by_key(|(f, w)| (*f, std::cmp::Reverse(w.insertion_index)))
        .map(|(f, w)| format!("{} x{}", w.text, f))
        .unwrap_or_else(|| "-".to_string())
}

fn split(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

fn shutdown_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

struct UiState {
    radius: f32,
    viewport: Rect,
    framebuf: FrameBuffer,
    input: String,
    distinct_word_count: usize,
    layout_points: usize,
}

impl UiState {
    fn new(radius: f32) -> Self {
        Self {
            radius,
            viewport: Rect::default(),
            framebuf: FrameBuffer::new(0, 0),
            input: String::new(),
            distinct_word_count: 0,
            layout_points: 0,
        }
    }

    fn absorb(&mut self, events: Vec<Event>) {
        for event in events {
            match event {
                Event::StatsChanged {
                    distinct_word_count,
                } => self.distinct_word_count = distinct_word_count,
                Event::LayoutRecomputed { count } => self.layout_points = count,
            }
        }
    }

    /// Returns true when the sphere area changed size.
    fn ensure_viewport(&mut self, area: Rect) -> bool {
        if self.viewport == area {
            return false;
        }
        self.viewport = area;
        self.framebuf.resize(area.width, area.height);
        self.framebuf.fit_sphere(self.radius);
        true
    }

    /// Terminal cell to sphere-plane pixel; `None` outside the sphere area.
    fn pointer_pixel(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let area = self.viewport;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        let p = self.framebuf.cell_to_pixel(column - area.x, row - area.y);
        Some((p.x, p.y))
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let framebuf = &self.framebuf;
        (0..framebuf.height())
            .map(|y| {
                // the right half of a wide glyph is already covered by its left half
                let spans: Vec<Span> = (0..framebuf.width())
                    .map(|x| framebuf.get(x, y))
                    .filter(|cell| !cell.is_continuation())
                    .map(|cell| {
                        let (r, g, b) = cell.rgb;
                        let mut style = Style::default().fg(Color::Rgb(r, g, b));
                        if cell.bold {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        Span::styled(cell.ch.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_viewport() -> UiState {
        let mut state = UiState::new(config::SPHERE_RADIUS);
        assert!(state.ensure_viewport(Rect::new(1, 4, 80, 20)));
        state
    }

    mod ensure_viewport {
        use super::*;

        #[test]
        fn unchanged_area_is_not_resized() {
            let mut state = state_with_viewport();
            assert!(!state.ensure_viewport(Rect::new(1, 4, 80, 20)));
            assert!(state.ensure_viewport(Rect::new(1, 4, 60, 20)));
            assert_eq!(state.framebuf.width(), 60);
        }
    }

    mod pointer_pixel {
        use super::*;

        #[test]
        fn outside_sphere_area_is_none() {
            let state = state_with_viewport();
            assert_eq!(state.pointer_pixel(0, 10), None);
            assert_eq!(state.pointer_pixel(10, 3), None);
            assert_eq!(state.pointer_pixel(81, 10), None);
            assert_eq!(state.pointer_pixel(10, 24), None);
        }

        #[test]
        fn top_left_cell_maps_near_origin() {
            let state = state_with_viewport();
            let (x, y) = state.pointer_pixel(1, 4).unwrap();
            let expected = state.framebuf.cell_to_pixel(0, 0);
            assert_eq!((x, y), (expected.x, expected.y));
        }
    }

    mod absorb {
        use super::*;

        #[test]
        fn keeps_latest_counts() {
            let mut state = UiState::new(config::SPHERE_RADIUS);
            state.absorb(vec![
                Event::LayoutRecomputed { count: 2 },
                Event::StatsChanged {
                    distinct_word_count: 2,
                },
                Event::LayoutRecomputed { count: 3 },
            ]);
            assert_eq!(state.layout_points, 3);
            assert_eq!(state.distinct_word_count, 2);
        }
    }

    mod lines {
        use super::*;

        #[test]
        fn wide_words_keep_rows_at_viewport_width() {
            let mut state = state_with_viewport();
            let settings = Settings {
                seed_samples: false,
                rng_seed: Some(3),
                ..Settings::default()
            };
            let mut session = Session::new(&settings, 0.0);
            let size = state.framebuf.pixel_size();
            session.set_viewport_size(size.x, size.y);
            for w in ["梦想", "希望", "勇气", "爱", "自由", "mixed词"] {
                session.add_word(w);
            }
            session.tick(0.0, &mut state.framebuf);

            let lines = state.lines();
            assert_eq!(lines.len(), 20);
            for line in &lines {
                assert_eq!(line.width(), 80);
            }
            let drawn: String = lines
                .iter()
                .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
                .collect();
            assert!(drawn.contains('梦') || drawn.contains('希'));
        }
    }

    mod top_word {
        use super::*;

        #[test]
        fn picks_most_frequent_earliest_word() {
            let settings = Settings {
                seed_samples: false,
                rng_seed: Some(1),
                ..Settings::default()
            };
            let mut session = Session::new(&settings, 0.0);
            assert_eq!(top_word(&session), "-");
            for w in ["b", "a", "a", "b", "c"] {
                session.add_word(w);
            }
            assert_eq!(top_word(&session), "b x2");
        }
    }
}

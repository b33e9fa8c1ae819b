//! App: terminal init, main loop, screen flow, key and mouse handling.

use crate::GameConfig;
use crate::arena::{Arena, Phase, Signal, Verdict};
use crate::highscores;
use crate::input::{Action, Gesture, key_to_action, mouse_to_gesture};
use crate::score::Scoreboard;
use crate::theme::Theme;
use crate::ui::{self, ArenaLayout, Cue, Effects, View};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Position;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Upper bound on time between redraws; the arena's own tickers may wake us sooner.
const FRAME: Duration = Duration::from_millis(16);
const NOTICE_MS: u64 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    /// Sentence accepted; waiting for the player before the next level.
    LevelCleared,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::MainMenu,
            Self::MainMenu => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::MainMenu => Self::Resume,
            Self::Exit => Self::MainMenu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    StackOverflow,
    AllCleared,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    arena: Arena,
    board: Scoreboard,
    screen: Screen,
    menu_level: usize,
    quit_selected: QuitOption,
    end: Option<GameOverReason>,
    best: u32,
    new_best: bool,
    data_dir: PathBuf,
    effects: Effects,
    /// Layout from the last frame, for mapping mouse cells to arena points.
    layout: ArenaLayout,
    notice: Option<(&'static str, Instant)>,
    exit: bool,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let data_dir = highscores::config_dir();
        let best = highscores::load_best(&data_dir);
        let start = config.start_level;
        Self {
            arena: Arena::new(config.arena_config(start)),
            board: Scoreboard::new(start),
            screen: Screen::Menu,
            menu_level: start,
            quit_selected: QuitOption::Resume,
            end: None,
            best,
            new_best: false,
            data_dir,
            effects: Effects::new(config.no_animation),
            layout: ArenaLayout::default(),
            notice: None,
            exit: false,
            config,
            theme,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        if self.config.no_menu {
            self.new_run(self.config.start_level, Instant::now());
        }
        let result = self.run_loop(&mut terminal);

        self.arena.stop();
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let now = Instant::now();
            self.arena.poll(now);
            self.process_signals();
            if self.notice.is_some_and(|(_, at)| now.duration_since(at) > Duration::from_millis(NOTICE_MS)) {
                self.notice = None;
            }

            let snapshot = self.arena.snapshot();
            let view = View {
                screen: self.screen,
                snapshot: &snapshot,
                board: &self.board,
                levels: &self.config.levels,
                theme: &self.theme,
                best: self.best,
                new_best: self.new_best,
                end: self.end,
                quit_selected: self.quit_selected,
                menu_level: self.menu_level,
                notice: self.notice.map(|(n, _)| n),
            };
            let effects = &mut self.effects;
            let mut layout = self.layout;
            terminal.draw(|f| layout = ui::draw(f, &view, effects, now))?;
            self.layout = layout;

            let timeout = self.arena.next_due(Instant::now()).map_or(FRAME, |due| due.min(FRAME));
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.handle_action(key_to_action(key), Instant::now());
                        }
                        Event::Mouse(mouse) => {
                            if let Some(gesture) = mouse_to_gesture(mouse) {
                                self.handle_gesture(gesture, Instant::now());
                            }
                        }
                        _ => {}
                    }
                    if self.exit {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fresh run from `level`: score, combo and arena all reset.
    fn new_run(&mut self, level: usize, now: Instant) {
        self.board = Scoreboard::new(level);
        self.end = None;
        self.new_best = false;
        log::info!("new run from level {}", level + 1);
        self.start_level(now);
    }

    /// Replaces the arena with a fresh one for the scoreboard's current level.
    fn start_level(&mut self, now: Instant) {
        self.arena.stop();
        self.arena = Arena::new(self.config.arena_config(self.board.level));
        self.arena.start(now);
        self.effects.reset();
        self.notice = None;
        self.screen = Screen::Playing;
    }

    fn process_signals(&mut self) {
        for signal in self.arena.take_signals() {
            self.board.on_signal(signal);
            match signal {
                Signal::LevelAdvance => {
                    self.arena.cancel_gesture();
                    self.effects.cue(Cue::Cleared);
                    if self.board.level + 1 >= self.config.levels.len() {
                        self.finish(GameOverReason::AllCleared);
                    } else {
                        self.screen = Screen::LevelCleared;
                    }
                }
                Signal::Rejected => self.effects.cue(Cue::Rejected),
                Signal::ArenaFailed => {
                    self.arena.cancel_gesture();
                    self.finish(GameOverReason::StackOverflow);
                }
                Signal::NotReady => self.notice = Some(("Fill every slot before submitting", Instant::now())),
                Signal::Landed(_) => {}
            }
        }
    }

    fn finish(&mut self, reason: GameOverReason) {
        log::info!(
            "run over ({reason:?}): score {}, {} sentences, {} fragments left in the arena",
            self.board.score,
            self.board.sentences_cleared,
            self.arena.fragment_count()
        );
        self.end = Some(reason);
        self.screen = Screen::GameOver;
        if self.board.score > self.best {
            self.best = self.board.score;
            self.new_best = true;
            if let Err(e) = highscores::save_best(&self.data_dir, self.best) {
                log::warn!("could not save best score: {e:#}");
            }
        }
    }

    fn submit(&mut self) {
        let verdict = self.arena.submit();
        log::debug!("submit: {verdict:?}");
        if verdict != Verdict::NotReady {
            self.notice = None;
        }
    }

    fn open_quit_menu(&mut self) {
        // The mouse-up for a drag in progress never reaches a menu screen.
        self.arena.cancel_gesture();
        self.arena.pause();
        self.quit_selected = QuitOption::Resume;
        self.screen = Screen::QuitMenu;
    }

    fn handle_action(&mut self, action: Action, now: Instant) {
        match self.screen {
            Screen::Menu => match action {
                Action::Up => self.menu_level = self.menu_level.saturating_sub(1),
                Action::Down => self.menu_level = (self.menu_level + 1).min(self.config.levels.len() - 1),
                Action::Submit => self.new_run(self.menu_level, now),
                Action::Quit | Action::Cancel => self.exit = true,
                _ => {}
            },
            Screen::Playing if self.arena.phase() == Phase::Paused => match action {
                Action::Pause | Action::Submit => self.arena.resume(now),
                Action::Quit | Action::Cancel => self.open_quit_menu(),
                _ => {}
            },
            Screen::Playing => match action {
                Action::Submit => self.submit(),
                Action::Cancel => {
                    if self.arena.cancel_gesture().is_none() {
                        self.open_quit_menu();
                    }
                }
                Action::Pause => self.arena.pause(),
                Action::Quit => self.open_quit_menu(),
                _ => {}
            },
            Screen::LevelCleared => match action {
                Action::Submit => {
                    if self.board.advance(self.config.levels.len()) {
                        log::info!("advancing to level {}", self.board.level + 1);
                        self.start_level(now);
                    }
                }
                Action::Quit => self.exit = true,
                _ => {}
            },
            Screen::GameOver => match action {
                Action::Restart => self.new_run(self.menu_level, now),
                Action::Submit => self.screen = Screen::Menu,
                Action::Quit | Action::Cancel => self.exit = true,
                _ => {}
            },
            Screen::QuitMenu => match action {
                Action::Down => self.quit_selected = self.quit_selected.next(),
                Action::Up => self.quit_selected = self.quit_selected.prev(),
                Action::Submit => match self.quit_selected {
                    QuitOption::Resume => {
                        self.screen = Screen::Playing;
                        self.arena.resume(now);
                    }
                    QuitOption::MainMenu => {
                        self.arena.stop();
                        self.screen = Screen::Menu;
                    }
                    QuitOption::Exit => self.exit = true,
                },
                Action::Pause | Action::Quit | Action::Cancel => {
                    self.screen = Screen::Playing;
                    self.arena.resume(now);
                }
                _ => {}
            },
        }
    }

    fn handle_gesture(&mut self, gesture: Gesture, now: Instant) {
        if self.screen != Screen::Playing {
            return;
        }
        let geometry = *self.arena.geometry();
        match gesture {
            Gesture::Press { column, row } => {
                if self.arena.phase() == Phase::Paused {
                    self.arena.resume(now);
                } else if self.layout.submit.contains(Position::new(column, row)) {
                    self.submit();
                } else {
                    let point = self.layout.to_point(column, row, &geometry);
                    self.arena.pick_up(point);
                }
            }
            Gesture::Drag { column, row } => {
                self.arena.drag(self.layout.to_point(column, row, &geometry));
            }
            Gesture::Release { column, row } => {
                if self.arena.held().is_some() {
                    self.arena.release(self.layout.to_point(column, row, &geometry));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{FragmentState, Point};
    use crate::levels;

    fn app() -> App {
        let config = GameConfig {
            levels: levels::builtin(),
            start_level: 0,
            difficulty: None,
            columns: 4,
            tick_ms: 50,
            // One tick carries a spawned fragment straight to the floor.
            fall_speed: Some(100_000),
            spawn_ms: None,
            seed: 3,
            decoys: false,
            no_menu: true,
            no_animation: true,
        };
        App::new(config, Theme::default())
    }

    /// Picks up the first piled fragment, wherever the spawner put it.
    fn hold_piled(app: &mut App) {
        app.arena.tick();
        let snapshot = app.arena.snapshot();
        let g = snapshot.geometry;
        let columns = snapshot.column_heights.len() as f32;
        let column = snapshot
            .fragments
            .iter()
            .find_map(|f| match f.state {
                FragmentState::Piled { column, .. } => Some(column),
                _ => None,
            })
            .unwrap();
        let point = Point::new(
            (column as f32 + 0.5) * 100.0 / columns,
            g.height as f32 - g.fragment_height as f32 / 2.0,
        );
        assert!(app.arena.pick_up(point).is_some());
    }

    #[test]
    fn test_quit_menu_drops_held_fragment() {
        let mut app = app();
        let now = Instant::now();
        app.new_run(0, now);
        hold_piled(&mut app);

        app.handle_action(Action::Quit, now);
        assert_eq!(app.screen, Screen::QuitMenu);
        assert!(app.arena.held().is_none());

        app.handle_action(Action::Submit, now);
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.arena.phase(), Phase::Running);
        assert!(app.arena.held().is_none());
        assert_eq!(app.arena.fragment_count(), 1);
    }

    #[test]
    fn test_level_change_resets_combo() {
        let mut app = app();
        app.new_run(0, Instant::now());
        app.board.combo = 3;
        app.screen = Screen::LevelCleared;
        app.handle_action(Action::Submit, Instant::now());
        assert_eq!(app.board.level, 1);
        assert_eq!(app.board.combo, 0);
        assert_eq!(app.screen, Screen::Playing);
    }
}

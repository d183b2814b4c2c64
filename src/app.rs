//! Application state management for Seoul Walk Finder
//!
//! This module contains the interactive view state: which selector has
//! focus, the district cursor, and the help overlay. Key presses that move
//! a selector are forwarded to the [`TrailFinder`] mutators.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::warn;

use crate::data::districts::position_of;
use crate::data::{District, Level};
use crate::finder::TrailFinder;

/// Selector that currently receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Course level tabs
    Level,
    /// District list
    District,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Focus::Level => Focus::District,
            Focus::District => Focus::Level,
        }
    }
}

/// Main application struct managing view state and the finder
pub struct App {
    /// Query state container
    pub finder: TrailFinder,
    /// Selectable districts
    pub districts: Vec<District>,
    /// Index of the highlighted district
    pub district_index: usize,
    /// Selector receiving navigation keys
    pub focus: Focus,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
}

impl App {
    /// Creates a new App around a finder and the district table
    ///
    /// The district cursor starts on the finder's selected district.
    pub fn new(finder: TrailFinder, districts: Vec<District>) -> Self {
        let district_index = position_of(&districts, finder.selection().district()).unwrap_or(0);
        Self {
            finder,
            districts,
            district_index,
            focus: Focus::District,
            show_help: false,
            should_quit: false,
        }
    }

    /// Issues the initial query
    pub fn start(&mut self) {
        self.finder.start();
    }

    /// Applies finished queries; called once per frame
    pub fn tick(&mut self) {
        self.finder.poll_outcomes();
    }

    /// The highlighted district, if the table is non-empty
    pub fn highlighted_district(&self) -> Option<&District> {
        self.districts.get(self.district_index)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `Tab`: Switch focus between level and district
    /// - `←`/`h`, `→`/`l`: Previous/next level (level focus)
    /// - `1`-`3`: Pick a level directly
    /// - `↑`/`k`, `↓`/`j`: Previous/next district (district focus)
    /// - `g`/`G`: First/last district (district focus)
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggle();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('1') => self.select_level(Level::Beginner),
            KeyCode::Char('2') => self.select_level(Level::Intermediate),
            KeyCode::Char('3') => self.select_level(Level::Advanced),
            code => match self.focus {
                Focus::Level => match code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        let level = self.finder.selection().level.previous();
                        self.select_level(level);
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        let level = self.finder.selection().level.next();
                        self.select_level(level);
                    }
                    _ => {}
                },
                Focus::District => match code {
                    KeyCode::Up | KeyCode::Char('k') => self.move_district_up(),
                    KeyCode::Down | KeyCode::Char('j') => self.move_district_down(),
                    KeyCode::Char('g') => self.select_district(0),
                    KeyCode::Char('G') => {
                        self.select_district(self.districts.len().saturating_sub(1));
                    }
                    _ => {}
                },
            },
        }
    }

    fn select_level(&mut self, level: Level) {
        self.finder.set_level(level);
    }

    /// Moves the district cursor up, wrapping to bottom if at top
    fn move_district_up(&mut self) {
        let count = self.districts.len();
        if count == 0 {
            return;
        }
        let index = if self.district_index == 0 {
            count - 1
        } else {
            self.district_index - 1
        };
        self.select_district(index);
    }

    /// Moves the district cursor down, wrapping to top if at bottom
    fn move_district_down(&mut self) {
        let count = self.districts.len();
        if count == 0 {
            return;
        }
        self.select_district((self.district_index + 1) % count);
    }

    /// Highlights a district and makes it the selected one
    fn select_district(&mut self, index: usize) {
        let Some(district) = self.districts.get(index) else {
            return;
        };
        self.district_index = index;
        if let Err(err) = self.finder.set_district(&district.value) {
            warn!(error = %err, district = %district.label, "ignoring district");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::trails::test_server::closed_base_url;
    use crate::data::{default_districts, Selection, TrailsClient};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn test_app() -> App {
        let finder = TrailFinder::new(
            TrailsClient::with_base_url(closed_base_url().await, "test-key"),
            Selection::default(),
        );
        App::new(finder, default_districts().unwrap())
    }

    #[tokio::test]
    async fn test_cursor_starts_on_selected_district() {
        let app = test_app().await;
        assert_eq!(app.highlighted_district().unwrap().value, "중구");
        assert_eq!(app.focus, Focus::District);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = test_app().await;
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = test_app().await;
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_district_navigation_updates_selection() {
        let mut app = test_app().await;
        let start = app.district_index;

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.district_index, start + 1);
        assert_eq!(
            app.finder.selection().district(),
            app.districts[start + 1].value
        );
        assert_eq!(app.finder.generation(), 1);

        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.finder.selection().district(), "중구");
        assert_eq!(app.finder.generation(), 2);
    }

    #[tokio::test]
    async fn test_district_navigation_wraps() {
        let mut app = test_app().await;
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.district_index, 0);

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.district_index, app.districts.len() - 1);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.district_index, 0);
    }

    #[tokio::test]
    async fn test_level_keys_need_level_focus() {
        let mut app = test_app().await;

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.finder.selection().level, Level::Beginner);
        assert_eq!(app.finder.generation(), 0);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Level);

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.finder.selection().level, Level::Intermediate);

        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.finder.selection().level, Level::Advanced);
    }

    #[tokio::test]
    async fn test_number_keys_pick_level() {
        let mut app = test_app().await;
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.finder.selection().level, Level::Advanced);

        // Same level again does not start another query
        let generation = app.finder.generation();
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.finder.generation(), generation);
    }

    #[tokio::test]
    async fn test_help_overlay_intercepts_keys() {
        let mut app = test_app().await;
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.finder.generation(), 0);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}

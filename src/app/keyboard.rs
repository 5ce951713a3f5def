//! Keyboard input handling

use super::{navigation, operations, App, Pane};
use crate::reaction::Reaction;
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

impl App {
    /// Handle keyboard input
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        // Handle Ctrl+C always
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.show_help {
            // Any key closes help
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Tab | KeyCode::Char('h' | 'l') | KeyCode::Left | KeyCode::Right => {
                self.pane = match self.pane {
                    Pane::Notifications => Pane::Discussions,
                    Pane::Discussions => Pane::Notifications,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Enter | KeyCode::Char('o') => navigation::open_selected(self),
            KeyCode::Char('m') => {
                if let Some(id) = self.selected_notification_id() {
                    self.notifier.mark_as_read(id);
                }
            }
            KeyCode::Char('M') => {
                let issued = self.notifier.mark_all_visible_as_read();
                if issued > 0 {
                    self.show_status(&format!("Marking {issued} notifications read"));
                }
            }
            KeyCode::Char('r') => {
                self.notifier.load_notifications();
                self.notifier.check_for_updates();
                self.notifier.surface_mut().dismiss_alert();
                self.show_status("Refreshing");
            }
            KeyCode::Char('x') => {
                self.notifier.surface_mut().dismiss_alert();
            }
            KeyCode::Char('+') => operations::react_selected(self, Reaction::Like),
            KeyCode::Char('-') => operations::react_selected(self, Reaction::Dislike),
            KeyCode::Char('s') => navigation::share_selected(self),
            KeyCode::Char('?' | 'H') => self.show_help = true,
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let surface = self.notifier.surface();
        let (cursor, len) = match self.pane {
            Pane::Notifications => (
                &mut self.selected_notification,
                surface.panel().map_or(0, <[_]>::len),
            ),
            Pane::Discussions => (&mut self.selected_discussion, surface.recent().len()),
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Id of the notification under the cursor
    pub fn selected_notification_id(&self) -> Option<u64> {
        self.notifier
            .surface()
            .panel()?
            .get(self.selected_notification)
            .map(|row| row.id)
    }
}

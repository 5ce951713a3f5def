//! UI rendering module for the Marquee TUI
//!
//! Layout:
//! - Header: window title, unread badge, followed context, polling state
//! - Body: unread notifications (left) and recent discussions (right)
//! - Footer: key hints or the current status message
//!
//! The new-discussions alert floats over the top-right corner.

mod helpers;

use crate::app::{App, Pane};
use crate::config::colors;
use crate::event::Visibility;
use crate::models::RecentDiscussion;
use crate::reaction::Reaction;
use crate::view::NotificationView;
pub use helpers::truncate;
use helpers::{centered_rect, top_right_rect};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Main render function
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Lists
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_notifications(f, body[0], app);
    render_discussions(f, body[1], app);
    render_footer(f, chunks[2], app);

    if app.notifier.surface().alert().is_some() {
        render_alert(f, app);
    }

    if app.show_help {
        render_help(f);
    }
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        colors::HIGHLIGHT
    } else {
        colors::BORDER
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let surface = app.notifier.surface();
    let state = app.notifier.state();

    let mut spans = vec![Span::styled(
        surface.title().to_string(),
        Style::default().fg(colors::FG).add_modifier(Modifier::BOLD),
    )];

    if let Some(text) = surface
        .badge()
        .filter(|b| b.is_visible())
        .and_then(|b| b.text())
    {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {text} "),
            Style::default()
                .fg(colors::BG)
                .bg(colors::ALERT)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let polling = match (state.is_active, app.notifier.visibility()) {
        (true, _) => "polling",
        (false, Visibility::Hidden) => "paused (unfocused)",
        (false, Visibility::Visible) => "stopped",
    };
    spans.push(Span::styled(
        format!(
            "  {} · {} · since {}",
            app.notifier.context(),
            polling,
            state.last_checked_at.format("%H:%M:%S")
        ),
        Style::default().fg(colors::MUTED),
    ));

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::BORDER))
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, area);
}

fn render_notifications(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.pane == Pane::Notifications;
    let Some(rows) = app.notifier.surface().panel() else {
        let placeholder = Paragraph::new("Notification panel disabled")
            .style(Style::default().fg(colors::MUTED))
            .alignment(Alignment::Center)
            .block(panel_block(" Notifications ".to_string(), focused));
        f.render_widget(placeholder, area);
        return;
    };

    let block = panel_block(
        format!(" Notifications ({}) ", app.notifier.state().unread_count),
        focused,
    );

    if rows.is_empty() {
        let empty = Paragraph::new("No new notifications")
            .style(Style::default().fg(colors::MUTED))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = rows.iter().map(|row| notification_item(row, width)).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(colors::BG_LIGHT))
        .highlight_symbol("▶ ");
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_notification));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn notification_item(row: &NotificationView, width: usize) -> ListItem<'static> {
    let name_style = if row.unread {
        Style::default().fg(colors::FG).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::MUTED)
    };
    let marker = if row.unread { "● " } else { "  " };

    let first = Line::from(vec![
        Span::styled(marker, Style::default().fg(colors::ACCENT)),
        Span::styled(row.headline.clone(), name_style),
        Span::raw(" "),
        Span::styled(
            truncate(&row.message, width.saturating_sub(row.headline.len() + 3)),
            Style::default().fg(if row.unread { colors::FG } else { colors::MUTED }),
        ),
    ]);
    let second = Line::from(Span::styled(
        format!("  {}", row.age),
        Style::default().fg(colors::MUTED),
    ));
    ListItem::new(vec![first, second])
}

fn render_discussions(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.pane == Pane::Discussions;
    let recent = app.notifier.surface().recent();
    let block = panel_block(" Recent discussions ".to_string(), focused);

    if recent.is_empty() {
        let hint = if app.notifier.context().has_endpoint() {
            "Nothing new yet"
        } else {
            "Follow a thread with --content or --group"
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(colors::MUTED))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = recent
        .iter()
        .map(|discussion| discussion_item(discussion, width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(colors::BG_LIGHT))
        .highlight_symbol("▶ ");
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_discussion));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn discussion_item(discussion: &RecentDiscussion, width: usize) -> ListItem<'static> {
    let like_style = match discussion.user_reaction {
        Some(Reaction::Like) => Style::default().fg(colors::LIKE).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(colors::MUTED),
    };
    let dislike_style = match discussion.user_reaction {
        Some(Reaction::Dislike) => Style::default()
            .fg(colors::DISLIKE)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(colors::MUTED),
    };

    ListItem::new(vec![
        Line::from(Span::styled(
            truncate(&discussion.summary(), width),
            Style::default().fg(colors::FG),
        )),
        Line::from(vec![
            Span::styled(format!("  ▲ {}", discussion.like_count), like_style),
            Span::styled(format!("  ▼ {}", discussion.dislike_count), dislike_style),
        ]),
    ])
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match &app.status_message {
        Some((message, _)) => (message.clone(), colors::ACCENT),
        None => (
            "Tab:switch  j/k:move  Enter:open  m/M:read  +/-:react  s:link  r:refresh  ?:help  q:quit"
                .to_string(),
            colors::MUTED,
        ),
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn render_alert(f: &mut Frame, app: &App) {
    let Some(alert) = app.notifier.surface().alert() else {
        return;
    };
    let width = (alert.message.chars().count() as u16).saturating_add(6).max(30);
    let area = top_right_rect(width, 4, f.area());

    let body = Paragraph::new(vec![
        Line::from(Span::styled(
            alert.message.clone(),
            Style::default().fg(colors::FG).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "r: refresh  x: dismiss",
            Style::default().fg(colors::MUTED),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::ALERT))
            .border_type(BorderType::Rounded)
            .style(Style::default().bg(colors::BG)),
    );

    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(50, 60, f.area());

    let help_text = r#"
  Navigation
  Tab, h/l    Switch between lists
  j/k         Move up/down
  Enter, o    Open thread in browser (marks read)
  s           Show thread link

  Notifications
  m           Mark selected read
  M           Mark all visible read
  r           Refresh now
  x           Dismiss alert

  Discussions
  +           Like (again to remove)
  -           Dislike (again to remove)

  ?, H        This help
  q, Esc      Quit
"#;

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(colors::FG))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::HIGHLIGHT))
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(colors::BG)),
        );

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_with, notification};
    use crate::testing::{discussion, FakeApi};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_renders_badge_and_rows() {
        let (mut app, _rx) = app_with(FakeApi::default());
        app.notifier
            .apply_notifications(&[notification(1), notification(2)], chrono::Utc::now());

        let text = screen(&app);
        assert!(text.contains("(2) Marquee"));
        assert!(text.contains("user1"));
        assert!(text.contains("Notifications (2)"));
    }

    #[tokio::test]
    async fn test_renders_alert_overlay() {
        let (mut app, _rx) = app_with(FakeApi::default());
        app.notifier
            .apply_recent(vec![discussion(1), discussion(2)], chrono::Utc::now());

        let text = screen(&app);
        assert!(text.contains("2 new discussions available"));
        assert!(text.contains("New thread"));
    }

    #[tokio::test]
    async fn test_empty_state() {
        let (app, _rx) = app_with(FakeApi::default());
        let text = screen(&app);
        assert!(text.contains("No new notifications"));
        assert!(text.contains("Nothing new yet"));
    }
}

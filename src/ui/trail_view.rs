//! Trail finder screen rendering
//!
//! Renders the level tabs, the district list, and the result panel for the
//! current query state (loading, error, found trail, or nothing found).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::data::{Level, TrailRecord};
use crate::finder::QueryResult;

/// Message shown when no row matches the selection
const NOT_FOUND_MESSAGE: &str = "No course found for the selected level and area.";

/// Border style for a selector, highlighted when focused
fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Renders the trail finder screen
///
/// Layout, top to bottom: title, level tabs, district list beside the
/// result panel, and a one-line status bar.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Level tabs
            Constraint::Min(5),    // Districts + result
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_title(frame, chunks[0]);
    render_level_tabs(frame, app, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(chunks[2]);

    render_districts(frame, app, body[0]);
    render_result(frame, app.finder.result(), body[1]);
    render_status(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "WALKFINDER",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("서울 둘레길 둘러보기", Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_level_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.finder.selection().level;
    let titles: Vec<Line> = Level::ALL
        .iter()
        .map(|level| Line::from(format!("{} {}", level.as_str(), level.english_name())))
        .collect();
    let index = Level::ALL
        .iter()
        .position(|level| *level == selected)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(index)
        .block(
            Block::default()
                .title(" 코스 레벨 Level ")
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::Level)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_districts(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .districts
        .iter()
        .map(|district| ListItem::new(district.label.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" 위치 District ")
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::District)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.districts.is_empty() {
        state.select(Some(app.district_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Builds the lines describing a found trail
fn record_lines(record: &TrailRecord) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Yellow);
    let field = |name: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{}: ", name), label),
            Span::raw(value.to_string()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            record.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("난이도", &record.level),
        field("소요시간", &record.duration),
    ];
    if let Some(distance) = &record.distance {
        lines.push(field("거리", distance));
    }
    lines.push(field("경로", &record.route_description));
    if let Some(category) = &record.category {
        lines.push(field("분류", category));
    }
    if let Some(subway) = &record.nearby_subway {
        lines.push(field("인근 지하철", subway));
    }
    if let Some(traffic) = &record.traffic_info {
        lines.push(field("교통편", traffic));
    }
    if let Some(content) = &record.content {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            content.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

fn render_result(frame: &mut Frame, result: &QueryResult, area: Rect) {
    let lines = match result {
        QueryResult::Loading => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Cyan),
        ))],
        QueryResult::Failed(message) => vec![Line::from(Span::styled(
            format!("Error: {}", message),
            Style::default().fg(Color::Red),
        ))],
        QueryResult::Found(record) => record_lines(record),
        QueryResult::NotFound => vec![Line::from(Span::styled(
            NOT_FOUND_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Course ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let updated = app
        .finder
        .last_updated()
        .map(|at| format!("Updated {}", at.format("%H:%M:%S")))
        .unwrap_or_else(|| "Not updated yet".to_string());

    let status = Line::from(vec![
        Span::styled(updated, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(
            "Tab: switch  ↑↓/←→: select  ?: help  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::trails::test_server::closed_base_url;
    use crate::data::{default_districts, Selection, TrailsClient};
    use crate::finder::{QueryOutcome, TrailFinder};
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_record() -> TrailRecord {
        TrailRecord {
            name: "Cheonggyecheon Trail".to_string(),
            level: "초급".to_string(),
            districts: "중구,종로구".to_string(),
            duration: "2h".to_string(),
            route_description: "Plaza to Gosanja Bridge".to_string(),
            distance: Some("5.8km".to_string()),
            nearby_subway: None,
            traffic_info: None,
            content: None,
            category: None,
        }
    }

    async fn app_with_result(result: Option<QueryResult>) -> App {
        let mut finder = TrailFinder::new(
            TrailsClient::with_base_url(closed_base_url().await, "test-key"),
            Selection::default(),
        );
        if let Some(result) = result {
            finder.apply_outcome(QueryOutcome {
                generation: finder.generation(),
                result,
            });
        }
        App::new(finder, default_districts().unwrap())
    }

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render(frame, app);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test]
    async fn test_renders_loading_state() {
        let app = app_with_result(None).await;
        let content = render_to_string(&app);
        assert!(content.contains("Loading..."));
        assert!(content.contains("WALKFINDER"));
        assert!(content.contains("Not updated yet"));
    }

    #[tokio::test]
    async fn test_renders_error_message() {
        let app =
            app_with_result(Some(QueryResult::Failed("HTTP error! status: 500".to_string()))).await;
        let content = render_to_string(&app);
        assert!(content.contains("Error: HTTP error! status: 500"));
        assert!(!content.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_renders_found_trail() {
        let app = app_with_result(Some(QueryResult::Found(sample_record()))).await;
        let content = render_to_string(&app);
        assert!(content.contains("Cheonggyecheon Trail"));
        assert!(content.contains("Plaza to Gosanja Bridge"));
        assert!(content.contains("5.8km"));
        assert!(content.contains("Updated"));
    }

    #[tokio::test]
    async fn test_renders_not_found_message() {
        let app = app_with_result(Some(QueryResult::NotFound)).await;
        let content = render_to_string(&app);
        assert!(content.contains("No course found"));
    }

    #[tokio::test]
    async fn test_renders_level_tabs_and_cursor() {
        let app = app_with_result(None).await;
        let content = render_to_string(&app);
        assert!(content.contains("Beginner"));
        assert!(content.contains("Intermediate"));
        assert!(content.contains("Advanced"));
        assert!(content.contains("> "));
        assert!(content.contains("Jung-gu"));
    }
}

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{App, Cursor};
use crate::model::{Status, Theme};
use crate::render::ColumnView;
use crate::session::{EditSession, FormField, TaskForm};
use crate::wiring::Control;

const SIDEBAR_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 3;
const ADD_BUTTON: &str = " + Add New Task ";

/// Screen regions recorded while drawing, used to resolve mouse clicks to
/// controls. Later regions sit on top of earlier ones.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Option<Control>)>,
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, control: Control) {
        self.regions.push((area, Some(control)));
    }

    /// Region that swallows clicks without triggering anything.
    pub fn block(&mut self, area: Rect) {
        self.regions.push((area, None));
    }

    pub fn hit(&self, x: u16, y: u16) -> Option<&Control> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| contains(*area, x, y))
            .and_then(|(_, control)| control.as_ref())
    }
}

struct Palette {
    base: Color,
    panel: Color,
    text: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                base: Color::Rgb(32, 33, 44),
                panel: Color::Rgb(43, 44, 55),
                text: Color::White,
                muted: Color::Rgb(130, 143, 163),
                accent: Color::Rgb(99, 95, 199),
            },
            Theme::Light => Self {
                base: Color::Rgb(244, 247, 253),
                panel: Color::White,
                text: Color::Black,
                muted: Color::Rgb(130, 143, 163),
                accent: Color::Rgb(99, 95, 199),
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().bg(self.base).fg(self.text)
    }

    fn panel(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::Rgb(73, 196, 229),
        Status::Doing => Color::Rgb(132, 113, 242),
        Status::Done => Color::Rgb(103, 226, 174),
    }
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

/// Center a rectangle within an area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// One-line rectangle at `row` inside `area`, or `None` if it falls outside.
fn line_at(area: Rect, row: u16) -> Option<Rect> {
    let y = area.y.checked_add(row)?;
    (y < area.bottom()).then(|| Rect::new(area.x, y, area.width, 1))
}

pub fn render(frame: &mut Frame, app: &App, hits: &mut HitMap) {
    hits.clear();
    let palette = Palette::for_theme(app.theme);
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let main = if app.sidebar_visible {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[0]);
        render_sidebar(frame, app, &palette, cols[0], hits);
        cols[1]
    } else {
        rows[0]
    };

    render_main(frame, app, &palette, main, hits);
    if !app.sidebar_visible {
        render_show_sidebar(frame, &palette, main, hits);
    }
    render_status_line(frame, app, &palette, rows[1]);

    if let Some(form) = app.session.form() {
        render_modal(frame, app, form, &palette, hits);
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect, hits: &mut HitMap) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(palette.muted))
        .style(palette.panel());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(logo) = line_at(inner, 0) {
        frame.render_widget(
            Paragraph::new(format!(" {}", app.logo()))
                .style(Style::default().fg(palette.text).bold()),
            logo,
        );
    }
    if let Some(heading) = line_at(inner, 2) {
        frame.render_widget(
            Paragraph::new(format!(" ALL BOARDS ({})", app.view.tabs.len()))
                .style(Style::default().fg(palette.muted)),
            heading,
        );
    }

    // Leave the last three rows for the theme switch and hide button.
    let tabs_end = inner.height.saturating_sub(3);
    for (i, tab) in app.view.tabs.iter().enumerate() {
        let Ok(offset) = u16::try_from(i + 3) else {
            break;
        };
        if offset >= tabs_end {
            break;
        }
        let Some(rect) = line_at(inner, offset) else {
            break;
        };
        let style = if tab.active {
            Style::default().bg(palette.accent).fg(Color::White).bold()
        } else {
            Style::default().fg(palette.muted)
        };
        frame.render_widget(Paragraph::new(format!(" ▤ {}", tab.board)).style(style), rect);
        hits.push(rect, Control::BoardTab(tab.board.clone()));
    }

    let theme_name = match app.theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };
    if let Some(rect) = line_at(inner, inner.height.saturating_sub(3)) {
        frame.render_widget(
            Paragraph::new(format!(" ◐ Theme: {theme_name} (t)"))
                .style(Style::default().fg(palette.muted)),
            rect,
        );
        hits.push(rect, Control::ThemeSwitch);
    }
    if let Some(rect) = line_at(inner, inner.height.saturating_sub(1)) {
        frame.render_widget(
            Paragraph::new(" ⊘ Hide Sidebar (s)").style(Style::default().fg(palette.muted)),
            rect,
        );
        hits.push(rect, Control::HideSidebar);
    }
}

fn render_show_sidebar(frame: &mut Frame, palette: &Palette, main: Rect, hits: &mut HitMap) {
    let label = " » ";
    let width = text_width(label).min(main.width);
    let rect = Rect::new(main.x, main.bottom().saturating_sub(1), width, 1);
    frame.render_widget(
        Paragraph::new(label).style(Style::default().bg(palette.accent).fg(Color::White)),
        rect,
    );
    hits.push(rect, Control::ShowSidebar);
}

fn render_main(frame: &mut Frame, app: &App, palette: &Palette, area: Rect, hits: &mut HitMap) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    render_header(frame, app, palette, chunks[0], hits);

    let columns = &app.view.columns;
    if columns.is_empty() {
        return;
    }
    let count = u32::try_from(columns.len()).unwrap_or(u32::MAX);
    let constraints: Vec<Constraint> = columns.iter().map(|_| Constraint::Ratio(1, count)).collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(chunks[1]);
    for (i, (column, rect)) in columns.iter().zip(areas.iter()).enumerate() {
        render_column(frame, app, palette, i, column, *rect, hits);
    }
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect, hits: &mut HitMap) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.muted))
        .style(palette.panel());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = if app.view.title.is_empty() {
        " No board yet".to_string()
    } else {
        format!(" {}", app.view.title)
    };
    if let Some(row) = line_at(inner, 0) {
        frame.render_widget(
            Paragraph::new(title).style(Style::default().fg(palette.text).bold()),
            row,
        );
        let width = text_width(ADD_BUTTON).min(row.width);
        let button = Rect::new(row.right().saturating_sub(width + 1), row.y, width, 1);
        frame.render_widget(
            Paragraph::new(ADD_BUTTON)
                .style(Style::default().bg(palette.accent).fg(Color::White).bold()),
            button,
        );
        hits.push(button, Control::AddNewTask);
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    palette: &Palette,
    index: usize,
    column: &ColumnView,
    area: Rect,
    hits: &mut HitMap,
) {
    if let Some(row) = line_at(area, 0) {
        let header = Line::from(vec![
            Span::styled(" ● ", Style::default().fg(status_color(column.status))),
            Span::styled(
                format!("{} ({})", column.header, column.cards.len()),
                Style::default().fg(palette.muted).bold(),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), row);
    }

    let mut y = area.y.saturating_add(2);
    for (row, card) in column.cards.iter().enumerate() {
        if y.saturating_add(CARD_HEIGHT) > area.bottom() {
            let hidden = column.cards.len() - row;
            if let Some(more) = line_at(area, area.height.saturating_sub(1)) {
                frame.render_widget(
                    Paragraph::new(format!("  … {hidden} more"))
                        .style(Style::default().fg(palette.muted)),
                    more,
                );
            }
            break;
        }
        let rect = Rect::new(area.x + 1, y, area.width.saturating_sub(2), CARD_HEIGHT);
        let selected = !app.session.is_open() && app.cursor == Cursor { column: index, row };
        let border = if selected {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default().fg(palette.muted)
        };
        frame.render_widget(
            Paragraph::new(card.title.as_str())
                .style(palette.panel())
                .block(Block::default().borders(Borders::ALL).border_style(border)),
            rect,
        );
        hits.push(rect, Control::Card(card.id));
        y = y.saturating_add(CARD_HEIGHT);
    }
}

fn render_status_line(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let text = match &app.message {
        Some(msg) => msg.clone(),
        None => {
            "a: add  Enter: edit  hjkl/arrows: move  [ ]: board  s: sidebar  t: theme  q: quit"
                .to_string()
        }
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(palette.base).fg(palette.muted)),
        area,
    );
}

fn render_field(
    frame: &mut Frame,
    label: &str,
    value: &str,
    focused: bool,
    palette: &Palette,
    chunks: &[Rect],
    idx: &mut usize,
) {
    let label_style = if focused {
        Style::default().fg(palette.accent).bold()
    } else {
        Style::default().fg(palette.muted)
    };
    frame.render_widget(Paragraph::new(label).style(label_style), chunks[*idx]);
    *idx += 1;

    let cursor = if focused { "_" } else { "" };
    frame.render_widget(
        Paragraph::new(format!("  {value}{cursor}")).style(Style::default().fg(palette.text)),
        chunks[*idx],
    );
    *idx += 1;
}

fn render_modal(
    frame: &mut Frame,
    app: &App,
    form: &TaskForm,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let (title, buttons): (&str, Vec<(&str, Control)>) = match &app.session {
        EditSession::AddOpen(_) => (
            " Add New Task ",
            vec![
                ("[Enter] Create Task", Control::SubmitAdd),
                ("[Esc] Cancel", Control::CancelAdd),
            ],
        ),
        EditSession::EditOpen { .. } => (
            " Edit Task ",
            vec![
                ("[Enter] Save Changes", Control::SaveChanges),
                ("[C-d] Delete Task", Control::DeleteTask),
                ("[Esc] Cancel", Control::CancelEdit),
            ],
        ),
        EditSession::Closed => return,
    };

    let term = frame.area();
    // Clicks anywhere outside the dialog land on the overlay.
    hits.push(term, Control::Overlay);
    frame
        .buffer_mut()
        .set_style(term, Style::default().add_modifier(Modifier::DIM));

    let has_board = form.board.is_some();
    let has_error = form.error.is_some();
    let board_rows: u16 = if has_board { 2 } else { 0 };
    // Three fields, optional board field and error, spacer, buttons.
    let content_rows = 6 + board_rows + u16::from(has_error) + 2;
    let width = 64.min(term.width.saturating_sub(4));
    let height = (content_rows + 2).min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);
    hits.block(area);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.panel());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1); 6];
    if has_board {
        constraints.extend([Constraint::Length(1), Constraint::Length(1)]);
    }
    if has_error {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1)); // spacer
    constraints.push(Constraint::Length(1)); // buttons
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut idx = 0;
    render_field(
        frame,
        "Title",
        &form.title,
        form.focused == FormField::Title,
        palette,
        &chunks,
        &mut idx,
    );
    let description_label = if form.focused == FormField::Description {
        "Description (C-e: editor)"
    } else {
        "Description"
    };
    let description = form.description.lines().next().unwrap_or("");
    render_field(
        frame,
        description_label,
        description,
        form.focused == FormField::Description,
        palette,
        &chunks,
        &mut idx,
    );
    let status = format!("◀ {} ▶", form.status);
    render_field(
        frame,
        "Current Status",
        &status,
        form.focused == FormField::Status,
        palette,
        &chunks,
        &mut idx,
    );
    if let Some(board) = &form.board {
        render_field(
            frame,
            "Board",
            board,
            form.focused == FormField::Board,
            palette,
            &chunks,
            &mut idx,
        );
    }
    if let Some(err) = &form.error {
        frame.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            chunks[idx],
        );
        idx += 1;
    }
    idx += 1;

    let row = chunks[idx];
    let mut x = row.x;
    for (label, control) in buttons {
        let width = text_width(label).min(row.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        let rect = Rect::new(x, row.y, width, 1);
        frame.render_widget(
            Paragraph::new(label).style(Style::default().fg(palette.accent).bold()),
            rect,
        );
        hits.push(rect, control);
        x = x.saturating_add(width + 2);
    }
}

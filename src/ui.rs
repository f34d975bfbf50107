use crate::filter::all_tags;
use crate::journal_entry::{JournalEntry, EMOJI_OPTIONS, TAG_PRESETS};
use crate::metrics::{parse_entry_date, weekly_count, Progress, ProgressLevel, WEEKLY_GOAL};
use crate::note_form::{FormField, NoteForm};
use crate::view_state::{Intent, Tab, ViewState};
use chrono::{DateTime, Local, Utc};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy)]
struct Theme {
    background: Color,
    text: Color,
    muted: Color,
    accent: Color,
    border: Color,
    chip: Color,
}

impl Theme {
    fn for_mode(dark: bool) -> Self {
        if dark {
            Theme {
                background: Color::Rgb(15, 23, 42),
                text: Color::Rgb(241, 245, 249),
                muted: Color::Rgb(148, 163, 184),
                accent: Color::Rgb(192, 132, 252),
                border: Color::Rgb(51, 65, 85),
                chip: Color::Rgb(71, 85, 105),
            }
        } else {
            Theme {
                background: Color::Rgb(250, 245, 255),
                text: Color::Rgb(30, 41, 59),
                muted: Color::Rgb(71, 85, 105),
                accent: Color::Rgb(168, 85, 247),
                border: Color::Rgb(233, 213, 255),
                chip: Color::Rgb(229, 231, 235),
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
            .title(title)
            .style(self.base())
    }
}

/// Card tint for a stored color token.
fn card_color(token: &str) -> Color {
    const TINTS: [(&str, Color); 8] = [
        ("mint", Color::Rgb(110, 231, 183)),
        ("peach", Color::Rgb(253, 186, 140)),
        ("sky", Color::Rgb(125, 211, 252)),
        ("purple", Color::Rgb(216, 180, 254)),
        ("yellow", Color::Rgb(253, 224, 71)),
        ("pink", Color::Rgb(249, 168, 212)),
        ("orange", Color::Rgb(253, 186, 116)),
        ("green", Color::Rgb(134, 239, 172)),
    ];
    TINTS
        .iter()
        .find(|(name, _)| token.contains(name))
        .map(|(_, color)| *color)
        .unwrap_or(Color::Gray)
}

fn progress_color(level: ProgressLevel) -> Color {
    match level {
        ProgressLevel::Idle => Color::Gray,
        ProgressLevel::Warming => Color::Blue,
        ProgressLevel::OnFire => Color::Green,
        ProgressLevel::Champion => Color::Yellow,
    }
}

/// `Wed, Jan 10` in local time; unparsable dates are shown as stored.
fn format_card_date(raw: &str) -> String {
    match parse_entry_date(raw) {
        Some(date) => date.with_timezone(&Local).format("%a, %b %-d").to_string(),
        None => raw.to_string(),
    }
}

/// Cuts `text` to at most `max` terminal columns, marking the cut with `…`.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Decodes a key press into an intent for the current screen.
pub fn key_to_intent(view: &ViewState, key: KeyEvent) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if view.form.is_some() {
        return match key.code {
            KeyCode::Esc => Some(Intent::CloseForm),
            KeyCode::Char('s') if ctrl => Some(Intent::SaveForm),
            KeyCode::Tab => Some(Intent::FormNextField),
            KeyCode::BackTab => Some(Intent::FormPreviousField),
            KeyCode::Enter => Some(Intent::FormEnter),
            KeyCode::Backspace => Some(Intent::FormBackspace),
            KeyCode::Left => Some(Intent::FormLeft),
            KeyCode::Right => Some(Intent::FormRight),
            KeyCode::Char(c) if !ctrl => Some(Intent::FormInput(c)),
            _ => None,
        };
    }

    if view.search_focused {
        return match key.code {
            KeyCode::Esc => Some(Intent::ClearFilters),
            KeyCode::Enter | KeyCode::Down => Some(Intent::FinishSearch),
            KeyCode::Backspace => Some(Intent::SearchBackspace),
            KeyCode::Char(c) if !ctrl => Some(Intent::SearchInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Intent::Quit),
        KeyCode::Char('q') => return Some(Intent::Quit),
        KeyCode::Char('1') => return Some(Intent::SwitchTab(Tab::Home)),
        KeyCode::Char('2') => return Some(Intent::SwitchTab(Tab::Journal)),
        KeyCode::Char('3') => return Some(Intent::SwitchTab(Tab::Profile)),
        KeyCode::Tab => return Some(Intent::NextTab),
        KeyCode::BackTab => return Some(Intent::PreviousTab),
        KeyCode::Char('a') | KeyCode::Char('+') => return Some(Intent::OpenAddForm),
        KeyCode::Char('t') => return Some(Intent::ToggleTheme),
        _ => {}
    }

    if view.tab != Tab::Journal {
        return None;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Intent::SelectPrevious),
        KeyCode::Down | KeyCode::Char('j') => Some(Intent::SelectNext),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Intent::ToggleExpand),
        KeyCode::Char('e') => Some(Intent::EditSelected),
        KeyCode::Char('d') => Some(Intent::DeleteSelected),
        KeyCode::Char('/') => Some(Intent::FocusSearch),
        KeyCode::Char(']') => Some(Intent::NextTagFilter),
        KeyCode::Char('[') => Some(Intent::PreviousTagFilter),
        KeyCode::Esc => Some(Intent::ClearFilters),
        _ => None,
    }
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI { terminal })
    }

    pub fn display(
        &mut self,
        view: &ViewState,
        entries: &[JournalEntry],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let theme = Theme::for_mode(view.dark_mode);
        let progress = Progress::from_count(weekly_count(entries, now));

        self.terminal.draw(|f| {
            f.render_widget(Block::default().style(theme.base()), f.area());

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(3),
                        Constraint::Length(1),
                    ]
                    .as_ref(),
                )
                .split(f.area());

            draw_header(f, chunks[0], view, &theme);
            draw_progress(f, chunks[1], &progress, &theme);
            match view.tab {
                Tab::Home => draw_home(f, chunks[2], &theme),
                Tab::Journal => draw_journal(f, chunks[2], view, entries, &theme),
                Tab::Profile => draw_profile(f, chunks[2], entries.len(), progress.count, &theme),
            }
            draw_nav(f, chunks[3], view.tab, &theme);
            draw_hints(f, chunks[4], view, &theme);

            if let Some(form) = &view.form {
                draw_form(f, form, &theme);
            }
        })?;

        Ok(())
    }

    /// Blocks for the next terminal event. Non-key events yield `None` so the caller redraws.
    pub fn next_intent(&self, view: &ViewState) -> Result<Option<Intent>> {
        match event::read()? {
            Event::Key(key) => Ok(key_to_intent(view, key)),
            _ => Ok(None),
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn draw_header(f: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let mode = if view.dark_mode { "☾ dark" } else { "☀ light" };
    let line = Line::from(vec![
        Span::styled(
            "📚 My Learning Journal",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("After-school.tech", Style::default().fg(theme.muted)),
        Span::raw("   "),
        Span::styled(mode, Style::default().fg(theme.muted)),
    ]);
    let header = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border))
                .style(theme.base()),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn draw_progress(f: &mut Frame, area: Rect, progress: &Progress, theme: &Theme) {
    let stars = "⭐".repeat(progress.stars);
    let label = format!("{}/{} notes/week {}", progress.count, WEEKLY_GOAL, stars);
    let gauge = Gauge::default()
        .block(theme.block(&progress.message))
        .gauge_style(
            Style::default()
                .fg(progress_color(progress.level))
                .bg(theme.chip),
        )
        .ratio(progress.ratio)
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_home(f: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome Back, Learner! 🌟",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Ready to add a new learning adventure?",
            Style::default().fg(theme.muted),
        )),
        Line::from(Span::styled(
            "Press a to write a note.",
            Style::default().fg(theme.muted),
        )),
    ];
    let home = Paragraph::new(lines)
        .block(theme.block("Home"))
        .alignment(Alignment::Center);
    f.render_widget(home, area);
}

fn draw_profile(f: &mut Frame, area: Rect, total: usize, this_week: usize, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Your Profile 👤",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Total Notes: {total}")),
        Line::from(format!("This Week: {this_week}")),
        Line::from(Span::styled(
            "Keep up the great work! 🎉",
            Style::default().fg(theme.muted),
        )),
    ];
    let profile = Paragraph::new(lines)
        .block(theme.block("Profile"))
        .alignment(Alignment::Center);
    f.render_widget(profile, area);
}

fn draw_journal(
    f: &mut Frame,
    area: Rect,
    view: &ViewState,
    entries: &[JournalEntry],
    theme: &Theme,
) {
    if entries.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from("📚"),
            Line::from(Span::styled(
                "Start Your Learning Journey! 🚀",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press a to add your first learning note!",
                Style::default().fg(theme.muted),
            )),
        ];
        let empty = Paragraph::new(lines)
            .block(theme.block("Journal"))
            .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let search_style = if view.search_focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.border)
    };
    let search_text = if view.search.is_empty() && !view.search_focused {
        Span::styled("Search your notes... (/)", Style::default().fg(theme.muted))
    } else {
        Span::raw(view.search.clone())
    };
    let search = Paragraph::new(Line::from(vec![Span::raw("🔍 "), search_text])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style)
            .style(theme.base()),
    );
    f.render_widget(search, chunks[0]);
    if view.search_focused {
        let x = chunks[0].x + 1 + "🔍 ".width() as u16 + view.search.width() as u16;
        f.set_cursor_position((x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
    }

    let mut chips = vec![chip("All", view.selected_tag.is_empty(), theme)];
    for tag in all_tags(entries) {
        chips.push(Span::raw(" "));
        chips.push(chip(tag, view.selected_tag == tag, theme));
    }
    f.render_widget(Paragraph::new(Line::from(chips)).style(theme.base()), chunks[1]);

    let shown = view.visible_entries(entries);
    if shown.is_empty() {
        let message = if view.search.is_empty() {
            "No notes with this tag.".to_string()
        } else {
            format!("No notes found matching \"{}\" 🔍", view.search)
        };
        let none = Paragraph::new(message)
            .style(Style::default().fg(theme.muted))
            .block(theme.block("Notes"))
            .alignment(Alignment::Center);
        f.render_widget(none, chunks[2]);
        return;
    }

    let width = chunks[2].width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = shown
        .iter()
        .map(|entry| {
            let expanded = view.expanded.as_deref() == Some(entry.id.as_str());
            let editing = view.editing_id() == Some(entry.id.as_str());
            card(entry, expanded, editing, width, theme)
        })
        .collect();

    let list = List::new(items)
        .block(theme.block("Notes"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(
        list,
        chunks[2],
        &mut ListState::default().with_selected(Some(view.selected)),
    );
}

fn chip<'a>(label: &'a str, active: bool, theme: &Theme) -> Span<'a> {
    let style = if active {
        Style::default().fg(Color::White).bg(theme.accent)
    } else {
        Style::default().fg(theme.text).bg(theme.chip)
    };
    Span::styled(format!(" {label} "), style)
}

fn card(
    entry: &JournalEntry,
    expanded: bool,
    editing: bool,
    width: usize,
    theme: &Theme,
) -> ListItem<'static> {
    let tint = Style::default().fg(card_color(&entry.color));
    let date = format_card_date(&entry.date);
    let title_width = width.saturating_sub(date.width() + entry.emoji.width() + 4);

    let mut lines = vec![Line::from(vec![
        Span::styled("▌", tint),
        Span::raw(format!("{} ", entry.emoji)),
        Span::styled(
            truncate_to_width(&entry.title, title_width),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("📅 {date}"), Style::default().fg(theme.muted)),
    ])];

    let summary_lines: Vec<&str> = entry.summary.lines().collect();
    let (shown, clipped) = if expanded {
        (summary_lines.as_slice(), false)
    } else {
        let n = summary_lines.len().min(2);
        (&summary_lines[..n], summary_lines.len() > 2)
    };
    for (i, text) in shown.iter().enumerate() {
        let text = if expanded {
            text.to_string()
        } else if clipped && i + 1 == shown.len() {
            truncate_to_width(&format!("{text} …"), width)
        } else {
            truncate_to_width(text, width)
        };
        lines.push(Line::from(vec![Span::styled("▌", tint), Span::raw(text)]));
    }

    if !entry.tags.is_empty() {
        let mut tags = vec![Span::styled("▌", tint), Span::raw("🏷 ")];
        for tag in &entry.tags {
            tags.push(Span::styled(
                format!(" {tag} "),
                Style::default().fg(theme.text).bg(theme.chip),
            ));
            tags.push(Span::raw(" "));
        }
        lines.push(Line::from(tags));
    }

    let hint = if editing {
        "✎ editing"
    } else if expanded {
        "↑ Enter to collapse"
    } else {
        "↓ Enter to expand"
    };
    lines.push(Line::from(vec![
        Span::styled("▌", tint),
        Span::styled(hint, Style::default().fg(theme.muted)),
    ]));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn draw_nav(f: &mut Frame, area: Rect, active: Tab, theme: &Theme) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(theme.block(""))
        .select(active.index())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_hints(f: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let hints = if view.form.is_some() {
        "Tab: next field  ←/→: choose  Space: toggle tag  Ctrl+S: save  Esc: cancel"
    } else if view.search_focused {
        "Type to search  Enter: done  Esc: clear"
    } else if view.tab == Tab::Journal {
        "a: add  e: edit  d: delete  Enter: expand  /: search  [ ]: tag filter  t: theme  q: quit"
    } else {
        "a: add  1-3 or Tab: switch section  t: theme  q: quit"
    };
    let line = Paragraph::new(hints)
        .style(Style::default().fg(Color::Yellow).bg(theme.background))
        .alignment(Alignment::Center);
    f.render_widget(line, area);
}

fn draw_form(f: &mut Frame, form: &NoteForm, theme: &Theme) {
    let area = centered(f.area(), 64, 24);
    f.render_widget(Clear, area);
    let title = if form.is_editing() {
        "Edit Note ✨"
    } else {
        "Add New Note ✨"
    };
    let outer = theme.block(title);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let field_block = |label: &'static str, field: FormField| {
        let color = if form.focus == field {
            theme.accent
        } else {
            theme.border
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(label)
            .style(theme.base())
    };

    f.render_widget(
        Paragraph::new(form.title.clone())
            .block(field_block("What did you learn today? 🤓", FormField::Title)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(form.summary.clone())
            .wrap(Wrap { trim: false })
            .block(field_block("Tell us more! 📝", FormField::Summary)),
        chunks[1],
    );

    let emojis: Vec<Span> = EMOJI_OPTIONS
        .iter()
        .enumerate()
        .flat_map(|(i, emoji)| {
            let style = if *emoji == form.emoji() {
                Style::default().bg(theme.accent)
            } else {
                Style::default()
            };
            [Span::styled(format!(" {emoji} "), style), Span::raw(" ")]
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(emojis))
            .block(field_block("How do you feel? 😊", FormField::Emoji)),
        chunks[2],
    );

    let presets: Vec<Span> = TAG_PRESETS
        .iter()
        .enumerate()
        .flat_map(|(i, tag)| {
            let selected = form.tags.iter().any(|t| t == tag);
            let mut style = if selected {
                Style::default().fg(Color::White).bg(theme.accent)
            } else {
                Style::default().fg(theme.text).bg(theme.chip)
            };
            if form.focus == FormField::Tags && i == form.preset_cursor {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            [Span::styled(format!(" {tag} "), style), Span::raw(" ")]
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(presets))
            .wrap(Wrap { trim: true })
            .block(field_block("What topics did you explore? 🏷", FormField::Tags)),
        chunks[3],
    );

    f.render_widget(
        Paragraph::new(form.custom_tag.clone())
            .block(field_block("Add custom tag (Enter)", FormField::CustomTag)),
        chunks[4],
    );

    let selected = if form.tags.is_empty() {
        Span::styled("No tags yet", Style::default().fg(theme.muted))
    } else {
        Span::raw(
            form.tags
                .iter()
                .map(|t| format!("{t} ×"))
                .collect::<Vec<_>>()
                .join("  "),
        )
    };
    let save_style = if form.can_save() {
        Style::default()
            .fg(Color::White)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted).bg(theme.chip)
    };
    let footer = Paragraph::new(vec![
        Line::from(selected),
        Line::from(Span::styled(" 💾 Save Note (Ctrl+S) ", save_style)),
    ])
    .style(theme.base());
    f.render_widget(footer, chunks[5]);

    let cursor = match form.focus {
        FormField::Title => Some((chunks[0], form.title.as_str())),
        FormField::CustomTag => Some((chunks[4], form.custom_tag.as_str())),
        FormField::Summary => Some((chunks[1], form.summary.as_str())),
        FormField::Emoji | FormField::Tags => None,
    };
    if let Some((field, text)) = cursor {
        let row = text.split('\n').count().saturating_sub(1) as u16;
        let last = text.rsplit('\n').next().unwrap_or("");
        let x = field.x + 1 + last.width() as u16;
        let y = field.y + 1 + row;
        f.set_cursor_position((
            x.min(field.right().saturating_sub(2)),
            y.min(field.bottom().saturating_sub(2)),
        ));
    }
}

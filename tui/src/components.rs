//! Component tree rendered into a mount target.
//!
//! The tree is `Provider` at the root, then `Baseline` followed by
//! `ThemedApp`. Every component receives a [`RenderContext`] that carries
//! the store it was mounted with and a state snapshot taken once per frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use pickem_engine::{AppState, Remote, Store};
use pickem_types::{UiOptions, display_text, truncate_with_ellipsis};

use crate::theme::{Glyphs, Palette, glyphs, palette, styles};

/// What a component can see while rendering.
pub struct RenderContext<'a> {
    store: &'a Store,
    state: &'a AppState,
    options: UiOptions,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub fn store(&self) -> &'a Store {
        self.store
    }

    #[must_use]
    pub fn state(&self) -> &'a AppState {
        self.state
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }
}

pub trait Component {
    fn render(&self, cx: &RenderContext<'_>, frame: &mut Frame<'_>, area: Rect);
}

/// Root of the tree. Binds the store for every descendant.
pub struct Provider {
    store: Store,
    options: UiOptions,
    children: Vec<Box<dyn Component>>,
}

impl Provider {
    #[must_use]
    pub fn new(store: Store, options: UiOptions, children: Vec<Box<dyn Component>>) -> Self {
        Self {
            store,
            options,
            children,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let state = self.store.state();
        let cx = RenderContext {
            store: &self.store,
            state: &state,
            options: self.options,
        };
        for child in &self.children {
            child.render(&cx, frame, area);
        }
    }
}

/// The application tree mounted at startup.
#[must_use]
pub fn app_tree(store: Store, options: UiOptions) -> Provider {
    Provider::new(store, options, vec![Box::new(Baseline), Box::new(ThemedApp)])
}

/// Resets the area and paints the theme background.
pub struct Baseline;

impl Component for Baseline {
    fn render(&self, cx: &RenderContext<'_>, frame: &mut Frame<'_>, area: Rect) {
        let palette = palette(cx.options());
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg_dark).fg(palette.text_primary)),
            area,
        );
    }
}

/// Header, leagues, schedule, results and key hints.
pub struct ThemedApp;

struct Theme {
    palette: Palette,
    glyphs: Glyphs,
}

impl Component for ThemedApp {
    fn render(&self, cx: &RenderContext<'_>, frame: &mut Frame<'_>, area: Rect) {
        let options = cx.options();
        let theme = Theme {
            palette: palette(options),
            glyphs: glyphs(options),
        };
        let state = cx.state();

        let [header, body, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body);
        let [leagues, schedule] = Layout::vertical([
            Constraint::Length(leagues_height(state)),
            Constraint::Min(3),
        ])
        .areas(left);

        render_header(state, &theme, frame, header);
        render_leagues(state, &theme, frame, leagues);
        render_schedule(cx, &theme, frame, schedule);
        render_results(state, &theme, frame, right);
        render_key_hints(&theme, frame, hints);
    }
}

const MAX_LEAGUE_ROWS: u16 = 6;

fn leagues_height(state: &AppState) -> u16 {
    let rows = state
        .leagues
        .loaded()
        .map_or(1, |leagues| leagues.len().max(1));
    u16::try_from(rows).unwrap_or(MAX_LEAGUE_ROWS).min(MAX_LEAGUE_ROWS) + 2
}

fn panel<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(Span::styled(title, styles::title(&theme.palette)))
        .border_style(styles::border(&theme.palette))
        .style(Style::default().bg(theme.palette.bg_panel))
}

/// One-line placeholder for a slice that is not loaded.
fn status_line<'a, T>(remote: &Remote<T>, noun: &str, theme: &Theme) -> Option<Line<'a>> {
    match remote {
        Remote::Idle => Some(Line::styled(String::new(), styles::muted(&theme.palette))),
        Remote::Loading => Some(Line::styled(
            format!("Loading {noun}{}", theme.glyphs.ellipsis),
            styles::muted(&theme.palette),
        )),
        Remote::Failed(error) => Some(Line::styled(
            format!("{} {}", theme.glyphs.failed, display_text(error)),
            styles::error(&theme.palette),
        )),
        Remote::Loaded(_) => None,
    }
}

fn render_header(state: &AppState, theme: &Theme, frame: &mut Frame<'_>, area: Rect) {
    let season = state
        .season
        .map_or_else(|| String::from("-"), |season| season.to_string());
    let left = format!(" pickem {} F1 {season}", theme.glyphs.separator);
    let busy = state.leagues.is_loading()
        || state.races.is_loading()
        || state.results.values().any(Remote::is_loading);
    let right = if busy {
        format!("syncing{} ", theme.glyphs.ellipsis)
    } else {
        String::new()
    };

    let pad = usize::from(area.width).saturating_sub(left.width() + right.width());
    let line = Line::from(vec![
        Span::styled(left, styles::title(&theme.palette)),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, styles::muted(&theme.palette)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_leagues(state: &AppState, theme: &Theme, frame: &mut Frame<'_>, area: Rect) {
    let block = panel(" Leagues ".to_string(), theme);
    let lines = match status_line(&state.leagues, "leagues", theme) {
        Some(line) => vec![line],
        None => {
            let leagues = state.leagues.loaded().map_or(&[][..], Vec::as_slice);
            if leagues.is_empty() {
                vec![Line::styled("No leagues yet", styles::muted(&theme.palette))]
            } else {
                leagues
                    .iter()
                    .map(|league| {
                        Line::from(vec![
                            Span::styled(
                                display_text(&league.name).into_owned(),
                                Style::default().fg(theme.palette.text_primary),
                            ),
                            Span::styled(
                                format!(
                                    "  {} members {} {}",
                                    league.member_count, theme.glyphs.separator, league.season
                                ),
                                styles::muted(&theme.palette),
                            ),
                        ])
                    })
                    .collect()
            }
        }
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_schedule(cx: &RenderContext<'_>, theme: &Theme, frame: &mut Frame<'_>, area: Rect) {
    let state = cx.state();
    let title = match state.season {
        Some(season) => format!(" Schedule {season} "),
        None => " Schedule ".to_string(),
    };
    let block = panel(title, theme);

    if let Some(line) = status_line(&state.races, "schedule", theme) {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }
    let races = state.schedule();
    if races.is_empty() {
        let empty = Line::styled("No races scheduled", styles::muted(&theme.palette));
        frame.render_widget(Paragraph::new(empty).block(block), area);
        return;
    }

    let today = cx.store().services().clock.today();
    let name_width = usize::from(area.width.saturating_sub(20)).max(8);
    let items: Vec<ListItem<'_>> = races
        .iter()
        .map(|race| {
            let (marker, marker_style) = if race.is_upcoming(today) {
                (theme.glyphs.upcoming, Style::default().fg(theme.palette.success))
            } else {
                (theme.glyphs.finished, styles::muted(&theme.palette))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), marker_style),
                Span::styled(format!("R{:<2} ", race.round), styles::muted(&theme.palette)),
                Span::styled(
                    format!("{} ", race.date.format("%d %b")),
                    Style::default().fg(theme.palette.text_secondary),
                ),
                Span::raw(truncate_with_ellipsis(&display_text(&race.name), name_width)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_row(&theme.palette))
        .highlight_symbol(theme.glyphs.selected);
    let mut list_state = ListState::default().with_selected(state.selected_race);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_results(state: &AppState, theme: &Theme, frame: &mut Frame<'_>, area: Rect) {
    let Some(race) = state.selected() else {
        let block = panel(" Results ".to_string(), theme);
        let hint = Line::styled("Select a race", styles::muted(&theme.palette));
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    let block = panel(format!(" {} ", display_text(&race.name)), theme);
    let lines = match state.results_for(&race.id) {
        Remote::Idle => vec![Line::styled(
            "Press enter to load results",
            styles::muted(&theme.palette),
        )],
        Remote::Loaded(None) => vec![Line::styled(
            "Results not published yet",
            styles::muted(&theme.palette),
        )],
        Remote::Loaded(Some(results)) => {
            let podium = results.podium();
            let separator = format!(" {} ", theme.glyphs.separator);
            let summary: Vec<String> = podium
                .iter()
                .map(|driver| display_text(driver).into_owned())
                .collect();
            let mut lines = vec![
                Line::styled(summary.join(&separator), styles::podium_summary(&theme.palette)),
                Line::default(),
            ];
            lines.extend(results.classification.iter().enumerate().map(|(index, driver)| {
                let position = index + 1;
                let style = if index < podium.len() {
                    styles::podium(&theme.palette, position)
                } else {
                    Style::default().fg(theme.palette.text_primary)
                };
                Line::from(vec![
                    Span::styled(format!("P{position:<3}"), styles::muted(&theme.palette)),
                    Span::styled(display_text(driver).into_owned(), style),
                ])
            }));
            lines
        }
        other => status_line(other, "results", theme).into_iter().collect(),
    };
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

const KEY_HINTS: &[(&str, &str)] = &[
    ("j/k", "select"),
    ("enter", "results"),
    ("[ ]", "season"),
    ("r", "refresh"),
    ("q", "quit"),
];

fn render_key_hints(theme: &Theme, frame: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (index, (key, label)) in KEY_HINTS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(
                format!(" {} ", theme.glyphs.separator),
                styles::key_hint(&theme.palette),
            ));
        }
        spans.push(Span::styled(*key, styles::key_highlight(&theme.palette)));
        spans.push(Span::styled(format!(" {label}"), styles::key_hint(&theme.palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Clear, Widget};

use crate::engine::navigation::{DropdownId, NavItem, NavState, NavTree, Route};
use crate::store::progress::ProgressStore;
use crate::ui::theme::Theme;

/// Room for the indent and the completion mark next to entry labels.
const ENTRY_PAD: u16 = 6;

/// One selectable line inside an open dropdown or the collapsible menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuRow {
    Item(usize),
    Entry { dropdown: DropdownId, index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavHit {
    Item(usize),
    Row(MenuRow),
    MenuToggle,
    /// Inside the bar or a panel, but not on anything actionable.
    Inside,
}

/// Screen placement of every navigation element, shared by rendering and
/// mouse hit-testing so the two never disagree.
#[derive(Clone, Debug, Default)]
pub struct NavGeometry {
    pub bar: Rect,
    pub title: Rect,
    pub items: Vec<Rect>,
    pub menu_toggle: Option<Rect>,
    pub panel: Option<Rect>,
    pub rows: Vec<(Rect, MenuRow)>,
}

pub fn item_label(index: usize, item: &NavItem, open: bool) -> String {
    match item {
        NavItem::Link { label, .. } => format!(" {} {label} ", index + 1),
        NavItem::Dropdown { label, .. } => {
            let arrow = if open { "▴" } else { "▾" };
            format!(" {} {label} {arrow} ", index + 1)
        }
    }
}

/// Rows of whatever panel is open: the menu (with the open dropdown
/// expanded in place) or, with the menu closed, the open dropdown alone.
pub fn menu_rows(tree: &NavTree, state: &NavState) -> Vec<MenuRow> {
    let mut rows = Vec::new();
    if state.menu_open && !state.desktop {
        for (i, item) in tree.items.iter().enumerate() {
            rows.push(MenuRow::Item(i));
            if let NavItem::Dropdown { id, items, .. } = item
                && state.is_open(*id)
            {
                rows.extend((0..items.len()).map(|index| MenuRow::Entry { dropdown: *id, index }));
            }
        }
    } else if let Some(id) = state.open_dropdown
        && let Some(items) = tree.dropdown_items(id)
    {
        rows.extend((0..items.len()).map(|index| MenuRow::Entry { dropdown: id, index }));
    }
    rows
}

fn text_width(s: &str) -> u16 {
    Span::raw(s).width() as u16
}

impl NavGeometry {
    pub fn compute(area: Rect, bar: Rect, tree: &NavTree, state: &NavState, title: &str, menu_label: &str) -> Self {
        let title_rect = Rect::new(bar.x, bar.y, text_width(title).min(bar.width), 1);
        let mut geo = Self {
            bar,
            title: title_rect,
            ..Self::default()
        };

        let rows = menu_rows(tree, state);
        let inner_width = rows
            .iter()
            .map(|row| match *row {
                MenuRow::Item(i) => text_width(&item_label(i, &tree.items[i], true)),
                MenuRow::Entry { dropdown, index } => tree
                    .dropdown_items(dropdown)
                    .and_then(|items| items.get(index))
                    .map(|e| text_width(&e.label) + ENTRY_PAD)
                    .unwrap_or(0),
            })
            .max()
            .unwrap_or(0);

        if state.desktop {
            let mut x = title_rect.right().saturating_add(1);
            for (i, item) in tree.items.iter().enumerate() {
                let open = matches!(item, NavItem::Dropdown { id, .. } if state.is_open(*id));
                let w = text_width(&item_label(i, item, open)).min(bar.right().saturating_sub(x));
                geo.items.push(Rect::new(x, bar.y, w, 1));
                x = x.saturating_add(w);
            }
            if let Some(id) = state.open_dropdown
                && let Some(idx) = tree
                    .items
                    .iter()
                    .position(|it| matches!(it, NavItem::Dropdown { id: d, .. } if *d == id))
            {
                let anchor = geo.items[idx].x;
                geo.place_panel(area, anchor, bar.y + 1, inner_width, rows);
            }
        } else {
            let w = (text_width(menu_label) + 2).min(bar.width);
            let toggle = Rect::new(bar.right().saturating_sub(w), bar.y, w, 1);
            geo.menu_toggle = Some(toggle);
            if !rows.is_empty() {
                let anchor = if state.menu_open { bar.x } else { toggle.x };
                geo.place_panel(area, anchor, bar.y + 1, inner_width, rows);
            }
        }
        geo
    }

    fn place_panel(&mut self, area: Rect, x: u16, y: u16, inner_width: u16, rows: Vec<MenuRow>) {
        let width = (inner_width + 2).min(area.width);
        let x = if x + width > area.right() {
            area.right().saturating_sub(width)
        } else {
            x
        };
        let height = (rows.len() as u16 + 2).min(area.bottom().saturating_sub(y));
        if height < 3 {
            return;
        }
        let panel = Rect::new(x, y, width, height);
        self.panel = Some(panel);
        let inner = Rect::new(x + 1, y + 1, width.saturating_sub(2), height - 2);
        for (i, row) in rows.into_iter().enumerate() {
            let ry = inner.y + i as u16;
            if ry >= inner.bottom() {
                break;
            }
            self.rows.push((Rect::new(inner.x, ry, inner.width, 1), row));
        }
    }

    pub fn hit(&self, x: u16, y: u16) -> Option<NavHit> {
        let pos = Position::new(x, y);
        if let Some((_, row)) = self.rows.iter().find(|(r, _)| r.contains(pos)) {
            return Some(NavHit::Row(*row));
        }
        if let Some(i) = self.items.iter().position(|r| r.contains(pos)) {
            return Some(NavHit::Item(i));
        }
        if self.menu_toggle.is_some_and(|r| r.contains(pos)) {
            return Some(NavHit::MenuToggle);
        }
        if self.panel.is_some_and(|r| r.contains(pos)) || self.bar.contains(pos) {
            return Some(NavHit::Inside);
        }
        None
    }

    /// Whether the pointer is over a dropdown's toggle or its open panel.
    pub fn over_dropdown(&self, tree: &NavTree, id: DropdownId, x: u16, y: u16) -> bool {
        match self.hit(x, y) {
            Some(NavHit::Item(i)) => tree.dropdown_at(i) == Some(id),
            Some(NavHit::Row(MenuRow::Entry { dropdown, .. })) => dropdown == id,
            Some(NavHit::Inside) => self.panel.is_some_and(|r| r.contains(Position::new(x, y))),
            _ => false,
        }
    }
}

pub struct NavBar<'a> {
    pub tree: &'a NavTree,
    pub state: &'a NavState,
    pub geometry: &'a NavGeometry,
    pub progress: &'a ProgressStore,
    pub current: &'a Route,
    pub cursor: usize,
    pub title: &'a str,
    pub menu_label: &'a str,
    pub theme: &'a Theme,
}

impl NavBar<'_> {
    fn item_is_current(&self, item: &NavItem) -> bool {
        match item {
            NavItem::Link { route, .. } => route == self.current,
            NavItem::Dropdown { items, .. } => items
                .iter()
                .any(|e| e.target.as_ref() == Some(self.current)),
        }
    }
}

impl Widget for NavBar<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bar_style = Style::default().fg(colors.header_fg()).bg(colors.header_bg());
        buf.set_style(self.geometry.bar, bar_style);

        buf.set_string(
            self.geometry.title.x,
            self.geometry.title.y,
            self.title,
            bar_style.fg(colors.accent()).add_modifier(Modifier::BOLD),
        );

        for (i, rect) in self.geometry.items.iter().enumerate() {
            let item = &self.tree.items[i];
            let open = matches!(item, NavItem::Dropdown { id, .. } if self.state.is_open(*id));
            let mut style = bar_style;
            if open {
                style = style.bg(colors.selection_bg());
            }
            if self.item_is_current(item) {
                style = style.fg(colors.accent()).add_modifier(Modifier::UNDERLINED);
            }
            buf.set_stringn(rect.x, rect.y, item_label(i, item, open), rect.width as usize, style);
        }

        if let Some(toggle) = self.geometry.menu_toggle {
            let style = if self.state.menu_open {
                bar_style.fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                bar_style
            };
            buf.set_stringn(toggle.x, toggle.y, format!(" {} ", self.menu_label), toggle.width as usize, style);
        }

        let Some(panel) = self.geometry.panel else {
            return;
        };
        Clear.render(panel, buf);
        Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()))
            .render(panel, buf);

        for (n, (rect, row)) in self.geometry.rows.iter().enumerate() {
            let mut style = Style::default().fg(colors.fg()).bg(colors.bg());
            let text = match *row {
                MenuRow::Item(i) => {
                    let item = &self.tree.items[i];
                    let open = matches!(item, NavItem::Dropdown { id, .. } if self.state.is_open(*id));
                    if self.item_is_current(item) {
                        style = style.fg(colors.accent());
                    }
                    item_label(i, item, open)
                }
                MenuRow::Entry { dropdown, index } => {
                    let Some(entry) = self.tree.dropdown_items(dropdown).and_then(|e| e.get(index)) else {
                        continue;
                    };
                    let indent = if self.state.menu_open { "    " } else { " " };
                    match entry.target {
                        None => {
                            style = style.fg(colors.muted()).add_modifier(Modifier::ITALIC);
                            format!("{indent}{}", entry.label)
                        }
                        Some(Route::Lesson(ref id)) if self.progress.is_complete(id) => {
                            style = style.fg(colors.completed());
                            format!("{indent}{} ✅", entry.label)
                        }
                        Some(ref target) => {
                            if target == self.current {
                                style = style.fg(colors.accent());
                            }
                            format!("{indent}{}", entry.label)
                        }
                    }
                }
            };
            if n == self.cursor {
                style = style.bg(colors.selection_bg()).add_modifier(Modifier::BOLD);
                buf.set_style(*rect, style);
            }
            buf.set_stringn(rect.x, rect.y, text, rect.width as usize, style);
        }
    }
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppMode, HitMap};
use crate::components::dialog::DialogWidget;
use crate::components::file_list::FileListWidget;
use crate::components::folder_tree::FolderTreeWidget;
use crate::components::settings::SettingsWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tabs::TabStripWidget;
use crate::fs::vault::VaultStore;
use crate::panes::split::PaneSplit;
use crate::panes::{Focus, Panel};
use crate::settings::Layout as PaneLayout;
use crate::theme::ThemeColors;

/// Areas of the two panes and the divider between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    pub folders: Rect,
    pub divider: Rect,
    pub files: Rect,
}

/// Split `area` along the layout's axis: files right of the tree in the
/// vertical layout, below it in the horizontal one.
pub fn pane_areas(area: Rect, layout: PaneLayout, split: &PaneSplit) -> PaneAreas {
    match layout {
        PaneLayout::Vertical => {
            let folder = split
                .folder_extent(area.width)
                .min(area.width.saturating_sub(1));
            let rest = area.width.saturating_sub(folder + 1);
            PaneAreas {
                folders: Rect::new(area.x, area.y, folder, area.height),
                divider: Rect::new(area.x + folder, area.y, area.width.min(1), area.height),
                files: Rect::new(area.x + folder + 1, area.y, rest, area.height),
            }
        }
        PaneLayout::Horizontal => {
            let folder = split
                .folder_extent(area.height)
                .min(area.height.saturating_sub(1));
            let rest = area.height.saturating_sub(folder + 1);
            PaneAreas {
                folders: Rect::new(area.x, area.y, area.width, folder),
                divider: Rect::new(area.x, area.y + folder, area.width, area.height.min(1)),
                files: Rect::new(area.x, area.y + folder + 1, area.width, rest),
            }
        }
    }
}

fn pane_block<'a>(title: &str, focused: bool, theme: &ThemeColors) -> Block<'a> {
    let border = if focused {
        theme.border_focused_fg
    } else {
        theme.border_fg
    };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn render_divider(area: Rect, layout: PaneLayout, dragging: bool, theme: &ThemeColors, buf: &mut Buffer) {
    let symbol = match layout {
        PaneLayout::Vertical => "│",
        PaneLayout::Horizontal => "─",
    };
    let color = if dragging {
        theme.accent_fg
    } else {
        theme.divider_fg
    };
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(symbol).set_fg(color);
            }
        }
    }
}

/// Render the application UI.
pub fn render<V: VaultStore>(app: &mut App<V>, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let tab_strip = TabStripWidget::new(
        app.workspace.leaves(),
        app.workspace.active_index(),
        &app.theme,
    );
    let tabs = tab_strip.tab_areas(tabs_area);
    frame.render_widget(tab_strip, tabs_area);

    if app.view.is_open() {
        render_panel(app, frame, main_area);
    } else {
        app.hit_map = HitMap::default();
        let hint = Paragraph::new("Panel closed. Press o to open.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.dim_fg));
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(main_area);
        frame.render_widget(hint, middle);
    }
    app.hit_map.tabs = tabs;

    render_status_bar(app, frame, status_area);

    match &app.mode {
        AppMode::Modal(modal) => {
            frame.render_widget(DialogWidget::new(modal, &app.theme), frame.area());
        }
        AppMode::Settings { row } => {
            frame.render_widget(
                SettingsWidget::new(app.settings.settings(), *row, &app.theme),
                frame.area(),
            );
        }
        AppMode::Normal => {}
    }
}

fn render_panel<V: VaultStore>(app: &mut App<V>, frame: &mut Frame, area: Rect) {
    let layout = app.view.layout();
    let areas = pane_areas(area, layout, &app.view.split);

    // Keep the cursors visible before building the widgets.
    let folder_height = areas.folders.height.saturating_sub(2) as usize;
    let file_height = areas.files.height.saturating_sub(3) as usize;
    app.view.folders.cursor.update_scroll(folder_height);
    app.view.files.cursor.update_scroll(file_height);

    let name_display = app.view.name_display();
    let focus = app.view.focus;

    let folder_title = app.vault.name().to_string();
    let tree = FolderTreeWidget::new(app.view.folders.rows(), app.view.folders.cursor, &app.theme)
        .focused(focus == Focus::Folders)
        .name_display(name_display)
        .block(pane_block(&folder_title, focus == Focus::Folders, &app.theme));
    let file_list = FileListWidget::new(app.view.files.listing(), app.view.files.cursor, &app.theme)
        .focused(focus == Focus::Files)
        .name_display(name_display)
        .block(pane_block("Files", focus == Focus::Files, &app.theme));

    let hit_map = HitMap {
        container: area,
        divider: Some(areas.divider),
        folder_rows: tree.row_areas(areas.folders),
        file_rows: file_list.row_areas(areas.files),
        new_note: file_list.new_note_area(areas.files),
        tabs: Vec::new(),
    };

    frame.render_widget(tree, areas.folders);
    frame.render_widget(file_list, areas.files);
    render_divider(
        areas.divider,
        layout,
        app.view.split.is_dragging(),
        &app.theme,
        frame.buffer_mut(),
    );

    app.hit_map = hit_map;
}

fn render_status_bar<V: VaultStore>(app: &App<V>, frame: &mut Frame, area: Rect) {
    let location = app.location();
    let info = app.pane_info();
    let leaf_info = app.leaf_info();

    let mut status = StatusBarWidget::new(&location, &info, &app.theme);
    if let Some(leaf) = leaf_info.as_deref() {
        status = status.leaf_info(leaf);
    }
    if let Some(watcher) = app.watcher_status() {
        status = status.watcher_status(watcher);
    }
    if let Some((notice, _)) = &app.status_message {
        status = status.status_message(&notice.message, notice.is_error);
    }
    frame.render_widget(status, area);
}

pub mod dialog;
pub mod file_list;
pub mod folder_tree;
pub mod settings;
pub mod status_bar;
pub mod tabs;

use ratatui::layout::Rect;

use crate::settings::NameDisplay;

/// Lay out `prefix` + `name` in `width` columns.
///
/// Truncation cuts the text and ends it with `…`; wrapping continues the name
/// on following lines, aligned under its first character.
pub fn fit_name(prefix: &str, name: &str, width: usize, mode: NameDisplay) -> Vec<String> {
    let prefix_len = prefix.chars().count();
    let total = prefix_len + name.chars().count();
    if width == 0 {
        return vec![String::new()];
    }
    if total <= width {
        return vec![format!("{}{}", prefix, name)];
    }
    match mode {
        NameDisplay::Wrap if width > prefix_len => {
            let chunk = width - prefix_len;
            let chars: Vec<char> = name.chars().collect();
            chars
                .chunks(chunk)
                .enumerate()
                .map(|(i, part)| {
                    let lead = if i == 0 {
                        prefix.to_string()
                    } else {
                        " ".repeat(prefix_len)
                    };
                    format!("{}{}", lead, part.iter().collect::<String>())
                })
                .collect()
        }
        _ => {
            let mut line: String = prefix.chars().chain(name.chars()).take(width - 1).collect();
            line.push('…');
            vec![line]
        }
    }
}

/// Place rows of varying height from `start`, nudging the window forward so
/// the `cursor` row is fully visible. Returns `(row index, row area)` pairs.
pub fn place_rows(heights: &[u16], start: usize, cursor: usize, area: Rect) -> Vec<(usize, Rect)> {
    if heights.is_empty() || area.height == 0 {
        return Vec::new();
    }
    let cursor = cursor.min(heights.len() - 1);
    let mut start = start.min(cursor);
    while start < cursor
        && heights[start..=cursor].iter().map(|h| u32::from(*h)).sum::<u32>()
            > u32::from(area.height)
    {
        start += 1;
    }

    let mut placed = Vec::new();
    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, height) in heights.iter().enumerate().skip(start) {
        if y >= bottom {
            break;
        }
        let h = (*height).min(bottom - y);
        placed.push((index, Rect::new(area.x, y, area.width, h)));
        y += h;
    }
    placed
}

/// Text content of a buffer region, one line per row. Used by widget tests.
#[cfg(test)]
pub fn buffer_to_string(buf: &ratatui::buffer::Buffer, area: Rect) -> String {
    let mut s = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            s.push_str(buf.cell((x, y)).map_or(" ", |c| c.symbol()));
        }
        s.push('\n');
    }
    s
}

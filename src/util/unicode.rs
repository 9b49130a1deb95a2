use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Control characters (tabs, newlines)
/// count as one cell since table cells are printed with them flattened.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true)
        .map(|g| {
            if g.chars().any(char::is_control) {
                1
            } else {
                UnicodeWidthStr::width(g)
            }
        })
        .sum()
}

/// Replace newlines and tabs with spaces so a value fits on one line.
pub fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Fit `s` into exactly `cells` cells: flattened, truncated, then right-padded.
pub fn column(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(&flatten(s), cells);
    let width = display_width(&out);
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(width)));
    out
}

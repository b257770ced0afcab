//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen layout: a centred picker box above a one-line status bar.
pub struct AppLayout {
    pub picker_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.  The picker is as
    /// tall as its rows need, up to the available space.
    pub fn from_area(area: Rect, rows: usize) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        // Two border rows plus at least one content row.
        let wanted = u16::try_from(rows.max(1)).unwrap_or(u16::MAX).saturating_add(2);
        Self {
            picker_area: centered(72, wanted, chunks[0]),
            status_area: chunks[1],
        }
    }
}

/// Centre a `width`×`height` rectangle in `area`, clamped to fit.
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_fits_rows_and_clamps() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::from_area(area, 4);
        assert_eq!(layout.picker_area.height, 6);
        assert_eq!(layout.picker_area.width, 72);
        assert_eq!(layout.status_area, Rect::new(0, 29, 100, 1));

        let tall = AppLayout::from_area(area, 500);
        assert_eq!(tall.picker_area.height, 29);
    }
}

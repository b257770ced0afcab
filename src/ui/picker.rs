//! Ratatui widget for the scheme picker.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, StatefulWidget, Widget},
};

use crate::app::state::PickerState;

use super::theme::Theme;

/// Renders the history as a selectable list: label, then the full path
/// dimmed.  The active scheme carries a marker.
pub struct PickerWidget;

impl StatefulWidget for PickerWidget {
    type State = PickerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" {} ", state.mode.title()))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        if state.entries.is_empty() {
            let line = Line::from(Span::styled(
                "  No color schemes tracked yet",
                Theme::placeholder_style(),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        state.clamp_scroll(inner.height as usize);

        let rows = state
            .entries
            .iter()
            .zip(&state.labels)
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, (entry, label))) in rows.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.selected;
            let is_active = state.active.as_deref() == Some(entry.as_str());

            let prefix = if is_selected { " ▸ " } else { "   " };
            let marker = if is_active { "● " } else { "  " };
            let (label_style, path_style, marker_style) = if is_selected {
                let s = Theme::selected_style();
                (s, s, s)
            } else {
                (
                    Theme::entry_style(),
                    Theme::path_style(),
                    Theme::active_marker_style(),
                )
            };

            let mut spans = vec![
                Span::styled(prefix, label_style),
                Span::styled(marker, marker_style),
                Span::styled(label.clone(), label_style),
            ];
            if entry != label {
                spans.push(Span::styled(format!("  {entry}"), path_style));
            }

            // Pad the selected row so the highlight spans the full width.
            let line = Line::from(spans);
            if is_selected {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), label_style);
            }
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

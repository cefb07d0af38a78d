use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::carousel::FrameOutput;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let (state_str, state_color) = match app.frame.as_ref() {
            Some(out) if out.snapping => ("SNAP", theme.snapping),
            Some(out) if out.at_rest => ("REST", theme.resting),
            Some(_) => ("MOVE", theme.accent),
            None => ("IDLE", theme.grey1),
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            app.frame
                .as_ref()
                .map(|out| Self::describe(out, app.config.ui.show_metrics))
                .unwrap_or_else(|| " empty chain".to_string())
        };

        let help_hint = " h/l:step j/k:nudge 0:home ?:help q:quit ";
        let used = state_str.len() + 2 + status_text.chars().count() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", state_str),
                Style::default().fg(theme.bg0).bg(state_color),
            ),
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn describe(out: &FrameOutput, show_metrics: bool) -> String {
        let focused = out
            .focused
            .as_ref()
            .map(|item| {
                if item.label.is_empty() {
                    format!("level {}", item.level)
                } else {
                    format!("{} ({})", item.label, item.level)
                }
            })
            .unwrap_or_else(|| "-".to_string());

        if show_metrics {
            format!(
                " {} | pos {:+.2} | focus {:.2} | {:.0}x{:.0}",
                focused,
                out.position,
                out.focus_scale,
                out.blended_size.width,
                out.blended_size.height
            )
        } else {
            format!(" {}", focused)
        }
    }
}

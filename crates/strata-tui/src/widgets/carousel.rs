use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, LineGauge, Paragraph},
    Frame,
};
use strata_core::LayoutAxis;
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::carousel::ItemVisual;

/// Pixels covered by one terminal column
const PX_PER_COL: f64 = 8.0;
/// Pixels covered by one terminal row
const PX_PER_ROW: f64 = 16.0;
/// Smallest card that still fits a border and one line
const MIN_CARD: f64 = 3.0;

pub struct CarouselWidget;

impl CarouselWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let block = Block::default()
            .title(Self::title(app))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (Some(out), Some(chain)) = (app.frame.as_ref(), app.engine.chain()) else {
            let empty = Paragraph::new("No chain loaded")
                .style(Style::default().fg(theme.grey1))
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        };

        if inner.height < 2 {
            return;
        }

        // Focus gauge on the first row, cards below
        let gauge_area = Rect::new(inner.x, inner.y, inner.width, 1);
        let stage = Rect::new(inner.x, inner.y + 1, inner.width, inner.height - 1);

        let gauge = LineGauge::default()
            .ratio(out.focus_scale.clamp(0.0, 1.0))
            .label(format!("focus {:.2}", out.focus_scale))
            .filled_style(Style::default().fg(theme.focused))
            .unfilled_style(Style::default().fg(theme.bg2));
        frame.render_widget(gauge, gauge_area);

        let focused_level = out.focused.as_ref().map(|item| item.level);

        // Far items first so the nearest card ends up on top
        let mut visuals: Vec<&ItemVisual> = out.items.iter().collect();
        visuals.sort_by(|a, b| {
            let da = (a.level as f64 - out.position).abs();
            let db = (b.level as f64 - out.position).abs();
            db.total_cmp(&da)
        });

        for visual in visuals {
            let Some(rect) = card_rect(visual, app.config.layout.axis, stage) else {
                continue;
            };

            let base = if !visual.reachable {
                theme.unreachable
            } else if Some(visual.level) == focused_level {
                theme.focused
            } else {
                theme.fg0
            };
            let color = theme.fade(base, visual.opacity);

            let label = chain
                .item_at(visual.level)
                .map(|item| item.label.as_str())
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("level {}", visual.level));

            let mut style = Style::default().fg(color).bg(theme.bg1);
            if Some(visual.level) == focused_level {
                style = style.add_modifier(Modifier::BOLD);
            }

            let card = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.bg1));
            let text = vec![
                Line::from(truncate(&label, rect.width.saturating_sub(2) as usize)),
                Line::from(format!("{:+}", visual.level)),
            ];

            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(text)
                    .block(card)
                    .style(style)
                    .alignment(Alignment::Center),
                rect,
            );
        }
    }

    fn title(app: &App) -> String {
        match app.engine.chain() {
            Some(chain) => format!(" {} ", chain.id().dimension),
            None => " Carousel ".to_string(),
        }
    }
}

/// Terminal rect for an item, clipped to `stage`
fn card_rect(visual: &ItemVisual, axis: LayoutAxis, stage: Rect) -> Option<Rect> {
    let width = (visual.size.width * visual.scale / PX_PER_COL).max(MIN_CARD);
    let height = (visual.size.height * visual.scale / PX_PER_ROW).max(MIN_CARD);

    let mut center_x = stage.x as f64 + stage.width as f64 / 2.0;
    let mut center_y = stage.y as f64 + stage.height as f64 / 2.0;
    match axis {
        LayoutAxis::Horizontal => center_x += visual.offset / PX_PER_COL,
        LayoutAxis::Vertical => center_y += visual.offset / PX_PER_ROW,
    }

    clip(center_x - width / 2.0, center_y - height / 2.0, width, height, stage)
}

/// Intersect a floating rect with `area`; `None` when nothing usable remains
fn clip(x: f64, y: f64, width: f64, height: f64, area: Rect) -> Option<Rect> {
    let left = x.round().max(area.left() as f64);
    let top = y.round().max(area.top() as f64);
    let right = (x + width).round().min(area.right() as f64);
    let bottom = (y + height).round().min(area.bottom() as f64);

    if right - left < MIN_CARD || bottom - top < MIN_CARD {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Cut `text` to fit `max_width` display columns
fn truncate(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(ch);
    }
    out
}

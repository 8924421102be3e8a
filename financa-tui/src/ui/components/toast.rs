//! Transient notification rendered over the bottom-right corner.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::{Toast, ToastLevel};
use crate::ui::theme;

const TOAST_MAX_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

pub fn render_toast(f: &mut Frame, toast: &Toast) {
    let parent = f.area();
    if parent.width < 10 || parent.height < TOAST_HEIGHT + 1 {
        return;
    }

    let desired = (toast.message.chars().count().min(u16::MAX as usize) as u16).saturating_add(4);
    let width = desired
        .min(TOAST_MAX_WIDTH)
        .min(parent.width.saturating_sub(2));
    let area = Rect {
        x: parent.right().saturating_sub(width + 1),
        y: parent.bottom().saturating_sub(TOAST_HEIGHT + 1),
        width,
        height: TOAST_HEIGHT,
    };

    let (title, border_style) = match toast.level {
        ToastLevel::Info => (" Info ", theme::info_border_style()),
        ToastLevel::Success => (" OK ", Style::default().fg(theme::COLOR_POSITIVE)),
        ToastLevel::Error => (" Erro ", theme::danger_border_style()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let paragraph = Paragraph::new(Line::from(toast.message.as_str())).block(block);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

//! Popup editor for the description mapping of a transaction.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::DescriptionEditState;
use crate::ui::{layouts, theme, utils};

pub fn render_description_editor(f: &mut Frame, edit: &DescriptionEditState) {
    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::SMALL,
        " Editar descrição ",
        theme::info_border_style(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let original = Paragraph::new(Line::from(vec![
        Span::styled("original: ", theme::help_text_style()),
        Span::raw(utils::truncate(&edit.descricao_original, 40)),
    ]));
    f.render_widget(original, chunks[0]);

    let input = Paragraph::new(format!("{}█", edit.input))
        .style(Style::default().fg(theme::COLOR_INPUT_FOCUSED))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, chunks[1]);

    let hint = Paragraph::new("Enter: salvar | Esc: cancelar | igual ao original remove")
        .style(theme::help_text_style());
    f.render_widget(hint, chunks[2]);
}

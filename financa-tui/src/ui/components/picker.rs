//! Two-step category/subcategory picker popup.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::state::{InputMode, PickerState};
use crate::ui::{layouts, theme};

pub fn render_picker(f: &mut Frame, picker: &PickerState, input_mode: &InputMode) {
    let title = match input_mode {
        InputMode::SubcategoryPicker => " Subcategoria ",
        _ => " Categoria ",
    };

    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::MEDIUM,
        title,
        theme::accent_border_style(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(inner);

    // Filter input with cursor
    let input = Paragraph::new(format!("{}█", picker.input))
        .style(Style::default().fg(theme::COLOR_INPUT_FOCUSED))
        .block(Block::default().borders(Borders::ALL).title(" filtrar "));
    f.render_widget(input, chunks[0]);

    let options = picker.filtered_options();
    if options.is_empty() {
        let empty = Paragraph::new("nenhuma opção").style(theme::help_text_style());
        f.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let line = Line::from(option.as_str());
            if i == picker.selection_index {
                ListItem::new(line).style(theme::selection_style())
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));
    f.render_widget(list, chunks[1]);
}

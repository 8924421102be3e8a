use ratatui::{
    prelude::*,
    widgets::{List, ListItem},
    Frame,
};

use crate::state::InputMode;
use crate::ui::{layouts, screens::Screen, theme};

pub fn render_help_popup(f: &mut Frame, screen: &Screen) {
    let help_items = get_help_items(screen);

    // Use shared popup frame
    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::LARGE,
        " Ajuda (? ou Esc para fechar) ",
        theme::accent_border_style(),
    );

    let items: Vec<ListItem> = help_items
        .iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(*description),
            ]))
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));

    f.render_widget(list, inner);
}

fn get_help_items(screen: &Screen) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![];

    match screen {
        Screen::Dashboard(state) => {
            items.push(("↑/k", "Subir seleção"));
            items.push(("↓/j", "Descer seleção"));
            items.push(("Enter/Espaço", "Expandir/recolher categoria ou subcategoria"));
            items.push(("[ / ]", "Mês anterior / próximo mês"));
            items.push(("r", "Recarregar dados"));
            items.push(("c", "Reclassificar a transação selecionada"));
            items.push(("C", "Reclassificar todas com a mesma descrição"));
            items.push(("e", "Editar descrição (mapeamento)"));
            items.push(("x", "Remover mapeamento de descrição"));
            items.push(("m", "Mover por descrição (modo de movimento)"));
            items.push(("R", "Cadastrar como despesa recorrente"));
            items.push(("s / S", "Trocar coluna / direção de ordenação"));
            if state.input_mode == InputMode::Move {
                items.push(("", ""));
                items.push(("--- Movimento ---", ""));
                items.push(("j/k", "Escolher destino"));
                items.push(("Enter", "Confirmar destino"));
                items.push(("R", "Soltar no cadastro de recorrentes"));
                items.push(("Esc", "Cancelar"));
            }
        }
        Screen::Logs(..) => {
            items.push(("↑/k", "Rolar para cima (mais antigos)"));
            items.push(("↓/j", "Rolar para baixo (mais recentes)"));
            items.push(("Page Up", "Subir uma página"));
            items.push(("Page Down", "Descer uma página"));
            items.push(("g então g", "Ir para os mais antigos"));
            items.push(("G", "Ir para os mais recentes"));
        }
    }

    // Global help
    items.push(("", ""));
    items.push(("--- Global ---", ""));
    items.push(("h/←", "Voltar"));
    items.push(("g então l", "Abrir logs"));
    items.push(("g então g", "Ir para o topo"));
    items.push(("G", "Ir para o fim"));
    items.push(("?", "Mostrar/esconder esta ajuda"));
    items.push(("q", "Sair"));

    items
}

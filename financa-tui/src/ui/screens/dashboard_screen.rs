use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::state::tree::{CategoryGroup, SubcategoryGroup};
use crate::state::{DashboardState, InputMode, LoadingState, MoveTarget, RowRef};
use crate::ui::{
    components::{empty_state, help_bar, screen_title},
    layouts, theme, utils,
};
use financa_api::endpoints::transactions::Transaction;

pub fn render(f: &mut Frame, state: &DashboardState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    render_title(f, title_area, state);
    render_tree(f, content_area, state);
    render_help(f, help_area, state);
}

fn render_title(f: &mut Frame, area: Rect, state: &DashboardState) {
    let title = format!(
        "Painel financeiro — {}  [ordenar: {} {}]",
        state.month,
        state.sort.column.label(),
        state.sort.direction.arrow()
    );
    let paragraph = ratatui::widgets::Paragraph::new(title).style(theme::title_style());
    f.render_widget(paragraph, area);

    screen_title::render_screen_title(f, area, &state.taxonomy_loading);
}

fn render_tree(f: &mut Frame, area: Rect, state: &DashboardState) {
    if state.groups.is_empty() {
        let message = match &state.taxonomy_loading {
            LoadingState::Error(e) => format!("Erro ao carregar categorias: {}", e),
            LoadingState::Loading(_) => "Carregando categorias…".to_string(),
            _ => "Nenhuma categoria".to_string(),
        };
        empty_state::render_empty_state(
            f,
            area,
            " Categorias ",
            &message,
            Some("r recarrega os dados"),
        );
        return;
    }

    // The drop destination currently under the cursor, if a move is active
    let current_target: Option<MoveTarget> = state
        .move_state
        .as_ref()
        .and_then(|ms| state.move_targets().into_iter().nth(ms.target_index));
    let grabbed: Option<&str> = state.move_state.as_ref().map(|ms| ms.descricao.as_str());

    let rows: Vec<Row> = state
        .visible_rows()
        .into_iter()
        .map(|row_ref| match row_ref {
            RowRef::Category(gi) => {
                category_row(&state.groups[gi], current_target.as_ref())
            }
            RowRef::Subcategory(gi, si) => {
                let group = &state.groups[gi];
                subcategory_row(group, &group.subgroups[si], current_target.as_ref())
            }
            RowRef::Transaction(gi, si, ti) => {
                transaction_row(&state.groups[gi].subgroups[si].rows[ti], grabbed)
            }
        })
        .collect();

    let widths = [
        Constraint::Min(26),    // Tree / date
        Constraint::Min(24),    // Description / variance
        Constraint::Length(16), // Amount
        Constraint::Length(8),  // Installment
    ];

    let table = Table::new(rows, widths)
        .column_spacing(theme::TABLE_COLUMN_SPACING)
        .block(Block::default().borders(Borders::ALL).title(" Categorias "))
        .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut state.table_state.borrow_mut());
}

fn category_row<'a>(group: &'a CategoryGroup, target: Option<&MoveTarget>) -> Row<'a> {
    let marker = if group.expanded { "▾" } else { "▸" };
    let label = format!("{} {} ({})", marker, group.categoria, group.count());

    let mut label_lines = vec![Line::from(label)];
    let mut height = 1;
    if group.expanded {
        match &group.loading {
            LoadingState::Loading(_) => {
                label_lines.push(Line::styled("  Carregando…", theme::loading_style()));
                height = 2;
            }
            LoadingState::Error(_) => {
                label_lines.push(Line::styled(
                    "  Erro ao carregar dados",
                    theme::danger_border_style(),
                ));
                height = 2;
            }
            _ => {}
        }
    }

    // A flat category carries its single bucket's variance badge itself
    let badge = if group.is_flat() {
        group
            .variance_for(&group.subgroups[0])
            .map(|v| variance_span(v.variacao_pct))
    } else {
        None
    };

    let total = group.total();
    let mut row = Row::new(vec![
        Cell::from(Text::from(label_lines)),
        Cell::from(badge.map(Line::from).unwrap_or_default()),
        Cell::from(
            Line::styled(
                utils::fmt_valor(total),
                Style::default().fg(theme::amount_color(total.inner())),
            )
            .alignment(Alignment::Right),
        ),
        Cell::from(""),
    ])
    .height(height);

    if is_category_target(group, target) {
        row = row.style(theme::move_target_style());
    } else {
        row = row.style(theme::header_style());
    }
    row
}

fn subcategory_row<'a>(
    group: &'a CategoryGroup,
    subgroup: &'a SubcategoryGroup,
    target: Option<&MoveTarget>,
) -> Row<'a> {
    let marker = if subgroup.expanded { "▾" } else { "▸" };
    let label = format!("  {} {} ({})", marker, subgroup.nome, subgroup.count());

    let badge = group
        .variance_for(subgroup)
        .map(|v| variance_span(v.variacao_pct));

    let total = subgroup.total();
    let mut row = Row::new(vec![
        Cell::from(label),
        Cell::from(badge.map(Line::from).unwrap_or_default()),
        Cell::from(
            Line::styled(
                utils::fmt_valor(total),
                Style::default().fg(theme::amount_color(total.inner())),
            )
            .alignment(Alignment::Right),
        ),
        Cell::from(""),
    ]);

    if is_subcategory_target(group, subgroup, target) {
        row = row.style(theme::move_target_style());
    }
    row
}

fn transaction_row<'a>(transaction: &'a Transaction, grabbed: Option<&str>) -> Row<'a> {
    let data = transaction
        .data
        .as_deref()
        .map(utils::fmt_data)
        .unwrap_or_default();

    let mut descricao = transaction.descricao.clone();
    if transaction.tem_mapeamento {
        // Mapped rows carry a marker so the rename stays visible
        descricao.push_str(" ✦");
    }

    let mut row = Row::new(vec![
        Cell::from(format!("    {}", data)),
        Cell::from(descricao),
        Cell::from(
            Line::styled(
                utils::fmt_valor(transaction.valor),
                Style::default().fg(theme::amount_color(transaction.valor.inner())),
            )
            .alignment(Alignment::Right),
        ),
        Cell::from(transaction.parcela.clone().unwrap_or_default()),
    ]);

    if grabbed.is_some_and(|d| d == transaction.descricao) {
        row = row.style(theme::move_source_style());
    }
    row
}

fn variance_span(variacao_pct: f64) -> Span<'static> {
    Span::styled(
        format!("[{}]", utils::fmt_variance(variacao_pct)),
        Style::default().fg(theme::variance_color(variacao_pct)),
    )
}

fn is_category_target(group: &CategoryGroup, target: Option<&MoveTarget>) -> bool {
    target.is_some_and(|t| t.categoria == group.categoria && t.subcategoria.is_none())
}

fn is_subcategory_target(
    group: &CategoryGroup,
    subgroup: &SubcategoryGroup,
    target: Option<&MoveTarget>,
) -> bool {
    target.is_some_and(|t| {
        t.categoria == group.categoria && t.subcategoria.as_deref() == Some(&subgroup.nome)
    })
}

fn render_help(f: &mut Frame, area: Rect, state: &DashboardState) {
    let help_text = match state.input_mode {
        InputMode::Move => "j/k: destino | Enter: soltar | R: recorrente | Esc: cancelar",
        InputMode::CategoryPicker | InputMode::SubcategoryPicker => {
            "digite para filtrar | ↑/↓: navegar | Enter: escolher | Esc: cancelar"
        }
        InputMode::DescriptionEdit => "Enter: salvar | Esc: cancelar",
        InputMode::Normal => {
            "j/k: navegar | Enter: expandir | [/]: mês | c: categoria | e: descrição | m: mover | ?: ajuda"
        }
    };
    help_bar::render_help_bar(f, area, help_text);
}

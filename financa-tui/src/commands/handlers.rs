use crate::events::{AppCommand, EditTarget};
use crate::input::{Key, KeyEvent};
use crate::state::{AppState, DashboardState, InputMode, RowRef};
use crate::ui::screens::Screen;

/// Pure function to handle key input and generate commands
///
/// Editor modes swallow the keyboard first, then overlays, then key
/// sequences, then the per-screen bindings.
pub fn handle_key_input(key_event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = key_event.key;

    // Editor modes take the whole keyboard while active
    if let Screen::Dashboard(dashboard) = state.current_screen() {
        match dashboard.input_mode {
            InputMode::CategoryPicker | InputMode::SubcategoryPicker => {
                return handle_picker_keys(key);
            }
            InputMode::DescriptionEdit => return handle_description_edit_keys(key),
            InputMode::Move => return handle_move_keys(key),
            InputMode::Normal => {}
        }
    }

    // Handle help popup if visible
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    if key == Key::Esc {
        if state.toast.is_some() {
            return Some(AppCommand::DismissToast);
        }
        return Some(AppCommand::NavigateBack);
    }

    // Multi-key sequences
    if let Some(pending) = state.pending_key {
        return match (pending, key) {
            ('g', Key::Char('g')) => Some(AppCommand::NavigateToTop),
            ('g', Key::Char('l')) => Some(AppCommand::NavigateToLogs),
            _ => Some(AppCommand::ClearPendingKey),
        };
    }

    // Global bindings
    match key {
        Key::Char('?') => return Some(AppCommand::ToggleHelp),
        Key::Char('q') => return Some(AppCommand::Quit),
        Key::Char('g') => return Some(AppCommand::SetPendingKey('g')),
        Key::Char('G') | Key::End => return Some(AppCommand::NavigateToBottom),
        Key::Home => return Some(AppCommand::NavigateToTop),
        Key::Char('h') | Key::Left => return Some(AppCommand::NavigateBack),
        _ => {}
    }

    match state.current_screen() {
        Screen::Dashboard(dashboard) => handle_dashboard_keys(key, dashboard),
        Screen::Logs(_) => handle_logs_keys(key),
    }
}

fn handle_picker_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Esc => Some(AppCommand::CancelPicker),
        Key::Enter => Some(AppCommand::ConfirmPickerSelection),
        Key::Up | Key::BackTab => Some(AppCommand::SelectPickerItem { up: true }),
        Key::Down | Key::Tab => Some(AppCommand::SelectPickerItem { up: false }),
        Key::Backspace => Some(AppCommand::DeletePickerChar),
        Key::Char(c) if c != '\0' => Some(AppCommand::AppendPickerChar(c)),
        _ => None,
    }
}

fn handle_description_edit_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Esc => Some(AppCommand::CancelDescriptionEdit),
        Key::Enter => Some(AppCommand::SubmitDescriptionEdit),
        Key::Backspace => Some(AppCommand::DeleteEditorChar),
        Key::Char(c) if c != '\0' => Some(AppCommand::AppendEditorChar(c)),
        _ => None,
    }
}

fn handle_move_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Esc => Some(AppCommand::CancelMove),
        Key::Enter => Some(AppCommand::ConfirmMove),
        Key::Char('j') | Key::Down => Some(AppCommand::MoveTargetNext),
        Key::Char('k') | Key::Up => Some(AppCommand::MoveTargetPrevious),
        Key::Char('R') => Some(AppCommand::ConfirmMoveRecurring),
        _ => None,
    }
}

fn handle_dashboard_keys(key: Key, dashboard: &DashboardState) -> Option<AppCommand> {
    match key {
        Key::Char('j') | Key::Down => Some(AppCommand::SelectNext),
        Key::Char('k') | Key::Up => Some(AppCommand::SelectPrevious),

        Key::Enter | Key::Char(' ') => match dashboard.selected_row()? {
            RowRef::Category(gi) => Some(AppCommand::ToggleCategory {
                categoria: dashboard.groups[gi].categoria.clone(),
            }),
            RowRef::Subcategory(gi, si) => Some(AppCommand::ToggleSubcategory {
                categoria: dashboard.groups[gi].categoria.clone(),
                subcategoria: dashboard.groups[gi].subgroups[si].nome.clone(),
            }),
            RowRef::Transaction(..) => None,
        },

        Key::Char('[') => Some(AppCommand::NavigateMonth { forward: false }),
        Key::Char(']') => Some(AppCommand::NavigateMonth { forward: true }),
        Key::Char('r') => Some(AppCommand::RefreshDashboard),

        Key::Char('c') => {
            let transaction = dashboard.selected_transaction()?;
            let target = match transaction.id {
                Some(id) => EditTarget::Row {
                    id,
                    descricao: transaction.descricao.clone(),
                },
                None => EditTarget::Descricao {
                    descricao: transaction.descricao.clone(),
                },
            };
            Some(AppCommand::OpenCategoryEditor { target })
        }

        Key::Char('C') => {
            let transaction = dashboard.selected_transaction()?;
            Some(AppCommand::OpenCategoryEditor {
                target: EditTarget::Descricao {
                    descricao: transaction.descricao.clone(),
                },
            })
        }

        Key::Char('e') => {
            let transaction = dashboard.selected_transaction()?;
            Some(AppCommand::OpenDescriptionEditor {
                descricao_original: transaction.original_descricao().to_string(),
                descricao_atual: transaction.descricao.clone(),
            })
        }

        Key::Char('x') => {
            let transaction = dashboard.selected_transaction()?;
            if !transaction.tem_mapeamento {
                return None;
            }
            Some(AppCommand::DeleteMapping {
                descricao_original: transaction.original_descricao().to_string(),
            })
        }

        Key::Char('R') => {
            let transaction = dashboard.selected_transaction()?;
            Some(AppCommand::AddRecurring {
                descricao: transaction.descricao.clone(),
                categoria: transaction.categoria.clone(),
                valor: transaction.valor,
            })
        }

        Key::Char('m') => {
            let transaction = dashboard.selected_transaction()?;
            // A blank description cannot address anything on the server
            if transaction.descricao.trim().is_empty() {
                return None;
            }
            Some(AppCommand::EnterMoveMode {
                descricao: transaction.descricao.clone(),
                source_categoria: transaction.categoria.clone(),
            })
        }

        Key::Char('s') => Some(AppCommand::CycleSortColumn),
        Key::Char('S') => Some(AppCommand::ToggleSortDirection),

        _ => None,
    }
}

fn handle_logs_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Char('j') | Key::Down => Some(AppCommand::ScrollLogsDown),
        Key::Char('k') | Key::Up => Some(AppCommand::ScrollLogsUp),
        Key::PageUp => Some(AppCommand::ScrollLogsPageUp),
        Key::PageDown => Some(AppCommand::ScrollLogsPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tree::CategoryGroup;
    use crate::state::LoadingState;
    use financa_api::endpoints::transactions::Transaction;
    use financa_api::endpoints::{TransactionId, Valor};

    fn key(key: Key) -> KeyEvent {
        KeyEvent::new(key)
    }

    fn transaction(id: Option<i64>, descricao: &str) -> Transaction {
        Transaction {
            id: id.map(TransactionId::new),
            data: Some("2025-08-10".to_string()),
            descricao: descricao.to_string(),
            descricao_original: None,
            tem_mapeamento: false,
            categoria: "Mercado".to_string(),
            subcategoria: None,
            valor: Valor::new(-10.0),
            parcela: None,
        }
    }

    fn state_with_selected_transaction(transaction_row: Transaction) -> AppState {
        let mut state = AppState::new();
        let dashboard = state.dashboard_mut().unwrap();
        let mut group = CategoryGroup::new("Mercado");
        group.expanded = true;
        group.loading = LoadingState::Loaded;
        group.set_transactions(vec![transaction_row]);
        dashboard.groups = vec![group];
        // Row 0 is the category header, row 1 the transaction
        dashboard.table_state.borrow_mut().select(Some(1));
        state
    }

    #[test]
    fn q_quits() {
        let state = AppState::new();
        assert_eq!(
            handle_key_input(key(Key::Char('q')), &state),
            Some(AppCommand::Quit)
        );
    }

    #[test]
    fn question_mark_toggles_help() {
        let state = AppState::new();
        assert_eq!(
            handle_key_input(key(Key::Char('?')), &state),
            Some(AppCommand::ToggleHelp)
        );
    }

    #[test]
    fn help_popup_swallows_other_keys() {
        let mut state = AppState::new();
        state.help_visible = true;
        assert_eq!(handle_key_input(key(Key::Char('j')), &state), None);
        assert_eq!(
            handle_key_input(key(Key::Esc), &state),
            Some(AppCommand::ToggleHelp)
        );
    }

    #[test]
    fn g_sets_pending_key_then_gg_jumps_to_top() {
        let mut state = AppState::new();
        assert_eq!(
            handle_key_input(key(Key::Char('g')), &state),
            Some(AppCommand::SetPendingKey('g'))
        );
        state.pending_key = Some('g');
        assert_eq!(
            handle_key_input(key(Key::Char('g')), &state),
            Some(AppCommand::NavigateToTop)
        );
    }

    #[test]
    fn gl_navigates_to_logs_and_invalid_sequence_clears() {
        let mut state = AppState::new();
        state.pending_key = Some('g');
        assert_eq!(
            handle_key_input(key(Key::Char('l')), &state),
            Some(AppCommand::NavigateToLogs)
        );
        assert_eq!(
            handle_key_input(key(Key::Char('z')), &state),
            Some(AppCommand::ClearPendingKey)
        );
    }

    #[test]
    fn enter_on_category_header_toggles_it() {
        let mut state = state_with_selected_transaction(transaction(Some(1), "Feira"));
        state
            .dashboard_mut()
            .unwrap()
            .table_state
            .borrow_mut()
            .select(Some(0));
        assert_eq!(
            handle_key_input(key(Key::Enter), &state),
            Some(AppCommand::ToggleCategory {
                categoria: "Mercado".to_string()
            })
        );
    }

    #[test]
    fn c_targets_the_row_when_it_has_an_id() {
        let state = state_with_selected_transaction(transaction(Some(42), "Feira"));
        match handle_key_input(key(Key::Char('c')), &state) {
            Some(AppCommand::OpenCategoryEditor {
                target: EditTarget::Row { id, .. },
            }) => assert_eq!(id, TransactionId::new(42)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn c_falls_back_to_description_without_an_id() {
        let state = state_with_selected_transaction(transaction(None, "Feira"));
        match handle_key_input(key(Key::Char('c')), &state) {
            Some(AppCommand::OpenCategoryEditor {
                target: EditTarget::Descricao { descricao },
            }) => assert_eq!(descricao, "Feira"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn x_requires_an_existing_mapping() {
        let state = state_with_selected_transaction(transaction(Some(1), "Feira"));
        assert_eq!(handle_key_input(key(Key::Char('x')), &state), None);

        let mut mapped = transaction(Some(1), "Feira do José");
        mapped.descricao_original = Some("PAG*JOSE152".to_string());
        mapped.tem_mapeamento = true;
        let state = state_with_selected_transaction(mapped);
        assert_eq!(
            handle_key_input(key(Key::Char('x')), &state),
            Some(AppCommand::DeleteMapping {
                descricao_original: "PAG*JOSE152".to_string()
            })
        );
    }

    #[test]
    fn m_refuses_blank_descriptions() {
        let state = state_with_selected_transaction(transaction(Some(1), "   "));
        assert_eq!(handle_key_input(key(Key::Char('m')), &state), None);
    }

    #[test]
    fn move_mode_takes_over_navigation_keys() {
        let mut state = state_with_selected_transaction(transaction(Some(1), "Feira"));
        state.dashboard_mut().unwrap().input_mode = InputMode::Move;
        assert_eq!(
            handle_key_input(key(Key::Char('j')), &state),
            Some(AppCommand::MoveTargetNext)
        );
        assert_eq!(
            handle_key_input(key(Key::Enter), &state),
            Some(AppCommand::ConfirmMove)
        );
        assert_eq!(
            handle_key_input(key(Key::Char('R')), &state),
            Some(AppCommand::ConfirmMoveRecurring)
        );
        assert_eq!(
            handle_key_input(key(Key::Esc), &state),
            Some(AppCommand::CancelMove)
        );
    }

    #[test]
    fn picker_mode_captures_typed_characters() {
        let mut state = state_with_selected_transaction(transaction(Some(1), "Feira"));
        state.dashboard_mut().unwrap().input_mode = InputMode::CategoryPicker;
        assert_eq!(
            handle_key_input(key(Key::Char('q')), &state),
            Some(AppCommand::AppendPickerChar('q'))
        );
        assert_eq!(
            handle_key_input(key(Key::Backspace), &state),
            Some(AppCommand::DeletePickerChar)
        );
    }

    #[test]
    fn bracket_keys_navigate_months() {
        let state = AppState::new();
        assert_eq!(
            handle_key_input(key(Key::Char('[')), &state),
            Some(AppCommand::NavigateMonth { forward: false })
        );
        assert_eq!(
            handle_key_input(key(Key::Char(']')), &state),
            Some(AppCommand::NavigateMonth { forward: true })
        );
    }
}

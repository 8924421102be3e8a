use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::events::{AppCommand, EditTarget};
use crate::state::tree::UNCLASSIFIED;
use crate::state::{
    AppState, DashboardState, DescriptionEditState, InputMode, LoadingState, LogsState, MoveState,
    PickerState, Scrollable, NO_SUBCATEGORY_OPTION,
};
use crate::ui::screens::Screen;
use chrono::{Months, NaiveDate};
use financa_api::endpoints::{Month, TransactionId, Valor};
use throbber_widgets_tui::ThrobberState;

const LOGS_PAGE: usize = 10;

/// Work a command asks the background layer to do. Applying a command is
/// pure state mutation; effects are what gets spawned afterwards.
#[derive(Debug, Clone, PartialEq)]
enum Effect {
    LoadTaxonomy {
        force_refresh: bool,
    },
    LoadCategory {
        categoria: String,
        month: Month,
        generation: u64,
    },
    UpdateRowCategory {
        id: TransactionId,
        descricao: String,
        categoria: String,
        subcategoria: Option<String>,
        month: Month,
    },
    UpdateDescriptionCategory {
        descricao: String,
        categoria: String,
        subcategoria: Option<String>,
        month: Month,
    },
    SaveMapping {
        descricao_original: String,
        descricao_customizada: String,
    },
    DeleteMapping {
        descricao_original: String,
    },
    AddRecurring {
        descricao: String,
        categoria: String,
        valor: Valor,
    },
}

/// Execute a command: mutate state, then hand the resulting effects to the
/// background task manager.
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    for effect in apply_command(command, state) {
        spawn_effect(effect, task_manager, data_loader);
    }
}

/// Synchronous variant for tests: commands mutate state, effects are
/// dropped instead of spawned.
pub fn execute_command_sync(command: AppCommand, state: &mut AppState) {
    let _ = apply_command(command, state);
}

fn spawn_effect(effect: Effect, task_manager: &mut BackgroundTaskManager, data_loader: &DataLoader) {
    match effect {
        Effect::LoadTaxonomy { force_refresh } => {
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task("taxonomy".to_string(), async move {
                data_loader.load_taxonomy(force_refresh).await;
            });
        }
        Effect::LoadCategory {
            categoria,
            month,
            generation,
        } => {
            let task_id = format!("transactions_{}", categoria);
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task(task_id, async move {
                data_loader.load_category(categoria, month, generation).await;
            });
        }
        Effect::UpdateRowCategory {
            id,
            descricao,
            categoria,
            subcategoria,
            month,
        } => {
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task(format!("update_row_{}", id), async move {
                data_loader
                    .update_row_category(month, id, descricao, categoria, subcategoria)
                    .await;
            });
        }
        Effect::UpdateDescriptionCategory {
            descricao,
            categoria,
            subcategoria,
            month,
        } => {
            let task_id = format!("update_descricao_{}", descricao);
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task(task_id, async move {
                data_loader
                    .update_description_category(month, descricao, categoria, subcategoria)
                    .await;
            });
        }
        Effect::SaveMapping {
            descricao_original,
            descricao_customizada,
        } => {
            let task_id = format!("mapping_{}", descricao_original);
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task(task_id, async move {
                data_loader
                    .save_mapping(descricao_original, descricao_customizada)
                    .await;
            });
        }
        Effect::DeleteMapping { descricao_original } => {
            let task_id = format!("mapping_{}", descricao_original);
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task(task_id, async move {
                data_loader.delete_mapping(descricao_original).await;
            });
        }
        Effect::AddRecurring {
            descricao,
            categoria,
            valor,
        } => {
            let task_id = format!("recurring_{}", descricao);
            let data_loader = data_loader.clone();
            task_manager.spawn_load_task(task_id, async move {
                data_loader.add_recurring(descricao, categoria, valor).await;
            });
        }
    }
}

fn apply_command(command: AppCommand, state: &mut AppState) -> Vec<Effect> {
    let keeps_pending = matches!(command, AppCommand::SetPendingKey(_));
    let mut effects = Vec::new();

    match command {
        AppCommand::SelectNext => {
            if let Screen::Dashboard(dashboard) = state.current_screen_mut() {
                dashboard.select_next();
            }
        }
        AppCommand::SelectPrevious => {
            if let Screen::Dashboard(dashboard) = state.current_screen_mut() {
                dashboard.select_prev();
            }
        }
        AppCommand::NavigateToTop => match state.current_screen_mut() {
            Screen::Dashboard(dashboard) => {
                dashboard.table_state.borrow_mut().select(Some(0));
            }
            Screen::Logs(logs) => {
                logs.scroll_offset = logs.total_entries.saturating_sub(1);
            }
        },
        AppCommand::NavigateToBottom => match state.current_screen_mut() {
            Screen::Dashboard(dashboard) => {
                let last = dashboard.visible_rows().len().saturating_sub(1);
                dashboard.table_state.borrow_mut().select(Some(last));
            }
            Screen::Logs(logs) => {
                logs.scroll_offset = 0;
            }
        },
        AppCommand::NavigateBack => {
            state.navigate_back();
        }
        AppCommand::NavigateToLogs => {
            state.navigate_to(Screen::Logs(LogsState::default()));
        }

        AppCommand::LoadTaxonomy { force_refresh } => {
            if let Some(dashboard) = state.dashboard_mut() {
                let stale = matches!(
                    dashboard.taxonomy_loading,
                    LoadingState::NotStarted | LoadingState::Error(_)
                );
                if force_refresh || stale {
                    dashboard.taxonomy_loading = LoadingState::Loading(ThrobberState::default());
                    effects.push(Effect::LoadTaxonomy { force_refresh });
                }
            }
        }

        AppCommand::ToggleCategory { categoria } => {
            if let Some(dashboard) = state.dashboard_mut() {
                effects.extend(toggle_category(dashboard, &categoria));
            }
        }

        AppCommand::ToggleSubcategory {
            categoria,
            subcategoria,
        } => {
            if let Some(dashboard) = state.dashboard_mut() {
                if let Some(group) = dashboard.group_mut(&categoria) {
                    if let Some(subgroup) =
                        group.subgroups.iter_mut().find(|s| s.nome == subcategoria)
                    {
                        subgroup.expanded = !subgroup.expanded;
                    }
                }
                dashboard.clamp_selection();
            }
        }

        AppCommand::RefreshDashboard => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.taxonomy_loading = LoadingState::Loading(ThrobberState::default());
                effects.push(Effect::LoadTaxonomy {
                    force_refresh: true,
                });
                effects.extend(reload_expanded_groups(dashboard));
            }
        }

        AppCommand::NavigateMonth { forward } => {
            if let Some(dashboard) = state.dashboard_mut() {
                if let Some(month) = shift_month(&dashboard.month, forward) {
                    tracing::info!("Switching to month {}", month);
                    dashboard.month = month;
                    for group in &mut dashboard.groups {
                        group.subgroups.clear();
                        group.variances.clear();
                        if !group.expanded {
                            group.loading = LoadingState::NotStarted;
                        }
                    }
                    effects.extend(reload_expanded_groups(dashboard));
                    dashboard.table_state.borrow_mut().select(Some(0));
                }
            }
        }

        AppCommand::OpenCategoryEditor { target } => {
            if let Some(dashboard) = state.dashboard_mut() {
                let mut options: Vec<String> = dashboard.taxonomy.keys().cloned().collect();
                // Without a taxonomy there is nothing to offer, not even
                // the fallback bucket
                if !options.is_empty() && !dashboard.taxonomy.contains_key(UNCLASSIFIED) {
                    options.push(UNCLASSIFIED.to_string());
                }
                dashboard.picker = Some(PickerState::new(target, options));
                dashboard.input_mode = InputMode::CategoryPicker;
            }
        }
        AppCommand::AppendPickerChar(c) => {
            if let Some(picker) = state.dashboard_mut().and_then(|d| d.picker.as_mut()) {
                picker.input.push(c);
                picker.selection_index = 0;
            }
        }
        AppCommand::DeletePickerChar => {
            if let Some(picker) = state.dashboard_mut().and_then(|d| d.picker.as_mut()) {
                picker.input.pop();
                picker.selection_index = 0;
            }
        }
        AppCommand::SelectPickerItem { up } => {
            if let Some(picker) = state.dashboard_mut().and_then(|d| d.picker.as_mut()) {
                let len = picker.filtered_options().len();
                if len > 0 {
                    picker.selection_index = if up {
                        picker.selection_index.checked_sub(1).unwrap_or(len - 1)
                    } else {
                        (picker.selection_index + 1) % len
                    };
                }
            }
        }
        AppCommand::ConfirmPickerSelection => {
            if let Some(dashboard) = state.dashboard_mut() {
                effects.extend(confirm_picker_selection(dashboard));
            }
        }
        AppCommand::CancelPicker => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.picker = None;
                dashboard.input_mode = InputMode::Normal;
            }
        }

        AppCommand::OpenDescriptionEditor {
            descricao_original,
            descricao_atual,
        } => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.description_edit = Some(DescriptionEditState {
                    descricao_original,
                    input: descricao_atual,
                });
                dashboard.input_mode = InputMode::DescriptionEdit;
            }
        }
        AppCommand::AppendEditorChar(c) => {
            if let Some(edit) = state.dashboard_mut().and_then(|d| d.description_edit.as_mut()) {
                edit.input.push(c);
            }
        }
        AppCommand::DeleteEditorChar => {
            if let Some(edit) = state.dashboard_mut().and_then(|d| d.description_edit.as_mut()) {
                edit.input.pop();
            }
        }
        AppCommand::SubmitDescriptionEdit => {
            if let Some(dashboard) = state.dashboard_mut() {
                effects.extend(submit_description_edit(dashboard));
            }
        }
        AppCommand::CancelDescriptionEdit => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.description_edit = None;
                dashboard.input_mode = InputMode::Normal;
            }
        }
        AppCommand::DeleteMapping { descricao_original } => {
            effects.push(Effect::DeleteMapping { descricao_original });
        }

        AppCommand::EnterMoveMode {
            descricao,
            source_categoria,
        } => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.move_state = Some(MoveState {
                    descricao,
                    source_categoria,
                    target_index: 0,
                });
                dashboard.input_mode = InputMode::Move;
            }
        }
        AppCommand::MoveTargetNext => {
            if let Some(dashboard) = state.dashboard_mut() {
                step_move_target(dashboard, 1);
            }
        }
        AppCommand::MoveTargetPrevious => {
            if let Some(dashboard) = state.dashboard_mut() {
                step_move_target(dashboard, -1);
            }
        }
        AppCommand::ConfirmMove => {
            if let Some(dashboard) = state.dashboard_mut() {
                effects.extend(confirm_move(dashboard));
            }
        }
        AppCommand::ConfirmMoveRecurring => {
            if let Some(dashboard) = state.dashboard_mut() {
                effects.extend(confirm_move_recurring(dashboard));
            }
        }
        AppCommand::CancelMove => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.move_state = None;
                dashboard.input_mode = InputMode::Normal;
            }
        }

        AppCommand::AddRecurring {
            descricao,
            categoria,
            valor,
        } => {
            effects.push(Effect::AddRecurring {
                descricao,
                categoria,
                valor,
            });
        }

        AppCommand::CycleSortColumn => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.sort.column = dashboard.sort.column.next();
                dashboard.apply_sort();
            }
        }
        AppCommand::ToggleSortDirection => {
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.sort.direction = dashboard.sort.direction.toggle();
                dashboard.apply_sort();
            }
        }

        AppCommand::ToggleHelp => {
            state.help_visible = !state.help_visible;
        }
        AppCommand::DismissToast => {
            state.toast = None;
        }

        AppCommand::ScrollLogsUp => scroll_logs(state, 1),
        AppCommand::ScrollLogsDown => scroll_logs(state, -1),
        AppCommand::ScrollLogsPageUp => scroll_logs(state, LOGS_PAGE as isize),
        AppCommand::ScrollLogsPageDown => scroll_logs(state, -(LOGS_PAGE as isize)),

        AppCommand::SetPendingKey(key) => {
            state.pending_key = Some(key);
        }
        AppCommand::ClearPendingKey => {
            state.pending_key = None;
        }

        AppCommand::Quit => {
            tracing::info!("Quit command received");
            state.should_quit = true;
        }
    }

    // Any command other than starting a sequence resolves the sequence
    if !keeps_pending {
        state.pending_key = None;
    }

    effects
}

fn toggle_category(dashboard: &mut DashboardState, categoria: &str) -> Option<Effect> {
    let month = dashboard.month.clone();
    let mut effect = None;
    if let Some(group) = dashboard.group_mut(categoria) {
        if group.expanded {
            group.expanded = false;
            // Closing a parent always resets its children
            for subgroup in &mut group.subgroups {
                subgroup.expanded = false;
            }
        } else {
            group.expanded = true;
            // Lazy fetch: only hit the API when there is nothing usable yet
            if matches!(
                group.loading,
                LoadingState::NotStarted | LoadingState::Error(_)
            ) {
                group.generation += 1;
                group.loading = LoadingState::Loading(ThrobberState::default());
                effect = Some(Effect::LoadCategory {
                    categoria: group.categoria.clone(),
                    month,
                    generation: group.generation,
                });
            }
        }
    }
    dashboard.clamp_selection();
    effect
}

fn reload_expanded_groups(dashboard: &mut DashboardState) -> Vec<Effect> {
    let month = dashboard.month.clone();
    dashboard
        .groups
        .iter_mut()
        .filter(|g| g.expanded)
        .map(|group| {
            group.generation += 1;
            group.loading = LoadingState::Loading(ThrobberState::default());
            Effect::LoadCategory {
                categoria: group.categoria.clone(),
                month: month.clone(),
                generation: group.generation,
            }
        })
        .collect()
}

fn shift_month(month: &Month, forward: bool) -> Option<Month> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()?;
    let shifted = if forward {
        date.checked_add_months(Months::new(1))
    } else {
        date.checked_sub_months(Months::new(1))
    }?;
    shifted.format("%Y-%m").to_string().parse().ok()
}

/// Resolve the picker's Enter press. The category step either chains into
/// the subcategory step or submits directly when the chosen category has
/// no subcategories.
fn confirm_picker_selection(dashboard: &mut DashboardState) -> Option<Effect> {
    let (chosen, step_categoria) = {
        let picker = dashboard.picker.as_ref()?;
        (picker.selected_option()?, picker.categoria.clone())
    };

    match step_categoria {
        None => {
            let subcategorias = dashboard
                .taxonomy
                .get(&chosen)
                .cloned()
                .unwrap_or_default();
            if subcategorias.is_empty() {
                return submit_category_change(dashboard, chosen, None);
            }
            let picker = dashboard.picker.as_mut()?;
            picker.categoria = Some(chosen);
            picker.input.clear();
            picker.selection_index = 0;
            picker.options = std::iter::once(NO_SUBCATEGORY_OPTION.to_string())
                .chain(subcategorias)
                .collect();
            dashboard.input_mode = InputMode::SubcategoryPicker;
            None
        }
        Some(categoria) => {
            let subcategoria = if chosen == NO_SUBCATEGORY_OPTION {
                None
            } else {
                Some(chosen)
            };
            submit_category_change(dashboard, categoria, subcategoria)
        }
    }
}

fn submit_category_change(
    dashboard: &mut DashboardState,
    categoria: String,
    subcategoria: Option<String>,
) -> Option<Effect> {
    let picker = dashboard.picker.take()?;
    dashboard.input_mode = InputMode::Normal;

    let categoria = if categoria.trim().is_empty() {
        UNCLASSIFIED.to_string()
    } else {
        categoria
    };
    let month = dashboard.month.clone();

    match picker.target {
        EditTarget::Row { id, descricao } => Some(Effect::UpdateRowCategory {
            id,
            descricao,
            categoria,
            subcategoria,
            month,
        }),
        EditTarget::Descricao { descricao } => Some(Effect::UpdateDescriptionCategory {
            descricao,
            categoria,
            subcategoria,
            month,
        }),
    }
}

fn submit_description_edit(dashboard: &mut DashboardState) -> Option<Effect> {
    let edit = dashboard.description_edit.take()?;
    dashboard.input_mode = InputMode::Normal;

    let input = edit.input.trim().to_string();
    if input.is_empty() {
        return None;
    }
    if input == edit.descricao_original {
        // Typing the imported description back removes the mapping
        return Some(Effect::DeleteMapping {
            descricao_original: edit.descricao_original,
        });
    }
    Some(Effect::SaveMapping {
        descricao_original: edit.descricao_original,
        descricao_customizada: input,
    })
}

fn step_move_target(dashboard: &mut DashboardState, delta: isize) {
    let len = dashboard.move_targets().len();
    if len == 0 {
        return;
    }
    if let Some(move_state) = dashboard.move_state.as_mut() {
        let current = move_state.target_index as isize;
        move_state.target_index = (current + delta).rem_euclid(len as isize) as usize;
    }
}

/// Resolve a drop. The grab highlight clears no matter what; the request
/// only goes out when the destination differs from the source.
fn confirm_move(dashboard: &mut DashboardState) -> Option<Effect> {
    let move_state = dashboard.move_state.take()?;
    dashboard.input_mode = InputMode::Normal;

    let target = dashboard
        .move_targets()
        .into_iter()
        .nth(move_state.target_index)?;

    if target.categoria == move_state.source_categoria && target.subcategoria.is_none() {
        tracing::debug!(
            "Drop on source category '{}', nothing to do",
            target.categoria
        );
        return None;
    }

    let categoria = if target.categoria.trim().is_empty() {
        UNCLASSIFIED.to_string()
    } else {
        target.categoria
    };

    Some(Effect::UpdateDescriptionCategory {
        descricao: move_state.descricao,
        categoria,
        subcategoria: target.subcategoria,
        month: dashboard.month.clone(),
    })
}

/// Drop the grab onto recurring registration. The amount comes from the
/// first visible row carrying the grabbed description.
fn confirm_move_recurring(dashboard: &mut DashboardState) -> Option<Effect> {
    let move_state = dashboard.move_state.take()?;
    dashboard.input_mode = InputMode::Normal;

    let row = dashboard
        .groups
        .iter()
        .flat_map(|g| &g.subgroups)
        .flat_map(|s| &s.rows)
        .find(|t| t.descricao == move_state.descricao)?;

    Some(Effect::AddRecurring {
        categoria: row.categoria.clone(),
        valor: row.valor,
        descricao: move_state.descricao,
    })
}

fn scroll_logs(state: &mut AppState, delta: isize) {
    if let Screen::Logs(logs) = state.current_screen_mut() {
        let max = logs.total_entries.saturating_sub(1);
        let next = logs.scroll_offset as isize + delta;
        logs.scroll_offset = next.clamp(0, max as isize) as usize;
    }
}

use super::{AppState, DashboardState, LoadingState, Toast};
use crate::events::DataEvent;
use financa_api::endpoints::transactions::Transaction;

/// Process data events from background tasks and update state accordingly.
///
/// Rows never relocate optimistically: every move on screen answers a
/// success event from the server.
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        DataEvent::TaxonomyCacheLoaded { taxonomy } => {
            tracing::debug!("Loaded {} categories from cache", taxonomy.len());
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.taxonomy = taxonomy;
                dashboard.sync_groups_with_taxonomy();
                dashboard.clamp_selection();
            }
        }

        DataEvent::TaxonomyLoaded { taxonomy } => {
            tracing::info!("Loaded {} categories from API", taxonomy.len());
            if let Some(dashboard) = state.dashboard_mut() {
                dashboard.taxonomy = taxonomy;
                dashboard.taxonomy_loading = LoadingState::Loaded;
                dashboard.sync_groups_with_taxonomy();
                dashboard.clamp_selection();
            }
        }

        DataEvent::TaxonomyLoadFailed { error } => {
            tracing::error!("Failed to load categories: {}", error);
            if let Some(dashboard) = state.dashboard_mut() {
                // Only replace the loading indicator; cached data stays usable
                if matches!(dashboard.taxonomy_loading, LoadingState::Loading(_)) {
                    dashboard.taxonomy_loading = LoadingState::Error(error.clone());
                }
            }
            state.toast = Some(Toast::error(format!(
                "Falha ao carregar categorias: {}",
                error
            )));
        }

        DataEvent::CategoryTransactionsLoaded {
            categoria,
            generation,
            transactions,
        } => {
            if let Some(dashboard) = state.dashboard_mut() {
                let sort = dashboard.sort;
                if let Some(group) = dashboard.group_mut(&categoria) {
                    if group.generation != generation {
                        tracing::debug!(
                            "Dropping stale transactions for '{}' (generation {} != {})",
                            categoria,
                            generation,
                            group.generation
                        );
                        return;
                    }
                    tracing::info!(
                        "Loaded {} transactions for '{}'",
                        transactions.len(),
                        categoria
                    );
                    group.set_transactions(transactions);
                    group.loading = LoadingState::Loaded;
                    for subgroup in &mut group.subgroups {
                        super::sort::sort_rows(&mut subgroup.rows, sort);
                    }
                }
                dashboard.clamp_selection();
            }
        }

        DataEvent::CategoryTransactionsLoadFailed {
            categoria,
            generation,
            error,
        } => {
            tracing::error!("Failed to load transactions for '{}': {}", categoria, error);
            if let Some(dashboard) = state.dashboard_mut() {
                if let Some(group) = dashboard.group_mut(&categoria) {
                    if group.generation == generation
                        && matches!(group.loading, LoadingState::Loading(_))
                    {
                        group.loading = LoadingState::Error(error);
                    }
                }
            }
        }

        DataEvent::CategoryVariancesLoaded {
            categoria,
            generation,
            variances,
        } => {
            if let Some(dashboard) = state.dashboard_mut() {
                if let Some(group) = dashboard.group_mut(&categoria) {
                    if group.generation != generation {
                        tracing::debug!("Dropping stale variances for '{}'", categoria);
                        return;
                    }
                    group.variances = variances;
                }
            }
        }

        DataEvent::RowCategoryUpdated {
            id,
            descricao,
            categoria,
            subcategoria,
            updated,
        } => {
            tracing::info!(
                "Transaction {} moved to '{}', {} rows share '{}'",
                id,
                categoria,
                updated,
                descricao
            );
            if let Some(dashboard) = state.dashboard_mut() {
                // The server fans the edit out to every row with this
                // description, so the tree follows suit
                relocate_rows(
                    dashboard,
                    |t| t.descricao == descricao,
                    &categoria,
                    subcategoria.as_deref(),
                );
            }
            state.toast = Some(Toast::success(format!(
                "{} transações atualizadas",
                updated
            )));
        }

        DataEvent::RowCategoryUpdateFailed { id, error } => {
            tracing::error!("Failed to update transaction {}: {}", id, error);
            state.toast = Some(Toast::error(format!("Falha ao atualizar: {}", error)));
        }

        DataEvent::DescriptionCategoryUpdated {
            descricao,
            categoria,
            subcategoria,
            updated,
        } => {
            tracing::info!(
                "{} transactions with description '{}' moved to '{}'",
                updated,
                descricao,
                categoria
            );
            if let Some(dashboard) = state.dashboard_mut() {
                relocate_rows(
                    dashboard,
                    |t| t.descricao == descricao,
                    &categoria,
                    subcategoria.as_deref(),
                );
            }
            // The server count is authoritative, it may span other months
            state.toast = Some(Toast::success(format!(
                "{} transações atualizadas",
                updated
            )));
        }

        DataEvent::DescriptionCategoryUpdateFailed { descricao, error } => {
            tracing::error!("Failed to update '{}': {}", descricao, error);
            state.toast = Some(Toast::error(format!("Falha ao atualizar: {}", error)));
        }

        DataEvent::MappingSaved {
            descricao_original,
            descricao_customizada,
        } => {
            tracing::info!(
                "Mapping saved: '{}' -> '{}'",
                descricao_original,
                descricao_customizada
            );
            if let Some(dashboard) = state.dashboard_mut() {
                // A rename is global and purely visual, rows stay put
                rename_rows(dashboard, &descricao_original, |row| {
                    row.descricao = descricao_customizada.clone();
                    row.descricao_original = Some(descricao_original.clone());
                    row.tem_mapeamento = true;
                });
            }
            state.toast = Some(Toast::success("Descrição atualizada"));
        }

        DataEvent::MappingSaveFailed {
            descricao_original,
            error,
        } => {
            tracing::error!("Failed to save mapping for '{}': {}", descricao_original, error);
            state.toast = Some(Toast::error(format!("Falha ao salvar descrição: {}", error)));
        }

        DataEvent::MappingDeleted { descricao_original } => {
            tracing::info!("Mapping removed for '{}'", descricao_original);
            if let Some(dashboard) = state.dashboard_mut() {
                rename_rows(dashboard, &descricao_original, |row| {
                    row.descricao = descricao_original.clone();
                    row.descricao_original = None;
                    row.tem_mapeamento = false;
                });
            }
            state.toast = Some(Toast::success("Descrição original restaurada"));
        }

        DataEvent::MappingDeleteFailed {
            descricao_original,
            error,
        } => {
            tracing::error!(
                "Failed to delete mapping for '{}': {}",
                descricao_original,
                error
            );
            state.toast = Some(Toast::error(format!("Falha ao remover descrição: {}", error)));
        }

        DataEvent::RecurringAdded { descricao, via_hook } => {
            tracing::info!("Recurring expense added for '{}' (hook: {})", descricao, via_hook);
            state.toast = Some(Toast::success(format!("Recorrente: {}", descricao)));
        }

        DataEvent::RecurringAddFailed { descricao, error } => {
            tracing::error!("Failed to add recurring for '{}': {}", descricao, error);
            state.toast = Some(Toast::error(format!("Falha ao adicionar recorrente: {}", error)));
        }
    }
}

/// Move every row matching the predicate into `categoria`/`subcategoria`.
///
/// Rows are removed from their current buckets everywhere, re-stamped, and
/// only re-inserted when the destination is expanded with loaded data. A
/// collapsed destination picks them up on its next lazy fetch.
fn relocate_rows<F>(
    dashboard: &mut DashboardState,
    mut pred: F,
    categoria: &str,
    subcategoria: Option<&str>,
) where
    F: FnMut(&Transaction) -> bool,
{
    let mut moved: Vec<Transaction> = Vec::new();
    for group in &mut dashboard.groups {
        moved.extend(group.remove_rows_matching(&mut pred));
    }

    for row in &mut moved {
        row.categoria = categoria.to_string();
        row.subcategoria = subcategoria.map(str::to_string);
    }

    let sort = dashboard.sort;
    if let Some(dest) = dashboard.group_mut(categoria) {
        if dest.expanded && dest.is_loaded() {
            dest.insert_rows(moved, subcategoria);
            for subgroup in &mut dest.subgroups {
                super::sort::sort_rows(&mut subgroup.rows, sort);
            }
        }
    }

    dashboard.clamp_selection();
}

/// Apply a visual rename to every row keyed on the given imported
/// description, across all loaded groups.
fn rename_rows<F>(dashboard: &mut DashboardState, descricao_original: &str, mut apply: F)
where
    F: FnMut(&mut Transaction),
{
    for group in &mut dashboard.groups {
        for subgroup in &mut group.subgroups {
            for row in &mut subgroup.rows {
                if row.original_descricao() == descricao_original {
                    apply(row);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tree::DEFAULT_BUCKET;
    use crate::ui::screens::Screen;
    use financa_api::endpoints::{categories::Taxonomy, TransactionId, Valor};
    use std::collections::HashMap;
    use throbber_widgets_tui::ThrobberState;

    fn row(id: i64, descricao: &str, subcategoria: Option<&str>, valor: f64) -> Transaction {
        Transaction {
            id: Some(TransactionId::new(id)),
            data: Some("2025-08-10".to_string()),
            descricao: descricao.to_string(),
            descricao_original: None,
            tem_mapeamento: false,
            categoria: String::new(),
            subcategoria: subcategoria.map(str::to_string),
            valor: Valor::new(valor),
            parcela: None,
        }
    }

    fn state_with_taxonomy() -> AppState {
        let mut state = AppState::new();
        let mut taxonomy = Taxonomy::new();
        taxonomy.insert("Mercado".to_string(), vec!["Padaria".to_string()]);
        taxonomy.insert("Transporte".to_string(), vec![]);
        reduce_data_event(&mut state, DataEvent::TaxonomyLoaded { taxonomy });
        state
    }

    fn dashboard(state: &AppState) -> &DashboardState {
        match state.current_screen() {
            Screen::Dashboard(dashboard) => dashboard,
            _ => panic!("expected dashboard screen"),
        }
    }

    fn expand_loaded(state: &mut AppState, categoria: &str, rows: Vec<Transaction>) {
        {
            let dashboard = state.dashboard_mut().unwrap();
            let group = dashboard.group_mut(categoria).unwrap();
            group.expanded = true;
            group.loading = LoadingState::Loading(ThrobberState::default());
        }
        let generation = dashboard(state)
            .groups
            .iter()
            .find(|g| g.categoria == categoria)
            .unwrap()
            .generation;
        reduce_data_event(
            state,
            DataEvent::CategoryTransactionsLoaded {
                categoria: categoria.to_string(),
                generation,
                transactions: rows,
            },
        );
    }

    #[test]
    fn taxonomy_load_builds_groups_with_unclassified_last() {
        let state = state_with_taxonomy();
        let names: Vec<&str> = dashboard(&state)
            .groups
            .iter()
            .map(|g| g.categoria.as_str())
            .collect();
        assert_eq!(names, vec!["Mercado", "Transporte", "Não Classificado"]);
    }

    #[test]
    fn fresh_taxonomy_overwrites_cached_copy() {
        let mut state = AppState::new();
        let mut cached = Taxonomy::new();
        cached.insert("Velha".to_string(), vec![]);
        reduce_data_event(&mut state, DataEvent::TaxonomyCacheLoaded { taxonomy: cached });
        assert!(dashboard(&state).groups.iter().any(|g| g.categoria == "Velha"));

        let mut fresh = Taxonomy::new();
        fresh.insert("Nova".to_string(), vec![]);
        reduce_data_event(&mut state, DataEvent::TaxonomyLoaded { taxonomy: fresh });
        let dashboard = dashboard(&state);
        assert!(!dashboard.groups.iter().any(|g| g.categoria == "Velha"));
        assert!(dashboard.groups.iter().any(|g| g.categoria == "Nova"));
        assert_eq!(dashboard.taxonomy_loading, LoadingState::Loaded);
    }

    #[test]
    fn taxonomy_failure_only_errors_while_loading() {
        let mut state = state_with_taxonomy();
        reduce_data_event(
            &mut state,
            DataEvent::TaxonomyLoadFailed {
                error: "offline".to_string(),
            },
        );
        // Already Loaded, so the indicator must not flip to Error
        assert_eq!(dashboard(&state).taxonomy_loading, LoadingState::Loaded);
        assert!(state.toast.is_some());
    }

    #[test]
    fn stale_generation_transactions_are_dropped() {
        let mut state = state_with_taxonomy();
        {
            let dashboard = state.dashboard_mut().unwrap();
            let group = dashboard.group_mut("Mercado").unwrap();
            group.expanded = true;
            group.generation = 3;
            group.loading = LoadingState::Loading(ThrobberState::default());
        }
        reduce_data_event(
            &mut state,
            DataEvent::CategoryTransactionsLoaded {
                categoria: "Mercado".to_string(),
                generation: 2,
                transactions: vec![row(1, "Feira", None, -10.0)],
            },
        );
        let group = &dashboard(&state).groups[0];
        assert!(group.subgroups.is_empty());
        assert!(matches!(group.loading, LoadingState::Loading(_)));
    }

    #[test]
    fn load_failure_for_current_generation_sets_error() {
        let mut state = state_with_taxonomy();
        {
            let dashboard = state.dashboard_mut().unwrap();
            let group = dashboard.group_mut("Mercado").unwrap();
            group.loading = LoadingState::Loading(ThrobberState::default());
        }
        reduce_data_event(
            &mut state,
            DataEvent::CategoryTransactionsLoadFailed {
                categoria: "Mercado".to_string(),
                generation: 0,
                error: "timeout".to_string(),
            },
        );
        assert_eq!(
            dashboard(&state).groups[0].loading,
            LoadingState::Error("timeout".to_string())
        );
    }

    #[test]
    fn row_update_relocates_into_expanded_destination() {
        let mut state = state_with_taxonomy();
        expand_loaded(&mut state, "Mercado", vec![row(1, "Uber", None, -30.0)]);
        expand_loaded(&mut state, "Transporte", vec![row(2, "Metrô", None, -5.0)]);

        reduce_data_event(
            &mut state,
            DataEvent::RowCategoryUpdated {
                id: TransactionId::new(1),
                descricao: "Uber".to_string(),
                categoria: "Transporte".to_string(),
                subcategoria: None,
                updated: 1,
            },
        );

        let dashboard = dashboard(&state);
        let mercado = dashboard.groups.iter().find(|g| g.categoria == "Mercado").unwrap();
        let transporte = dashboard
            .groups
            .iter()
            .find(|g| g.categoria == "Transporte")
            .unwrap();
        assert_eq!(mercado.count(), 0);
        assert_eq!(transporte.count(), 2);
        assert!(transporte
            .subgroups
            .iter()
            .any(|s| s.rows.iter().any(|t| t.descricao == "Uber")));
    }

    #[test]
    fn row_update_fans_out_to_rows_sharing_the_description() {
        let mut state = state_with_taxonomy();
        expand_loaded(
            &mut state,
            "Mercado",
            vec![
                row(1, "Uber", None, -30.0),
                row(2, "Uber", None, -12.0),
                row(3, "Feira", None, -50.0),
            ],
        );
        expand_loaded(&mut state, "Transporte", vec![]);

        reduce_data_event(
            &mut state,
            DataEvent::RowCategoryUpdated {
                id: TransactionId::new(1),
                descricao: "Uber".to_string(),
                categoria: "Transporte".to_string(),
                subcategoria: None,
                updated: 2,
            },
        );

        let dashboard = dashboard(&state);
        let mercado = dashboard.groups.iter().find(|g| g.categoria == "Mercado").unwrap();
        let transporte = dashboard
            .groups
            .iter()
            .find(|g| g.categoria == "Transporte")
            .unwrap();
        // Both Uber rows leave the source, the unrelated one stays
        assert_eq!(mercado.count(), 1);
        assert_eq!(transporte.count(), 2);
        let toast = state.toast.as_ref().unwrap();
        assert!(toast.message.contains('2'));
    }

    #[test]
    fn relocation_into_collapsed_destination_only_removes() {
        let mut state = state_with_taxonomy();
        expand_loaded(&mut state, "Mercado", vec![row(1, "Uber", None, -30.0)]);

        reduce_data_event(
            &mut state,
            DataEvent::RowCategoryUpdated {
                id: TransactionId::new(1),
                descricao: "Uber".to_string(),
                categoria: "Transporte".to_string(),
                subcategoria: None,
                updated: 1,
            },
        );

        let dashboard = dashboard(&state);
        let mercado = dashboard.groups.iter().find(|g| g.categoria == "Mercado").unwrap();
        let transporte = dashboard
            .groups
            .iter()
            .find(|g| g.categoria == "Transporte")
            .unwrap();
        assert_eq!(mercado.count(), 0);
        assert_eq!(transporte.count(), 0);
    }

    #[test]
    fn description_update_moves_all_matching_rows_and_reports_server_count() {
        let mut state = state_with_taxonomy();
        expand_loaded(
            &mut state,
            "Mercado",
            vec![
                row(1, "Uber", None, -30.0),
                row(2, "Uber", None, -12.0),
                row(3, "Feira", None, -50.0),
            ],
        );
        expand_loaded(&mut state, "Transporte", vec![]);

        reduce_data_event(
            &mut state,
            DataEvent::DescriptionCategoryUpdated {
                descricao: "Uber".to_string(),
                categoria: "Transporte".to_string(),
                subcategoria: Some("Apps".to_string()),
                updated: 7,
            },
        );

        let dashboard = dashboard(&state);
        let mercado = dashboard.groups.iter().find(|g| g.categoria == "Mercado").unwrap();
        let transporte = dashboard
            .groups
            .iter()
            .find(|g| g.categoria == "Transporte")
            .unwrap();
        assert_eq!(mercado.count(), 1);
        assert_eq!(transporte.count(), 2);
        assert_eq!(transporte.subgroups[0].nome, "Apps");
        let toast = state.toast.as_ref().unwrap();
        assert!(toast.message.contains('7'));
    }

    #[test]
    fn relocation_prunes_emptied_buckets() {
        let mut state = state_with_taxonomy();
        expand_loaded(
            &mut state,
            "Mercado",
            vec![
                row(1, "Pão", Some("Padaria"), -5.0),
                row(2, "Feira", None, -50.0),
            ],
        );

        reduce_data_event(
            &mut state,
            DataEvent::RowCategoryUpdated {
                id: TransactionId::new(1),
                descricao: "Pão".to_string(),
                categoria: "Transporte".to_string(),
                subcategoria: None,
                updated: 1,
            },
        );

        let mercado = &dashboard(&state).groups[0];
        assert_eq!(mercado.subgroups.len(), 1);
        assert_eq!(mercado.subgroups[0].nome, DEFAULT_BUCKET);
    }

    #[test]
    fn mapping_save_renames_rows_in_place() {
        let mut state = state_with_taxonomy();
        expand_loaded(
            &mut state,
            "Mercado",
            vec![row(1, "PAG*JOSE152", None, -20.0)],
        );

        reduce_data_event(
            &mut state,
            DataEvent::MappingSaved {
                descricao_original: "PAG*JOSE152".to_string(),
                descricao_customizada: "Feira do José".to_string(),
            },
        );

        let mercado = &dashboard(&state).groups[0];
        let renamed = &mercado.subgroups[0].rows[0];
        assert_eq!(renamed.descricao, "Feira do José");
        assert_eq!(renamed.descricao_original.as_deref(), Some("PAG*JOSE152"));
        assert!(renamed.tem_mapeamento);
        // Rename is visual only, the row did not move
        assert_eq!(mercado.count(), 1);
    }

    #[test]
    fn mapping_delete_restores_original_description() {
        let mut state = state_with_taxonomy();
        let mut mapped = row(1, "Feira do José", None, -20.0);
        mapped.descricao_original = Some("PAG*JOSE152".to_string());
        mapped.tem_mapeamento = true;
        expand_loaded(&mut state, "Mercado", vec![mapped]);

        reduce_data_event(
            &mut state,
            DataEvent::MappingDeleted {
                descricao_original: "PAG*JOSE152".to_string(),
            },
        );

        let restored = &dashboard(&state).groups[0].subgroups[0].rows[0];
        assert_eq!(restored.descricao, "PAG*JOSE152");
        assert!(restored.descricao_original.is_none());
        assert!(!restored.tem_mapeamento);
    }

    #[test]
    fn stale_variances_are_dropped() {
        let mut state = state_with_taxonomy();
        {
            let dashboard = state.dashboard_mut().unwrap();
            dashboard.group_mut("Mercado").unwrap().generation = 2;
        }
        reduce_data_event(
            &mut state,
            DataEvent::CategoryVariancesLoaded {
                categoria: "Mercado".to_string(),
                generation: 1,
                variances: HashMap::new(),
            },
        );
        assert!(dashboard(&state).groups[0].variances.is_empty());
    }

    #[test]
    fn recurring_failure_shows_error_toast() {
        let mut state = state_with_taxonomy();
        reduce_data_event(
            &mut state,
            DataEvent::RecurringAddFailed {
                descricao: "Netflix".to_string(),
                error: "500".to_string(),
            },
        );
        let toast = state.toast.as_ref().unwrap();
        assert_eq!(toast.level, crate::state::ToastLevel::Error);
    }
}

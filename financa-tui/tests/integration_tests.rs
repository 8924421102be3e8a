//! End-to-end tests driving the application core through key presses and
//! injected data events, the same paths the terminal event loop uses.

use financa_tui::events::DataEvent;
use financa_tui::input::Key;
use financa_tui::state::{DashboardState, InputMode, LoadingState};
use financa_tui::testing::TestApp;
use financa_tui::ui::screens::Screen;
use financa_api::endpoints::categories::Taxonomy;
use financa_api::endpoints::transactions::Transaction;
use financa_api::endpoints::{TransactionId, Valor};

fn taxonomy() -> Taxonomy {
    let mut taxonomy = Taxonomy::new();
    taxonomy.insert("Mercado".to_string(), vec!["Padaria".to_string()]);
    taxonomy.insert("Transporte".to_string(), vec![]);
    taxonomy
}

fn row(id: i64, descricao: &str, valor: f64) -> Transaction {
    Transaction {
        id: Some(TransactionId::new(id)),
        data: Some("2025-08-10".to_string()),
        descricao: descricao.to_string(),
        descricao_original: None,
        tem_mapeamento: false,
        categoria: "Mercado".to_string(),
        subcategoria: None,
        valor: Valor::new(valor),
        parcela: None,
    }
}

fn dashboard(app: &TestApp) -> &DashboardState {
    match app.state().current_screen() {
        Screen::Dashboard(dashboard) => dashboard,
        other => panic!("expected dashboard, got {:?}", other),
    }
}

/// App with the taxonomy loaded and the first category expanded with rows.
fn app_with_data() -> TestApp {
    let mut app = TestApp::new();
    app.send_data_event(DataEvent::TaxonomyLoaded {
        taxonomy: taxonomy(),
    });

    // Expand "Mercado" (selection starts on its header)
    app.send_key(Key::Enter);
    assert!(matches!(
        dashboard(&app).groups[0].loading,
        LoadingState::Loading(_)
    ));

    app.send_data_event(DataEvent::CategoryTransactionsLoaded {
        categoria: "Mercado".to_string(),
        generation: 1,
        transactions: vec![row(1, "Uber", -30.0), row(2, "Feira", -50.0)],
    });
    app
}

#[test]
fn q_quits_the_app() {
    let mut app = TestApp::new();
    app.assert_not_quit();
    app.send_key(Key::Char('q'));
    app.assert_should_quit();
}

#[test]
fn help_popup_toggles_and_blocks_other_keys() {
    let mut app = TestApp::new();
    app.send_key(Key::Char('?'));
    assert!(app.state().help_visible);

    // Navigation keys are swallowed while help is up
    app.send_key(Key::Char('j'));
    assert!(app.state().help_visible);

    app.send_key(Key::Esc);
    assert!(!app.state().help_visible);
}

#[test]
fn gl_opens_the_logs_screen_and_h_returns() {
    let mut app = TestApp::new();
    app.send_keys(&[Key::Char('g'), Key::Char('l')]);
    assert!(matches!(app.state().current_screen(), Screen::Logs(_)));

    app.send_key(Key::Char('h'));
    assert!(matches!(app.state().current_screen(), Screen::Dashboard(_)));
}

#[test]
fn invalid_key_sequence_clears_the_pending_key() {
    let mut app = TestApp::new();
    app.send_key(Key::Char('g'));
    assert_eq!(app.state().pending_key, Some('g'));

    app.send_key(Key::Char('z'));
    assert_eq!(app.state().pending_key, None);
    assert!(matches!(app.state().current_screen(), Screen::Dashboard(_)));
}

#[test]
fn taxonomy_load_populates_the_dashboard() {
    let mut app = TestApp::new();
    app.send_data_event(DataEvent::TaxonomyLoaded {
        taxonomy: taxonomy(),
    });

    let dashboard = dashboard(&app);
    assert_eq!(dashboard.groups.len(), 3); // two categories + unclassified
    assert_eq!(dashboard.groups[2].categoria, "Não Classificado");
    assert_eq!(dashboard.taxonomy_loading, LoadingState::Loaded);
}

#[test]
fn expanding_a_category_shows_its_rows() {
    let app = app_with_data();
    let dashboard = dashboard(&app);

    assert!(dashboard.groups[0].expanded);
    assert_eq!(dashboard.groups[0].count(), 2);
    // header + 2 rows + 2 collapsed headers
    assert_eq!(dashboard.visible_rows().len(), 5);
}

#[test]
fn move_mode_grabs_and_esc_cancels() {
    let mut app = app_with_data();
    app.send_key(Key::Char('j')); // onto the first transaction
    app.send_key(Key::Char('m'));
    assert_eq!(dashboard(&app).input_mode, InputMode::Move);
    assert!(dashboard(&app).move_state.is_some());

    app.send_key(Key::Esc);
    assert_eq!(dashboard(&app).input_mode, InputMode::Normal);
    assert!(dashboard(&app).move_state.is_none());
}

#[test]
fn dropping_on_the_source_category_changes_nothing() {
    let mut app = app_with_data();
    app.send_key(Key::Char('j'));
    app.send_key(Key::Char('m'));
    // Target index 0 is "Mercado", the source
    app.send_key(Key::Enter);

    let dashboard = dashboard(&app);
    assert_eq!(dashboard.input_mode, InputMode::Normal);
    assert_eq!(dashboard.groups[0].count(), 2);
}

#[test]
fn rows_relocate_only_after_the_server_confirms() {
    let mut app = app_with_data();

    // Expand the destination so the relocation is visible
    {
        let state = app.state_mut();
        let dashboard = state.dashboard_mut().unwrap();
        let transporte = dashboard.group_mut("Transporte").unwrap();
        transporte.expanded = true;
        transporte.loading = LoadingState::Loaded;
    }

    // Grab "Uber" and drop it on "Transporte"
    app.send_key(Key::Char('j'));
    app.send_key(Key::Char('m'));
    app.send_key(Key::Char('j'));
    app.send_key(Key::Enter);

    // Nothing moved yet: the server has not answered
    assert_eq!(dashboard(&app).groups[0].count(), 2);

    app.send_data_event(DataEvent::DescriptionCategoryUpdated {
        descricao: "Uber".to_string(),
        categoria: "Transporte".to_string(),
        subcategoria: None,
        updated: 3,
    });

    let dashboard = dashboard(&app);
    assert_eq!(dashboard.groups[0].count(), 1);
    let transporte = dashboard
        .groups
        .iter()
        .find(|g| g.categoria == "Transporte")
        .unwrap();
    assert_eq!(transporte.count(), 1);

    // Toast reports the server's own count
    let toast = app.state().toast.as_ref().unwrap();
    assert!(toast.message.contains('3'));
}

#[test]
fn esc_dismisses_the_toast() {
    let mut app = app_with_data();
    app.send_data_event(DataEvent::RecurringAdded {
        descricao: "Academia".to_string(),
        via_hook: false,
    });
    assert!(app.state().toast.is_some());

    app.send_key(Key::Esc);
    assert!(app.state().toast.is_none());
}

#[test]
fn bracket_keys_change_the_month_and_drop_loaded_rows() {
    let mut app = app_with_data();
    let before = dashboard(&app).month.clone();

    app.send_key(Key::Char('['));

    let dashboard = dashboard(&app);
    assert_ne!(dashboard.month, before);
    // Rows cleared pending the refetch
    assert_eq!(dashboard.groups[0].count(), 0);
    assert!(matches!(
        dashboard.groups[0].loading,
        LoadingState::Loading(_)
    ));
}

#[test]
fn sort_keys_cycle_column_and_direction() {
    use financa_tui::state::sort::{SortColumn, SortDirection};

    let mut app = app_with_data();
    app.send_key(Key::Char('s'));
    assert_eq!(dashboard(&app).sort.column, SortColumn::Descricao);
    app.send_key(Key::Char('S'));
    assert_eq!(dashboard(&app).sort.direction, SortDirection::Ascending);

    // Ascending by description puts "Feira" first
    let dashboard = dashboard(&app);
    assert_eq!(dashboard.groups[0].subgroups[0].rows[0].descricao, "Feira");
}

#[test]
fn category_picker_opens_filters_and_cancels() {
    let mut app = app_with_data();
    app.send_key(Key::Char('j'));
    app.send_key(Key::Char('c'));
    assert_eq!(dashboard(&app).input_mode, InputMode::CategoryPicker);

    app.type_str("transp");
    {
        let dashboard = dashboard(&app);
        let picker = dashboard.picker.as_ref().unwrap();
        assert_eq!(picker.filtered_options(), vec!["Transporte"]);
    }

    app.send_key(Key::Esc);
    assert_eq!(dashboard(&app).input_mode, InputMode::Normal);
    assert!(dashboard(&app).picker.is_none());
}

#[test]
fn description_editor_opens_with_the_current_description() {
    let mut app = app_with_data();
    app.send_key(Key::Char('j'));
    app.send_key(Key::Char('e'));

    let dashboard = dashboard(&app);
    assert_eq!(dashboard.input_mode, InputMode::DescriptionEdit);
    let edit = dashboard.description_edit.as_ref().unwrap();
    assert_eq!(edit.descricao_original, "Uber");
    assert_eq!(edit.input, "Uber");
}

#[test]
fn mapping_rename_is_visual_and_global() {
    let mut app = app_with_data();
    app.send_data_event(DataEvent::MappingSaved {
        descricao_original: "Uber".to_string(),
        descricao_customizada: "Uber viagens".to_string(),
    });

    let dashboard = dashboard(&app);
    let renamed = dashboard.groups[0]
        .subgroups
        .iter()
        .flat_map(|s| &s.rows)
        .find(|t| t.id == Some(TransactionId::new(1)))
        .unwrap();
    assert_eq!(renamed.descricao, "Uber viagens");
    assert!(renamed.tem_mapeamento);
    // Still in the same category
    assert_eq!(dashboard.groups[0].count(), 2);
}

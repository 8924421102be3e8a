pub mod reducer;
pub mod sort;
pub mod tree;

use crate::events::EditTarget;
use crate::ui::screens::Screen;
use financa_api::endpoints::{categories::Taxonomy, transactions::Transaction, Month};
use ratatui::widgets::TableState;
use sort::SortSpec;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tree::{CategoryGroup, UNCLASSIFIED};

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

/// Represents input mode for the dashboard
#[derive(Default, Debug, Clone, PartialEq)]
pub enum InputMode {
    #[default]
    Normal,
    CategoryPicker,
    SubcategoryPicker,
    DescriptionEdit,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Transient feedback message shown in the bottom-right corner.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

const TOAST_DURATION: Duration = Duration::from_secs(4);

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_DURATION
    }
}

/// Option shown in the subcategory picker for "no subcategory".
pub const NO_SUBCATEGORY_OPTION: &str = "(sem subcategoria)";

/// State for the two-step category/subcategory picker
#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    pub target: EditTarget,
    /// None while picking the category; Some once the category was chosen
    /// and the picker moved on to the subcategory step.
    pub categoria: Option<String>,
    pub input: String,
    pub options: Vec<String>,
    pub selection_index: usize,
}

impl PickerState {
    pub fn new(target: EditTarget, options: Vec<String>) -> Self {
        Self {
            target,
            categoria: None,
            input: String::new(),
            options,
            selection_index: 0,
        }
    }

    /// Options matching the typed filter, case-insensitive.
    pub fn filtered_options(&self) -> Vec<&String> {
        if self.input.is_empty() {
            return self.options.iter().collect();
        }
        let query = self.input.to_lowercase();
        self.options
            .iter()
            .filter(|o| o.to_lowercase().contains(&query))
            .collect()
    }

    pub fn selected_option(&self) -> Option<String> {
        self.filtered_options()
            .get(self.selection_index)
            .map(|s| s.to_string())
    }
}

/// State for the description mapping editor
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionEditState {
    /// Imported description the mapping is keyed on.
    pub descricao_original: String,
    pub input: String,
}

/// A drop destination while in move mode.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTarget {
    pub categoria: String,
    pub subcategoria: Option<String>,
}

/// State while a description is grabbed for re-categorization
#[derive(Debug, Clone, PartialEq)]
pub struct MoveState {
    pub descricao: String,
    pub source_categoria: String,
    pub target_index: usize,
}

/// A visible line of the dashboard tree, addressed by indices into the
/// group structure. Rendering and selection both walk this projection so
/// they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Category(usize),
    Subcategory(usize, usize),
    Transaction(usize, usize, usize),
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub month: Month,
    pub groups: Vec<CategoryGroup>,
    pub taxonomy: Taxonomy,
    pub taxonomy_loading: LoadingState,
    pub table_state: RefCell<TableState>,
    pub input_mode: InputMode,
    pub picker: Option<PickerState>,
    pub description_edit: Option<DescriptionEditState>,
    pub move_state: Option<MoveState>,
    pub sort: SortSpec,
}

impl DashboardState {
    pub fn new(month: Month) -> Self {
        Self {
            month,
            groups: Vec::new(),
            taxonomy: Taxonomy::new(),
            taxonomy_loading: LoadingState::NotStarted,
            table_state: RefCell::new(TableState::default().with_selected(0)),
            input_mode: InputMode::Normal,
            picker: None,
            description_edit: None,
            move_state: None,
            sort: SortSpec::default(),
        }
    }

    /// Rebuild the group list from the taxonomy, preserving data already
    /// loaded into existing groups. The unclassified bucket always comes
    /// last.
    pub fn sync_groups_with_taxonomy(&mut self) {
        let mut nomes: Vec<String> = self.taxonomy.keys().cloned().collect();
        if !self.taxonomy.contains_key(UNCLASSIFIED) {
            nomes.push(UNCLASSIFIED.to_string());
        }

        let mut old = std::mem::take(&mut self.groups);
        self.groups = nomes
            .into_iter()
            .map(|nome| {
                match old.iter().position(|g| g.categoria == nome) {
                    Some(idx) => old.swap_remove(idx),
                    None => CategoryGroup::new(nome),
                }
            })
            .collect();
    }

    /// Flattened projection of everything currently on screen.
    pub fn visible_rows(&self) -> Vec<RowRef> {
        let mut rows = Vec::new();
        for (gi, group) in self.groups.iter().enumerate() {
            rows.push(RowRef::Category(gi));
            if !group.expanded || !group.is_loaded() {
                continue;
            }
            if group.is_flat() {
                for ti in 0..group.subgroups[0].rows.len() {
                    rows.push(RowRef::Transaction(gi, 0, ti));
                }
            } else {
                for (si, subgroup) in group.subgroups.iter().enumerate() {
                    rows.push(RowRef::Subcategory(gi, si));
                    if subgroup.expanded {
                        for ti in 0..subgroup.rows.len() {
                            rows.push(RowRef::Transaction(gi, si, ti));
                        }
                    }
                }
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<RowRef> {
        let selected = self.table_state.borrow().selected()?;
        self.visible_rows().get(selected).copied()
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        match self.selected_row()? {
            RowRef::Transaction(gi, si, ti) => {
                self.groups.get(gi)?.subgroups.get(si)?.rows.get(ti)
            }
            _ => None,
        }
    }

    pub fn group_mut(&mut self, categoria: &str) -> Option<&mut CategoryGroup> {
        self.groups.iter_mut().find(|g| g.categoria == categoria)
    }

    /// Drop destinations in display order: every category header, plus the
    /// subcategory headers of expanded categories.
    pub fn move_targets(&self) -> Vec<MoveTarget> {
        let mut targets = Vec::new();
        for group in &self.groups {
            targets.push(MoveTarget {
                categoria: group.categoria.clone(),
                subcategoria: None,
            });
            if group.expanded && group.is_loaded() && !group.is_flat() {
                for subgroup in &group.subgroups {
                    if !subgroup.is_default() {
                        targets.push(MoveTarget {
                            categoria: group.categoria.clone(),
                            subcategoria: Some(subgroup.nome.clone()),
                        });
                    }
                }
            }
        }
        targets
    }

    /// Re-apply the current sort to every bucket.
    pub fn apply_sort(&mut self) {
        let spec = self.sort;
        for group in &mut self.groups {
            for subgroup in &mut group.subgroups {
                sort::sort_rows(&mut subgroup.rows, spec);
            }
        }
    }

    /// Keep the selection inside the visible row range after rows moved
    /// or disappeared.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        let mut table_state = self.table_state.borrow_mut();
        let selected = table_state.selected().unwrap_or(0);
        if len == 0 {
            table_state.select(Some(0));
        } else if selected >= len {
            table_state.select(Some(len - 1));
        } else if table_state.selected().is_none() {
            table_state.select(Some(0));
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct LogsState {
    pub scroll_offset: usize,
    pub total_entries: usize,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub history: Vec<Screen>,

    // UI state
    pub help_visible: bool,
    pub pending_key: Option<char>,
    pub toast: Option<Toast>,

    // System
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            history: vec![Screen::Dashboard(Box::new(DashboardState::new(
                current_month(),
            )))],

            help_visible: false,
            pending_key: None,
            toast: None,

            should_quit: false,
        }
    }

    /// Get the current screen (last in navigation stack)
    pub fn current_screen(&self) -> &Screen {
        self.history
            .last()
            .expect("Navigation stack should never be empty")
    }

    /// Get mutable reference to current screen
    pub fn current_screen_mut(&mut self) -> &mut Screen {
        self.history
            .last_mut()
            .expect("Navigation stack should never be empty")
    }

    /// Navigate to a new screen (push to stack)
    pub fn navigate_to(&mut self, screen: Screen) {
        tracing::debug!(
            "Navigating to new screen, stack depth: {} -> {}",
            self.history.len(),
            self.history.len() + 1
        );
        self.history.push(screen);
    }

    /// Navigate back (pop from stack)
    /// Returns true if navigation succeeded, false if already at root
    pub fn navigate_back(&mut self) -> bool {
        if self.history.len() > 1 {
            tracing::debug!(
                "Navigating back, stack depth: {} -> {}",
                self.history.len(),
                self.history.len() - 1
            );
            self.history.pop();
            true
        } else {
            tracing::debug!("Cannot navigate back, already at root screen");
            false
        }
    }

    /// Dashboard state regardless of what screen sits on top of it.
    pub fn dashboard(&self) -> Option<&DashboardState> {
        self.history.iter().rev().find_map(|screen| match screen {
            Screen::Dashboard(dashboard) => Some(dashboard.as_ref()),
            _ => None,
        })
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut DashboardState> {
        self.history
            .iter_mut()
            .rev()
            .find_map(|screen| match screen {
                Screen::Dashboard(dashboard) => Some(dashboard.as_mut()),
                _ => None,
            })
    }

    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        if let Screen::Dashboard(dashboard) = self.current_screen_mut() {
            if let LoadingState::Loading(ref mut throbber_state) = dashboard.taxonomy_loading {
                return Some(throbber_state);
            }
            for group in &mut dashboard.groups {
                if let LoadingState::Loading(ref mut throbber_state) = group.loading {
                    return Some(throbber_state);
                }
            }
        }
        None
    }

    /// Drop the toast once its display window has passed.
    pub fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn current_month() -> Month {
    chrono::Local::now()
        .format("%Y-%m")
        .to_string()
        .parse()
        .expect("current date always formats as YYYY-MM")
}

pub trait Scrollable {
    fn num_items(&self) -> usize;
    fn table_state(&self) -> &RefCell<TableState>;

    fn select_prev(&mut self) {
        let mut table_state = self.table_state().borrow_mut();
        if self.num_items() > 0 {
            if table_state.selected().unwrap_or(0) == 0 {
                table_state.select_last();
            } else {
                table_state.scroll_up_by(1)
            }
        }
    }

    fn select_next(&mut self) {
        let num_items = self.num_items();
        let mut table_state = self.table_state().borrow_mut();
        if num_items > 0 {
            if table_state.selected().unwrap_or(num_items - 1) == num_items - 1 {
                table_state.select_first();
            } else {
                table_state.scroll_down_by(1)
            }
        }
    }
}

impl Scrollable for DashboardState {
    fn num_items(&self) -> usize {
        self.visible_rows().len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.table_state
    }
}

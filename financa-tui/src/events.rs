use financa_api::endpoints::{
    categories::Taxonomy,
    transactions::Transaction,
    variances::SubcategoryVariance,
    TransactionId, Valor,
};
use std::collections::HashMap;

/// Where an inline category edit should be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    /// A single server-addressable row.
    Row {
        id: TransactionId,
        descricao: String,
    },
    /// Every row sharing an exact description.
    Descricao { descricao: String },
}

/// Commands to execute (user actions → background tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    SelectNext,
    SelectPrevious,
    NavigateToTop,
    NavigateToBottom,

    // Navigation
    NavigateBack,

    // Data loading
    LoadTaxonomy {
        force_refresh: bool,
    },
    ToggleCategory {
        categoria: String,
    },
    ToggleSubcategory {
        categoria: String,
        subcategoria: String,
    },
    RefreshDashboard,
    NavigateMonth {
        forward: bool,
    },

    // Inline category editor (two-step picker)
    OpenCategoryEditor {
        target: EditTarget,
    },
    AppendPickerChar(char),
    DeletePickerChar,
    SelectPickerItem {
        up: bool,
    },
    ConfirmPickerSelection,
    CancelPicker,

    // Description mapping editor
    OpenDescriptionEditor {
        descricao_original: String,
        descricao_atual: String,
    },
    AppendEditorChar(char),
    DeleteEditorChar,
    SubmitDescriptionEdit,
    CancelDescriptionEdit,
    DeleteMapping {
        descricao_original: String,
    },

    // Move mode (keyboard re-categorization)
    EnterMoveMode {
        descricao: String,
        source_categoria: String,
    },
    MoveTargetNext,
    MoveTargetPrevious,
    ConfirmMove,
    /// Drop the grabbed description onto recurring registration instead
    /// of a category.
    ConfirmMoveRecurring,
    CancelMove,

    // Recurring expenses
    AddRecurring {
        descricao: String,
        categoria: String,
        valor: Valor,
    },

    // Table sorting
    CycleSortColumn,
    ToggleSortDirection,

    // View toggles
    ToggleHelp,
    DismissToast,

    // Log screen
    NavigateToLogs,
    ScrollLogsUp,
    ScrollLogsDown,
    ScrollLogsPageUp,
    ScrollLogsPageDown,

    // Key sequence state
    SetPendingKey(char),
    ClearPendingKey,

    // System
    Quit,
}

/// Events from background tasks (responses to commands)
#[derive(Debug, Clone)]
pub enum DataEvent {
    // Taxonomy (cache is instant, API is slower; last write wins)
    TaxonomyCacheLoaded {
        taxonomy: Taxonomy,
    },
    TaxonomyLoaded {
        taxonomy: Taxonomy,
    },
    TaxonomyLoadFailed {
        error: String,
    },

    // Per-category transaction data
    CategoryTransactionsLoaded {
        categoria: String,
        generation: u64,
        transactions: Vec<Transaction>,
    },
    CategoryTransactionsLoadFailed {
        categoria: String,
        generation: u64,
        error: String,
    },
    CategoryVariancesLoaded {
        categoria: String,
        generation: u64,
        variances: HashMap<String, SubcategoryVariance>,
    },

    // Category updates (rows only relocate after these arrive). The server
    // fans a row edit out to every transaction sharing the description.
    RowCategoryUpdated {
        id: TransactionId,
        descricao: String,
        categoria: String,
        subcategoria: Option<String>,
        updated: u32,
    },
    RowCategoryUpdateFailed {
        id: TransactionId,
        error: String,
    },
    DescriptionCategoryUpdated {
        descricao: String,
        categoria: String,
        subcategoria: Option<String>,
        updated: u32,
    },
    DescriptionCategoryUpdateFailed {
        descricao: String,
        error: String,
    },

    // Description mappings
    MappingSaved {
        descricao_original: String,
        descricao_customizada: String,
    },
    MappingSaveFailed {
        descricao_original: String,
        error: String,
    },
    MappingDeleted {
        descricao_original: String,
    },
    MappingDeleteFailed {
        descricao_original: String,
        error: String,
    },

    // Recurring expenses
    RecurringAdded {
        descricao: String,
        via_hook: bool,
    },
    RecurringAddFailed {
        descricao: String,
        error: String,
    },
}

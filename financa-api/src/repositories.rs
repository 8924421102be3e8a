use crate::endpoints::{
    Month, TransactionId, Valor,
    categories::ListCategories,
    mappings::{DeleteDescriptionMapping, SaveDescriptionMapping},
    recurring::AddRecurring,
    transactions::{ListTransactions, UpdateByDescription, UpdateTransactionCategory},
    variances::ListSubcategoryVariances,
};

pub struct CategoryRepository;

impl CategoryRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self) -> ListCategories {
        ListCategories::new()
    }
}

pub struct MappingRepository;

impl MappingRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn save(
        &self,
        descricao_original: impl Into<String>,
        descricao_customizada: impl Into<String>,
    ) -> SaveDescriptionMapping {
        SaveDescriptionMapping::new(descricao_original, descricao_customizada)
    }

    pub fn delete(&self, descricao_original: impl Into<String>) -> DeleteDescriptionMapping {
        DeleteDescriptionMapping::new(descricao_original)
    }
}

pub struct RecurringRepository;

impl RecurringRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn add(
        &self,
        descricao: impl Into<String>,
        categoria: impl Into<String>,
        valor: Valor,
    ) -> AddRecurring {
        AddRecurring::new(descricao, categoria, valor)
    }
}

pub struct TransactionRepository {
    month: Month,
}

impl TransactionRepository {
    pub fn new(month: Month) -> Self {
        Self { month }
    }

    pub fn list(&self, categoria: impl Into<String>) -> ListTransactions {
        ListTransactions::new(self.month.clone(), categoria)
    }

    pub fn update_category(
        &self,
        id: TransactionId,
        categoria: impl Into<String>,
    ) -> UpdateTransactionCategory {
        UpdateTransactionCategory::new(id, categoria)
    }

    pub fn update_by_description(
        &self,
        descricao: impl Into<String>,
        categoria: impl Into<String>,
    ) -> UpdateByDescription {
        UpdateByDescription::new(descricao, categoria)
    }
}

pub struct VarianceRepository {
    month: Month,
}

impl VarianceRepository {
    pub fn new(month: Month) -> Self {
        Self { month }
    }

    pub fn list(&self, categoria: impl Into<String>) -> ListSubcategoryVariances {
        ListSubcategoryVariances::new(self.month.clone(), categoria)
    }
}

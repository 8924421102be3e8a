use super::LoadingState;
use financa_api::endpoints::{transactions::Transaction, variances::SubcategoryVariance, Valor};
use itertools::Itertools;
use std::collections::HashMap;

/// Bucket used for rows that carry no subcategory.
pub const DEFAULT_BUCKET: &str = "Sem subcategoria";

/// Category that collects rows dropped without an explicit destination.
pub const UNCLASSIFIED: &str = "Não Classificado";

/// Rows of one subcategory inside an expanded category.
///
/// Count and total are always derived from the live rows so they can
/// never drift from what is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryGroup {
    pub nome: String,
    pub expanded: bool,
    pub rows: Vec<Transaction>,
}

impl SubcategoryGroup {
    pub fn new(nome: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            expanded: false,
            rows: Vec::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.nome == DEFAULT_BUCKET
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> Valor {
        self.rows.iter().map(|t| t.valor).sum()
    }
}

/// One expandable category table on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub categoria: String,
    pub expanded: bool,
    pub loading: LoadingState,
    /// Fetch token. Results stamped with an older generation are stale
    /// and must be dropped.
    pub generation: u64,
    pub subgroups: Vec<SubcategoryGroup>,
    pub variances: HashMap<String, SubcategoryVariance>,
}

impl CategoryGroup {
    pub fn new(categoria: impl Into<String>) -> Self {
        Self {
            categoria: categoria.into(),
            expanded: false,
            loading: LoadingState::NotStarted,
            generation: 0,
            subgroups: Vec::new(),
            variances: HashMap::new(),
        }
    }

    /// A category renders flat (no subcategory headers) when every row
    /// landed in the default bucket.
    pub fn is_flat(&self) -> bool {
        self.subgroups.len() == 1 && self.subgroups[0].is_default()
    }

    pub fn count(&self) -> usize {
        self.subgroups.iter().map(SubcategoryGroup::count).sum()
    }

    pub fn total(&self) -> Valor {
        self.subgroups.iter().map(|s| s.total()).sum()
    }

    pub fn is_loaded(&self) -> bool {
        self.loading == LoadingState::Loaded
    }

    /// Replace all rows with a freshly fetched batch.
    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) {
        self.subgroups = group_by_subcategoria(transactions);
    }

    pub fn variance_for(&self, subgroup: &SubcategoryGroup) -> Option<&SubcategoryVariance> {
        self.variances.get(&subgroup.nome)
    }

    /// Remove every row matching the predicate, pruning buckets that end
    /// up empty. Returns the removed rows in display order.
    pub fn remove_rows_matching<F>(&mut self, mut pred: F) -> Vec<Transaction>
    where
        F: FnMut(&Transaction) -> bool,
    {
        let mut removed = Vec::new();
        for subgroup in &mut self.subgroups {
            let mut kept = Vec::with_capacity(subgroup.rows.len());
            for row in subgroup.rows.drain(..) {
                if pred(&row) {
                    removed.push(row);
                } else {
                    kept.push(row);
                }
            }
            subgroup.rows = kept;
        }
        if !removed.is_empty() {
            self.subgroups.retain(|s| !s.rows.is_empty());
        }
        removed
    }

    /// Insert rows into the bucket for `subcategoria`, creating it on
    /// demand, and re-rank the buckets by total.
    pub fn insert_rows(&mut self, rows: Vec<Transaction>, subcategoria: Option<&str>) {
        if rows.is_empty() {
            return;
        }
        let nome = match subcategoria {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_BUCKET,
        };
        let subgroup = match self.subgroups.iter_mut().find(|s| s.nome == nome) {
            Some(existing) => existing,
            None => {
                self.subgroups.push(SubcategoryGroup::new(nome));
                self.subgroups.last_mut().expect("just pushed")
            }
        };
        subgroup.rows.extend(rows);
        order_buckets(&mut self.subgroups);
    }
}

fn bucket_name(transaction: &Transaction) -> &str {
    let nome = transaction.grouping_subcategoria();
    if nome.is_empty() {
        DEFAULT_BUCKET
    } else {
        nome
    }
}

/// Bucket rows by subcategory. Buckets are ranked by total, descending;
/// ties keep fetch order.
pub fn group_by_subcategoria(transactions: Vec<Transaction>) -> Vec<SubcategoryGroup> {
    let nomes: Vec<String> = transactions
        .iter()
        .map(|t| bucket_name(t).to_string())
        .unique()
        .collect();

    let mut subgroups: Vec<SubcategoryGroup> = nomes
        .into_iter()
        .map(SubcategoryGroup::new)
        .collect();

    for transaction in transactions {
        let nome = bucket_name(&transaction).to_string();
        if let Some(subgroup) = subgroups.iter_mut().find(|s| s.nome == nome) {
            subgroup.rows.push(transaction);
        }
    }

    order_buckets(&mut subgroups);
    subgroups
}

fn order_buckets(subgroups: &mut [SubcategoryGroup]) {
    subgroups.sort_by(|a, b| {
        b.total()
            .partial_cmp(&a.total())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(descricao: &str, subcategoria: Option<&str>, valor: f64) -> Transaction {
        Transaction {
            id: None,
            data: Some("2025-08-01".to_string()),
            descricao: descricao.to_string(),
            descricao_original: None,
            tem_mapeamento: false,
            categoria: "Mercado".to_string(),
            subcategoria: subcategoria.map(str::to_string),
            valor: Valor::new(valor),
            parcela: None,
        }
    }

    #[test]
    fn groups_rows_and_ranks_buckets_by_total_descending() {
        let subgroups = group_by_subcategoria(vec![
            row("Padaria", Some("Padaria"), -10.0),
            row("Açougue", Some("Carnes"), -80.0),
            row("Pão", Some("Padaria"), -15.0),
        ]);

        // -25 sorts above -80
        assert_eq!(subgroups.len(), 2);
        assert_eq!(subgroups[0].nome, "Padaria");
        assert_eq!(subgroups[1].nome, "Carnes");
        assert_eq!(subgroups[0].count(), 2);
        assert_eq!(subgroups[0].total().inner(), -25.0);
    }

    #[test]
    fn smaller_expense_bucket_ranks_above_larger_one() {
        let subgroups = group_by_subcategoria(vec![
            row("Açougue", Some("Carnes"), -80.0),
            row("Pão", Some("Padaria"), -10.0),
        ]);

        let nomes: Vec<&str> = subgroups.iter().map(|s| s.nome.as_str()).collect();
        assert_eq!(nomes, vec!["Padaria", "Carnes"]);
    }

    #[test]
    fn rows_without_subcategory_fall_into_default_bucket() {
        let subgroups = group_by_subcategoria(vec![
            row("Feira", None, -20.0),
            row("Quitanda", Some(""), -5.0),
        ]);

        assert_eq!(subgroups.len(), 1);
        assert_eq!(subgroups[0].nome, DEFAULT_BUCKET);
        assert_eq!(subgroups[0].count(), 2);
    }

    #[test]
    fn flat_view_requires_single_default_bucket() {
        let mut group = CategoryGroup::new("Mercado");
        group.set_transactions(vec![row("Feira", None, -20.0)]);
        assert!(group.is_flat());

        group.set_transactions(vec![row("Feira", None, -20.0), row("Pão", Some("Padaria"), -5.0)]);
        assert!(!group.is_flat());
    }

    #[test]
    fn removing_last_row_prunes_the_bucket() {
        let mut group = CategoryGroup::new("Mercado");
        group.set_transactions(vec![
            row("Feira", Some("Hortifruti"), -20.0),
            row("Pão", Some("Padaria"), -5.0),
        ]);

        let removed = group.remove_rows_matching(|t| t.descricao == "Pão");
        assert_eq!(removed.len(), 1);
        assert_eq!(group.subgroups.len(), 1);
        assert_eq!(group.subgroups[0].nome, "Hortifruti");
    }

    #[test]
    fn insert_creates_bucket_on_demand_and_reranks() {
        let mut group = CategoryGroup::new("Mercado");
        group.set_transactions(vec![row("Pão", Some("Padaria"), -5.0)]);

        group.insert_rows(vec![row("Açougue", Some("Carnes"), -1.0)], Some("Carnes"));
        assert_eq!(group.subgroups[0].nome, "Carnes");
        assert_eq!(group.count(), 2);
    }
}

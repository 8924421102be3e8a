use chrono::NaiveDate;
use financa_api::endpoints::transactions::Transaction;
use std::cmp::Ordering;

/// Column the transaction tables are sorted by.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Data,
    Descricao,
    Valor,
    Parcela,
}

impl SortColumn {
    pub fn next(&self) -> Self {
        match self {
            Self::Data => Self::Descricao,
            Self::Descricao => Self::Valor,
            Self::Valor => Self::Parcela,
            Self::Parcela => Self::Data,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Descricao => "descrição",
            Self::Valor => "valor",
            Self::Parcela => "parcela",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Descending
    }
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Sort rows in place. The sort is stable, so equal keys keep fetch order.
pub fn sort_rows(rows: &mut [Transaction], spec: SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, spec.column);
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &Transaction, b: &Transaction, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Data => date_key(a.data.as_deref()).cmp(&date_key(b.data.as_deref())),
        SortColumn::Descricao => a
            .descricao
            .to_lowercase()
            .cmp(&b.descricao.to_lowercase()),
        SortColumn::Valor => a
            .valor
            .partial_cmp(&b.valor)
            .unwrap_or(Ordering::Equal),
        SortColumn::Parcela => {
            parcela_key(a.parcela.as_deref()).cmp(&parcela_key(b.parcela.as_deref()))
        }
    }
}

/// Dates are compared as dates, never as strings. Unparseable or missing
/// dates sort before everything else.
fn date_key(data: Option<&str>) -> Option<NaiveDate> {
    let data = data?;
    NaiveDate::parse_from_str(data, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(data, "%d/%m/%Y"))
        .ok()
}

/// Installment labels like "2/10" order by their current installment.
fn parcela_key(parcela: Option<&str>) -> Option<u32> {
    parcela?.split('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use financa_api::endpoints::Valor;

    fn row(descricao: &str, data: Option<&str>, valor: f64, parcela: Option<&str>) -> Transaction {
        Transaction {
            id: None,
            data: data.map(str::to_string),
            descricao: descricao.to_string(),
            descricao_original: None,
            tem_mapeamento: false,
            categoria: String::new(),
            subcategoria: None,
            valor: Valor::new(valor),
            parcela: parcela.map(str::to_string),
        }
    }

    #[test]
    fn sorts_dates_as_dates_not_strings() {
        let mut rows = vec![
            row("a", Some("02/01/2025"), -1.0, None),
            row("b", Some("2024-12-31"), -1.0, None),
        ];
        sort_rows(
            &mut rows,
            SortSpec {
                column: SortColumn::Data,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(rows[0].descricao, "b");
    }

    #[test]
    fn sorts_valor_numerically() {
        let mut rows = vec![
            row("small", None, -9.5, None),
            row("big", None, -100.0, None),
        ];
        sort_rows(
            &mut rows,
            SortSpec {
                column: SortColumn::Valor,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(rows[0].descricao, "big");
    }

    #[test]
    fn sorts_parcela_by_current_installment() {
        let mut rows = vec![
            row("later", None, -1.0, Some("10/12")),
            row("earlier", None, -1.0, Some("2/12")),
            row("none", None, -1.0, None),
        ];
        sort_rows(
            &mut rows,
            SortSpec {
                column: SortColumn::Parcela,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(rows[0].descricao, "none");
        assert_eq!(rows[1].descricao, "earlier");
        assert_eq!(rows[2].descricao, "later");
    }

    #[test]
    fn default_sort_is_newest_first() {
        let mut rows = vec![
            row("old", Some("2025-08-01"), -1.0, None),
            row("new", Some("2025-08-20"), -1.0, None),
        ];
        sort_rows(&mut rows, SortSpec::default());
        assert_eq!(rows[0].descricao, "new");
    }
}

use super::{CategoriaQuery, Month, TransactionId, UpdateResponse, Valor};
use crate::macros::setter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Common

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Absent for synthetic rows the server cannot address individually.
    pub id: Option<TransactionId>,
    #[serde(default)]
    pub data: Option<String>,
    pub descricao: String,
    #[serde(default)]
    pub descricao_original: Option<String>,
    #[serde(default)]
    pub tem_mapeamento: bool,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub subcategoria: Option<String>,
    pub valor: Valor,
    #[serde(default)]
    pub parcela: Option<String>,
}

impl Transaction {
    /// The description the row was imported with, before any mapping.
    pub fn original_descricao(&self) -> &str {
        self.descricao_original.as_deref().unwrap_or(&self.descricao)
    }

    /// Grouping key for the subcategory tree. Empty means "no subcategory".
    pub fn grouping_subcategoria(&self) -> &str {
        self.subcategoria.as_deref().unwrap_or("")
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ListTransactions {
    #[serde(skip)]
    month: Month,
    #[serde(skip)]
    query: CategoriaQuery,
}

impl ListTransactions {
    pub fn new(month: Month, categoria: impl Into<String>) -> Self {
        Self {
            month,
            query: CategoriaQuery {
                categoria: categoria.into(),
            },
        }
    }
}

impl Request for ListTransactions {
    type Data = CategoriaQuery;
    type Response = Vec<Transaction>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/api/transacoes/{}", self.month).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(&self.query)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateTransactionCategory {
    #[serde(skip)]
    id: TransactionId,
    categoria: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subcategoria: Option<String>,
}

impl UpdateTransactionCategory {
    pub fn new(id: TransactionId, categoria: impl Into<String>) -> Self {
        Self {
            id,
            categoria: categoria.into(),
            subcategoria: None,
        }
    }

    setter!(opt subcategoria: String);
}

impl Request for UpdateTransactionCategory {
    type Data = Self;
    type Response = UpdateResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/api/transacoes/{}/categoria", self.id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

/// Re-categorizes every transaction sharing an exact description on the server.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateByDescription {
    descricao: String,
    categoria: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subcategoria: Option<String>,
}

impl UpdateByDescription {
    pub fn new(descricao: impl Into<String>, categoria: impl Into<String>) -> Self {
        Self {
            descricao: descricao.into(),
            categoria: categoria.into(),
            subcategoria: None,
        }
    }

    setter!(opt subcategoria: String);
}

impl Request for UpdateByDescription {
    type Data = Self;
    type Response = UpdateResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/api/transacoes/atualizar-por-descricao".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_row() {
        let t: Transaction =
            serde_json::from_str(r#"{"descricao": "UBER TRIP", "valor": -23.9}"#).unwrap();
        assert_eq!(t.id, None);
        assert_eq!(t.original_descricao(), "UBER TRIP");
        assert!(!t.tem_mapeamento);
        assert_eq!(t.grouping_subcategoria(), "");
        assert!(t.valor.is_negative());
    }

    #[test]
    fn original_descricao_prefers_mapping_source() {
        let t: Transaction = serde_json::from_str(
            r#"{
                "id": 7,
                "descricao": "Uber",
                "descricao_original": "UBER *TRIP 99",
                "tem_mapeamento": true,
                "categoria": "Transporte",
                "subcategoria": "Apps",
                "valor": -23.9,
                "parcela": "2/10"
            }"#,
        )
        .unwrap();
        assert_eq!(t.original_descricao(), "UBER *TRIP 99");
        assert_eq!(t.grouping_subcategoria(), "Apps");
        assert_eq!(t.id, Some(TransactionId::new(7)));
    }

    #[test]
    fn update_by_description_serializes_optional_subcategoria() {
        let req = UpdateByDescription::new("Uber", "Transporte");
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("subcategoria").is_none());

        let req = req.subcategoria("Apps");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["subcategoria"], "Apps");
    }
}

use super::{CategoriaQuery, Month};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tower_api_client::{Request, RequestData};

/// Historical spend comparison for one subcategory of the queried category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryVariance {
    pub media_historica: f64,
    pub total_atual: f64,
    pub variacao_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSubcategoryVariances {
    #[serde(skip)]
    month: Month,
    #[serde(skip)]
    query: CategoriaQuery,
}

impl ListSubcategoryVariances {
    pub fn new(month: Month, categoria: impl Into<String>) -> Self {
        Self {
            month,
            query: CategoriaQuery {
                categoria: categoria.into(),
            },
        }
    }
}

impl Request for ListSubcategoryVariances {
    type Data = CategoriaQuery;
    type Response = HashMap<String, SubcategoryVariance>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/api/variacao-subcategorias/{}", self.month).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(&self.query)
    }
}

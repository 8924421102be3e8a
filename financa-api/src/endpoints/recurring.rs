use super::{StatusResponse, Valor};
use crate::macros::setter;
use serde::Serialize;
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

#[derive(Debug, Clone, Serialize)]
pub struct AddRecurring {
    descricao: String,
    categoria: String,
    valor: Valor,
    tipo: String,
}

impl AddRecurring {
    /// The amount is registered as an absolute value; recurrences carry no sign.
    pub fn new(descricao: impl Into<String>, categoria: impl Into<String>, valor: Valor) -> Self {
        Self {
            descricao: descricao.into(),
            categoria: categoria.into(),
            valor: valor.abs(),
            tipo: "mensal".to_string(),
        }
    }

    setter!(tipo: String);
}

impl Request for AddRecurring {
    type Data = Self;
    type Response = StatusResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/api/recorrentes/adicionar".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

use super::StatusResponse;
use serde::Serialize;
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

/// Installs a global display-name rule for one original description.
#[derive(Debug, Clone, Serialize)]
pub struct SaveDescriptionMapping {
    descricao_original: String,
    descricao_customizada: String,
}

impl SaveDescriptionMapping {
    pub fn new(
        descricao_original: impl Into<String>,
        descricao_customizada: impl Into<String>,
    ) -> Self {
        Self {
            descricao_original: descricao_original.into(),
            descricao_customizada: descricao_customizada.into(),
        }
    }
}

impl Request for SaveDescriptionMapping {
    type Data = Self;
    type Response = StatusResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/api/mapeamento-descricao".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteDescriptionMapping {
    descricao_original: String,
}

impl DeleteDescriptionMapping {
    pub fn new(descricao_original: impl Into<String>) -> Self {
        Self {
            descricao_original: descricao_original.into(),
        }
    }
}

impl Request for DeleteDescriptionMapping {
    type Data = Self;
    type Response = StatusResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        "/api/mapeamento-descricao".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

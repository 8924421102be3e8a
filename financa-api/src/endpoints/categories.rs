use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tower_api_client::{Request, RequestData};

/// Category taxonomy: categoria name to its subcategoria names.
pub type Taxonomy = BTreeMap<String, Vec<String>>;

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListCategories;

impl ListCategories {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Request for ListCategories {
    type Data = ();
    type Response = Taxonomy;

    fn endpoint(&self) -> Cow<'_, str> {
        "/api/categorias".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}

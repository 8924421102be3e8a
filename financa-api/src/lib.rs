pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::FinancaApiError;
use endpoints::Month;
use repositories::*;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub struct Client {
    inner: ApiClient,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, FinancaApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

pub struct Request;

impl Request {
    pub fn new() -> Self {
        Self {}
    }

    pub fn categories() -> CategoryRepository {
        CategoryRepository::new()
    }

    pub fn mappings() -> MappingRepository {
        MappingRepository::new()
    }

    pub fn recurring() -> RecurringRepository {
        RecurringRepository::new()
    }

    pub fn transactions(month: Month) -> TransactionRepository {
        TransactionRepository::new(month)
    }

    pub fn variances(month: Month) -> VarianceRepository {
        VarianceRepository::new(month)
    }
}

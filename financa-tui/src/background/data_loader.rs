use crate::cache::TaxonomyCache;
use crate::events::DataEvent;
use crate::hooks::{RecurringHooks, RecurringRequest};
use financa_api::endpoints::{Month, TransactionId, Valor};
use financa_api::{Client, Request};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the API and cache traffic for the dashboard.
///
/// Every method reports back through the data event channel; nothing here
/// touches application state directly.
#[derive(Clone)]
pub struct DataLoader {
    api_client: Arc<Client>,
    cache: Arc<TaxonomyCache>,
    hooks: Arc<dyn RecurringHooks>,
    data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl DataLoader {
    pub fn new(
        api_client: Arc<Client>,
        cache: Arc<TaxonomyCache>,
        hooks: Arc<dyn RecurringHooks>,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            api_client,
            cache,
            hooks,
            data_tx,
        }
    }

    /// Load the category taxonomy, cache first for an instant paint, then
    /// fresh from the API. The fresh copy always wins.
    pub async fn load_taxonomy(&self, force_refresh: bool) {
        if !force_refresh {
            match self.cache.get_taxonomy().await {
                Ok(Some(cached)) => {
                    let _ = self.data_tx.send(DataEvent::TaxonomyCacheLoaded {
                        taxonomy: cached.taxonomy,
                    });
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to read taxonomy cache: {}", e),
            }
        }

        match self.api_client.send(Request::categories().list()).await {
            Ok(taxonomy) => {
                let cache = Arc::clone(&self.cache);
                let to_cache = taxonomy.clone();
                tokio::spawn(async move {
                    if let Err(e) = cache.set_taxonomy(&to_cache).await {
                        tracing::warn!("Failed to write taxonomy cache: {}", e);
                    }
                });
                let _ = self.data_tx.send(DataEvent::TaxonomyLoaded { taxonomy });
            }
            Err(e) => {
                let _ = self.data_tx.send(DataEvent::TaxonomyLoadFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Fetch one category's transactions and variances for the month.
    /// Variances are decorative, so their failure only logs.
    pub async fn load_category(&self, categoria: String, month: Month, generation: u64) {
        let request = Request::transactions(month.clone()).list(categoria.clone());
        match self.api_client.send(request).await {
            Ok(transactions) => {
                let _ = self.data_tx.send(DataEvent::CategoryTransactionsLoaded {
                    categoria: categoria.clone(),
                    generation,
                    transactions,
                });
            }
            Err(e) => {
                let _ = self.data_tx.send(DataEvent::CategoryTransactionsLoadFailed {
                    categoria,
                    generation,
                    error: e.to_string(),
                });
                return;
            }
        }

        let request = Request::variances(month).list(categoria.clone());
        match self.api_client.send(request).await {
            Ok(variances) => {
                let _ = self.data_tx.send(DataEvent::CategoryVariancesLoaded {
                    categoria,
                    generation,
                    variances,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to load variances for '{}': {}", categoria, e);
            }
        }
    }

    pub async fn update_row_category(
        &self,
        month: Month,
        id: TransactionId,
        descricao: String,
        categoria: String,
        subcategoria: Option<String>,
    ) {
        let mut request = Request::transactions(month).update_category(id, categoria.clone());
        if let Some(ref sub) = subcategoria {
            request = request.subcategoria(sub.clone());
        }

        let event = match self.api_client.send(request).await {
            Ok(response) if response.success => DataEvent::RowCategoryUpdated {
                id,
                descricao,
                categoria,
                subcategoria,
                updated: response.transacoes_atualizadas,
            },
            Ok(_) => DataEvent::RowCategoryUpdateFailed {
                id,
                error: "servidor recusou a atualização".to_string(),
            },
            Err(e) => DataEvent::RowCategoryUpdateFailed {
                id,
                error: e.to_string(),
            },
        };
        let _ = self.data_tx.send(event);
    }

    pub async fn update_description_category(
        &self,
        month: Month,
        descricao: String,
        categoria: String,
        subcategoria: Option<String>,
    ) {
        let mut request =
            Request::transactions(month).update_by_description(descricao.clone(), categoria.clone());
        if let Some(ref sub) = subcategoria {
            request = request.subcategoria(sub.clone());
        }

        let event = match self.api_client.send(request).await {
            Ok(response) if response.success => DataEvent::DescriptionCategoryUpdated {
                descricao,
                categoria,
                subcategoria,
                updated: response.transacoes_atualizadas,
            },
            Ok(_) => DataEvent::DescriptionCategoryUpdateFailed {
                descricao,
                error: "servidor recusou a atualização".to_string(),
            },
            Err(e) => DataEvent::DescriptionCategoryUpdateFailed {
                descricao,
                error: e.to_string(),
            },
        };
        let _ = self.data_tx.send(event);
    }

    pub async fn save_mapping(&self, descricao_original: String, descricao_customizada: String) {
        let request = Request::mappings().save(&descricao_original, &descricao_customizada);
        let event = match self.api_client.send(request).await {
            Ok(response) if response.success => DataEvent::MappingSaved {
                descricao_original,
                descricao_customizada,
            },
            Ok(_) => DataEvent::MappingSaveFailed {
                descricao_original,
                error: "servidor recusou o mapeamento".to_string(),
            },
            Err(e) => DataEvent::MappingSaveFailed {
                descricao_original,
                error: e.to_string(),
            },
        };
        let _ = self.data_tx.send(event);
    }

    pub async fn delete_mapping(&self, descricao_original: String) {
        let request = Request::mappings().delete(&descricao_original);
        let event = match self.api_client.send(request).await {
            Ok(response) if response.success => DataEvent::MappingDeleted { descricao_original },
            Ok(_) => DataEvent::MappingDeleteFailed {
                descricao_original,
                error: "servidor recusou a remoção".to_string(),
            },
            Err(e) => DataEvent::MappingDeleteFailed {
                descricao_original,
                error: e.to_string(),
            },
        };
        let _ = self.data_tx.send(event);
    }

    /// Register a recurring expense. External hooks get the request first;
    /// the API is the fallback when no hook claims it.
    pub async fn add_recurring(&self, descricao: String, categoria: String, valor: Valor) {
        let request = RecurringRequest {
            descricao: descricao.clone(),
            categoria: categoria.clone(),
            valor,
        };

        if self.hooks.open_prefilled_form(&request) || self.hooks.quick_add(&request) {
            let _ = self.data_tx.send(DataEvent::RecurringAdded {
                descricao,
                via_hook: true,
            });
            return;
        }

        let request = Request::recurring().add(&descricao, &categoria, valor);
        let event = match self.api_client.send(request).await {
            Ok(response) if response.success => {
                self.hooks.refresh_list();
                DataEvent::RecurringAdded {
                    descricao,
                    via_hook: false,
                }
            }
            Ok(_) => DataEvent::RecurringAddFailed {
                descricao,
                error: "servidor recusou o cadastro".to_string(),
            },
            Err(e) => DataEvent::RecurringAddFailed {
                descricao,
                error: e.to_string(),
            },
        };
        let _ = self.data_tx.send(event);
    }
}

use financa_api::endpoints::Valor;

/// A recurring expense about to be registered.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRequest {
    pub descricao: String,
    pub categoria: String,
    pub valor: Valor,
}

/// Integration points for an external recurring-expense manager.
///
/// Each hook returns true when it handled the request. The loader walks the
/// chain in order (prefilled form, then quick add) and only calls the API
/// when no hook claimed the request.
pub trait RecurringHooks: Send + Sync {
    fn open_prefilled_form(&self, _request: &RecurringRequest) -> bool {
        false
    }

    fn quick_add(&self, _request: &RecurringRequest) -> bool {
        false
    }

    /// Called after a direct API add succeeds, so an external recurring
    /// list can refresh itself.
    fn refresh_list(&self) {}
}

/// Default hook set: nothing is handled locally, everything goes to the API.
pub struct NoHooks;

impl RecurringHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn no_hooks_defers_to_api() {
        let request = RecurringRequest {
            descricao: "Academia".to_string(),
            categoria: "Saúde".to_string(),
            valor: Valor::new(120.0),
        };
        assert!(!NoHooks.open_prefilled_form(&request));
        assert!(!NoHooks.quick_add(&request));
    }

    #[test]
    fn refresh_hook_dispatches_through_the_trait_object() {
        #[derive(Default)]
        struct ListRefresher {
            refreshed: AtomicBool,
        }

        impl RecurringHooks for ListRefresher {
            fn refresh_list(&self) {
                self.refreshed.store(true, Ordering::SeqCst);
            }
        }

        let refresher = ListRefresher::default();
        let hooks: &dyn RecurringHooks = &refresher;
        hooks.refresh_list();
        assert!(refresher.refreshed.load(Ordering::SeqCst));
    }
}

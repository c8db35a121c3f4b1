//! Saved-schemes boundary: add, remove and list per user, with a local
//! fallback when the hosted store is unreachable.

pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use repository::{
    LocalSavedSchemes, RemoteSavedSchemes, SavedScheme, StoreError, UserId, LOCAL_NAMESPACE,
};
pub use service::{RemoveOutcome, SaveOutcome, SavedSchemesError, SavedSchemesService, SavedStore};

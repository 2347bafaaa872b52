use super::domain::{ProfileId, RawProfile};
use crate::pnp::PnpCatalogue;

/// Read access to stored immigration profiles.
pub trait ProfileRepository: Send + Sync {
    fn load_profile(&self, id: &ProfileId) -> Result<Option<RawProfile>, RepositoryError>;
}

/// Read access to the provincial program catalogue.
pub trait CatalogueSource: Send + Sync {
    fn load_pnp_catalogue(&self) -> Result<PnpCatalogue, RepositoryError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

use chrono::NaiveDate;
use express_entry::error::AppError;
use express_entry::express_entry::{
    CatalogueSource, ProfileId, ProfileRepository, RawProfile, RepositoryError,
};
use express_entry::pnp::{CatalogueImportError, PnpCatalogue, PnpCatalogueImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, RawProfile>>>,
}

impl InMemoryProfileRepository {
    pub(crate) fn seeded(profiles: impl IntoIterator<Item = (ProfileId, RawProfile)>) -> Self {
        let repository = Self::default();
        for (id, profile) in profiles {
            // A fresh mutex cannot be poisoned.
            let _ = repository.insert(id, profile);
        }
        repository
    }

    pub(crate) fn insert(&self, id: ProfileId, profile: RawProfile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        guard.insert(id, profile);
        Ok(())
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn load_profile(&self, id: &ProfileId) -> Result<Option<RawProfile>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("profile store lock poisoned".to_string())
}

/// Catalogue fixed at startup, either the built-in programs or a CSV export.
#[derive(Debug, Clone)]
pub(crate) struct StaticCatalogue {
    catalogue: PnpCatalogue,
}

impl StaticCatalogue {
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, CatalogueImportError> {
        let catalogue = match path {
            Some(path) => {
                let catalogue = PnpCatalogueImporter::from_path(path)?;
                info!(path = %path.display(), programs = catalogue.len(), "provincial catalogue imported");
                catalogue
            }
            None => PnpCatalogue::standard(),
        };
        Ok(Self { catalogue })
    }

    pub(crate) fn catalogue(&self) -> &PnpCatalogue {
        &self.catalogue
    }
}

impl CatalogueSource for StaticCatalogue {
    fn load_pnp_catalogue(&self) -> Result<PnpCatalogue, RepositoryError> {
        Ok(self.catalogue.clone())
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{value}': {err}"))
}

/// Reads a JSON profile document in the API's camelCase shape.
pub(crate) fn read_profile(path: &Path) -> Result<RawProfile, AppError> {
    let contents = fs::read_to_string(path)?;
    let profile = serde_json::from_str(&contents)?;
    Ok(profile)
}

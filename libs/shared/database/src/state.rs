use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StorageBackend};
use shared_models::error::AppError;

use crate::memory::MemoryStore;
use crate::postgrest::SupabaseStore;
use crate::repositories::{
    AccountRepository, AppointmentRepository, AvailabilityRepository, DoctorRepository,
    PatientRepository,
};
use crate::supabase::SupabaseClient;

/// Handles to every repository the services need.
#[derive(Clone)]
pub struct ClinicStore {
    pub accounts: Arc<dyn AccountRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
    pub patients: Arc<dyn PatientRepository>,
    pub availability: Arc<dyn AvailabilityRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
}

impl ClinicStore {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            accounts: store.clone(),
            doctors: store.clone(),
            patients: store.clone(),
            availability: store.clone(),
            appointments: store,
        }
    }

    pub fn supabase(config: &AppConfig) -> Result<Self, AppError> {
        let client = Arc::new(SupabaseClient::new(config)?);
        let store = Arc::new(SupabaseStore::new(client));
        Ok(Self {
            accounts: store.clone(),
            doctors: store.clone(),
            patients: store.clone(),
            availability: store.clone(),
            appointments: store,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage backend");
                Ok(Self::in_memory())
            }
            StorageBackend::Supabase => {
                info!("Using Supabase storage backend at {}", config.supabase_url);
                Self::supabase(config)
            }
        }
    }
}

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ClinicStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: ClinicStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let store = ClinicStore::from_config(&config)?;
        Ok(Self::new(config, store))
    }
}

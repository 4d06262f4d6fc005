//! # Subsystem Wiring
//!
//! ## Initialization Order
//!
//! 1. Open the document store (memory or RocksDB)
//! 2. Donor registry (bb-01)
//! 3. Unit lifecycle (bb-02), with the donor registry as donation ledger
//! 4. Cold storage (bb-03)
//! 5. Reporting (bb-04), reading through the unit lifecycle API
//! 6. User directory for the gateway (bb-05)

use super::config::{RuntimeConfig, StorageBackend};
use anyhow::Result;
use bb_01_donor_registry::{
    AtomicSequence, DonorRegistryApi, DonorRegistryDependencies, DonorRegistryService,
    DonorRepository, InMemoryDonorRepository, SequenceGenerator,
};
use bb_02_unit_lifecycle::{
    InMemoryUnitRepository, UnitLifecycleApi, UnitLifecycleService, UnitRepository,
};
use bb_03_cold_storage::{
    ColdStorageApi, ColdStorageConfig, ColdStorageService, InMemoryStorageUnitRepository,
    StorageUnitRepository,
};
use bb_04_reporting::{ReportingApi, ReportingService};
use bb_05_api_gateway::{GatewayServices, InMemoryUserDirectory, RegistryDonationLedger, UserDirectory};
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use tracing::info;

/// Every initialized subsystem, behind its API trait.
pub struct SubsystemContainer {
    pub units: Arc<dyn UnitLifecycleApi>,
    pub donors: Arc<dyn DonorRegistryApi>,
    pub storage: Arc<dyn ColdStorageApi>,
    pub reports: Arc<dyn ReportingApi>,
    pub users: Arc<dyn UserDirectory>,
    backend: StorageBackend,
}

impl SubsystemContainer {
    /// Wire every subsystem on the system clock.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(config: &RuntimeConfig, time: Arc<dyn TimeSource>) -> Result<Self> {
        info!(backend = %config.storage, "[runtime] Initializing subsystems");
        match config.storage {
            StorageBackend::Memory => Ok(Self::wire(
                InMemoryUnitRepository::new(),
                InMemoryDonorRepository::new(),
                AtomicSequence::new(),
                InMemoryStorageUnitRepository::new(),
                time,
                StorageBackend::Memory,
            )),
            StorageBackend::RocksDb => Self::open_rocksdb(config, time),
        }
    }

    #[cfg(feature = "rocksdb")]
    fn open_rocksdb(config: &RuntimeConfig, time: Arc<dyn TimeSource>) -> Result<Self> {
        use crate::adapters::{RocksDbConfig, RocksDbDocumentStore};
        use anyhow::Context;

        let rocks = RocksDbConfig {
            path: config.data_dir.join("rocksdb"),
            ..RocksDbConfig::default()
        };
        let store = RocksDbDocumentStore::open(&rocks)
            .with_context(|| format!("failed to open RocksDB at {}", rocks.path.display()))?;
        Ok(Self::wire(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            time,
            StorageBackend::RocksDb,
        ))
    }

    #[cfg(not(feature = "rocksdb"))]
    fn open_rocksdb(_config: &RuntimeConfig, _time: Arc<dyn TimeSource>) -> Result<Self> {
        anyhow::bail!("storage backend 'rocksdb' needs a build with the `rocksdb` feature")
    }

    fn wire<U, D, S, C>(
        unit_repository: U,
        donor_repository: D,
        sequence: S,
        storage_repository: C,
        time: Arc<dyn TimeSource>,
        backend: StorageBackend,
    ) -> Self
    where
        U: UnitRepository + 'static,
        D: DonorRepository + 'static,
        S: SequenceGenerator + 'static,
        C: StorageUnitRepository + 'static,
    {
        let donors: Arc<dyn DonorRegistryApi> =
            Arc::new(DonorRegistryService::new(DonorRegistryDependencies {
                repository: donor_repository,
                sequence,
                time_source: Arc::clone(&time),
            }));
        info!("[runtime]   ✓ bb-01 Donor Registry");

        let ledger = Arc::new(RegistryDonationLedger::new(Arc::clone(&donors)));
        let units: Arc<dyn UnitLifecycleApi> = Arc::new(
            UnitLifecycleService::new(unit_repository, Arc::clone(&time))
                .with_donation_ledger(ledger),
        );
        info!("[runtime]   ✓ bb-02 Unit Lifecycle");

        let storage: Arc<dyn ColdStorageApi> = Arc::new(ColdStorageService::new(
            storage_repository,
            Arc::clone(&time),
            ColdStorageConfig::default(),
        ));
        info!("[runtime]   ✓ bb-03 Cold Storage");

        let reports: Arc<dyn ReportingApi> =
            Arc::new(ReportingService::new(Arc::clone(&units), Arc::clone(&time)));
        info!("[runtime]   ✓ bb-04 Reporting");

        let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new(time));

        Self {
            units,
            donors,
            storage,
            reports,
            users,
            backend,
        }
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    /// The handles the API gateway routes to.
    pub fn gateway_services(&self) -> GatewayServices {
        GatewayServices {
            units: Arc::clone(&self.units),
            donors: Arc::clone(&self.donors),
            storage: Arc::clone(&self.storage),
            reports: Arc::clone(&self.reports),
            users: Arc::clone(&self.users),
        }
    }
}

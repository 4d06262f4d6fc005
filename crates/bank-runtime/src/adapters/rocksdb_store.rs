//! # RocksDB Document Store
//!
//! JSON documents keyed by identifier, one column family per collection.
//!
//! ## Column Families
//!
//! - `units` - Blood units (bb-02)
//! - `donors` - Donors (bb-01)
//! - `storage_units` - Cold-storage units (bb-03)
//! - `sequences` - Named counters (donor numbers)
//!
//! ## Atomicity
//!
//! Every insert, read-modify-write and counter increment runs under one
//! store-wide write lock, so concurrent writes to one document never
//! interleave. Reads take no lock.

use bb_01_donor_registry::{Donor, DonorError, DonorMutation, DonorRepository, SequenceGenerator};
use bb_02_unit_lifecycle::{BloodUnit, LifecycleError, UnitMutation, UnitRepository};
use bb_03_cold_storage::{ColdStorageError, StorageUnit, StorageUnitMutation, StorageUnitRepository};
use parking_lot::Mutex;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{DonorId, StorageUnitId, StoreError, UnitId};
use std::path::PathBuf;
use std::sync::Arc;

pub const CF_UNITS: &str = "units";
pub const CF_DONORS: &str = "donors";
pub const CF_STORAGE_UNITS: &str = "storage_units";
pub const CF_SEQUENCES: &str = "sequences";

/// All column families used by the service
pub const COLUMN_FAMILIES: &[&str] = &[CF_UNITS, CF_DONORS, CF_STORAGE_UNITS, CF_SEQUENCES];

/// RocksDB tuning
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each write
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/rocksdb"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

struct Inner {
    db: DB,
    sync_writes: bool,
    write_lock: Mutex<()>,
}

/// Document store shared by every repository port. Cloning is cheap.
#[derive(Clone)]
pub struct RocksDbDocumentStore {
    inner: Arc<Inner>,
}

fn db_error(operation: &str, e: rocksdb::Error) -> StoreError {
    StoreError::Database(format!("RocksDB {} failed: {}", operation, e))
}

impl RocksDbDocumentStore {
    /// Open or create the database with every column family.
    pub fn open(config: &RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| db_error("open", e))?;

        tracing::info!(path = %config.path.display(), "[runtime] RocksDB document store opened");

        Ok(Self {
            inner: Arc::new(Inner {
                db,
                sync_writes: config.sync_writes,
                write_lock: Mutex::new(()),
            }),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, StoreError> {
        self.inner
            .db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("missing column family '{}'", name)))
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.inner.sync_writes);
        opts
    }

    fn read<T: DeserializeOwned>(&self, cf: &str, key: &str) -> Result<Option<T>, StoreError> {
        let bytes = self
            .inner
            .db
            .get_cf(self.cf(cf)?, key.as_bytes())
            .map_err(|e| db_error("get", e))?;
        bytes
            .map(|b| decode(cf, key, &b))
            .transpose()
    }

    fn put<T: Serialize>(&self, cf: &str, key: &str, document: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| StoreError::Serialization(format!("{}/{}: {}", cf, key, e)))?;
        self.inner
            .db
            .put_cf_opt(self.cf(cf)?, key.as_bytes(), bytes, &self.write_options())
            .map_err(|e| db_error("put", e))
    }

    fn scan<T: DeserializeOwned>(&self, cf: &str) -> Result<Vec<T>, StoreError> {
        let mut documents = Vec::new();
        for entry in self.inner.db.iterator_cf(self.cf(cf)?, IteratorMode::Start) {
            let (key, value) = entry.map_err(|e| db_error("iterate", e))?;
            documents.push(decode(cf, &String::from_utf8_lossy(&key), &value)?);
        }
        Ok(documents)
    }

    fn insert_document<T: Serialize>(&self, cf: &str, key: &str, document: &T) -> Result<(), StoreError> {
        let _guard = self.inner.write_lock.lock();
        let existing = self
            .inner
            .db
            .get_pinned_cf(self.cf(cf)?, key.as_bytes())
            .map_err(|e| db_error("get", e))?;
        if existing.is_some() {
            return Err(StoreError::Conflict(format!("{}/{} already exists", cf, key)));
        }
        self.put(cf, key, document)
    }

    /// Read, mutate and write back one document. A failed mutation writes
    /// nothing.
    fn update_document<T, E>(
        &self,
        cf: &str,
        key: &str,
        mutate: &mut dyn FnMut(&mut T) -> Result<(), E>,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
    {
        let _guard = self.inner.write_lock.lock();
        let Some(mut document) = self.read::<T>(cf, key)? else {
            return Ok(None);
        };
        mutate(&mut document)?;
        self.put(cf, key, &document)?;
        Ok(Some(document))
    }
}

fn decode<T: DeserializeOwned>(cf: &str, key: &str, bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Serialization(format!("{}/{}: {}", cf, key, e)))
}

impl UnitRepository for RocksDbDocumentStore {
    fn insert(&self, unit: BloodUnit) -> Result<(), LifecycleError> {
        Ok(self.insert_document(CF_UNITS, unit.id().as_str(), &unit)?)
    }

    fn get(&self, id: &UnitId) -> Result<Option<BloodUnit>, LifecycleError> {
        Ok(self.read(CF_UNITS, id.as_str())?)
    }

    fn list(&self) -> Result<Vec<BloodUnit>, LifecycleError> {
        Ok(self.scan(CF_UNITS)?)
    }

    fn update(&self, id: &UnitId, mutate: UnitMutation<'_>) -> Result<Option<BloodUnit>, LifecycleError> {
        self.update_document(CF_UNITS, id.as_str(), mutate)
    }
}

impl DonorRepository for RocksDbDocumentStore {
    fn insert(&self, donor: Donor) -> Result<(), DonorError> {
        Ok(self.insert_document(CF_DONORS, donor.id.as_str(), &donor)?)
    }

    fn get(&self, id: &DonorId) -> Result<Option<Donor>, DonorError> {
        Ok(self.read(CF_DONORS, id.as_str())?)
    }

    fn list(&self) -> Result<Vec<Donor>, DonorError> {
        Ok(self.scan(CF_DONORS)?)
    }

    fn update(&self, id: &DonorId, mutate: DonorMutation<'_>) -> Result<Option<Donor>, DonorError> {
        self.update_document(CF_DONORS, id.as_str(), mutate)
    }
}

impl StorageUnitRepository for RocksDbDocumentStore {
    fn insert(&self, unit: StorageUnit) -> Result<(), ColdStorageError> {
        Ok(self.insert_document(CF_STORAGE_UNITS, unit.id.as_str(), &unit)?)
    }

    fn get(&self, id: &StorageUnitId) -> Result<Option<StorageUnit>, ColdStorageError> {
        Ok(self.read(CF_STORAGE_UNITS, id.as_str())?)
    }

    fn list(&self) -> Result<Vec<StorageUnit>, ColdStorageError> {
        Ok(self.scan(CF_STORAGE_UNITS)?)
    }

    fn update(
        &self,
        id: &StorageUnitId,
        mutate: StorageUnitMutation<'_>,
    ) -> Result<Option<StorageUnit>, ColdStorageError> {
        self.update_document(CF_STORAGE_UNITS, id.as_str(), mutate)
    }
}

impl SequenceGenerator for RocksDbDocumentStore {
    fn next_value(&self, sequence: &str) -> Result<u64, StoreError> {
        let _guard = self.inner.write_lock.lock();
        let next = self.read::<u64>(CF_SEQUENCES, sequence)?.unwrap_or(0) + 1;
        self.put(CF_SEQUENCES, sequence, &next)?;
        Ok(next)
    }
}

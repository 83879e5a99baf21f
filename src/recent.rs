//! Recently Viewed Products
//!
//! A short, most-recent-first list of product ids per device. Persistence sits behind
//! [`RecentProductsStore`]; storage failures are logged and never disturb the in-memory
//! list.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{catalog::Catalog, products::Product};

/// Most products remembered per device.
pub const MAX_RECENT_PRODUCTS: usize = 5;

/// Errors raised by a [`RecentProductsStore`].
#[derive(Debug, Error)]
pub enum RecentProductsError {
    /// IO error reading or writing the list
    #[error("Failed to access recent products: {0}")]
    Io(#[from] io::Error),

    /// Stored list could not be encoded or decoded
    #[error("Failed to encode recent products: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Device id cannot be used as a storage key
    #[error("Invalid device id: {0:?}")]
    InvalidDevice(String),
}

/// Per-device storage for recently viewed product ids.
pub trait RecentProductsStore {
    /// Load the stored ids for `device`, most recent first. Unknown devices have none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, device: &str) -> Result<Vec<String>, RecentProductsError>;

    /// Replace the stored ids for `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&mut self, device: &str, ids: &[String]) -> Result<(), RecentProductsError>;

    /// Forget everything stored for `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&mut self, device: &str) -> Result<(), RecentProductsError>;
}

/// In-memory store, mainly for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryRecentProductsStore {
    devices: FxHashMap<String, Vec<String>>,
}

impl MemoryRecentProductsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecentProductsStore for MemoryRecentProductsStore {
    fn load(&self, device: &str) -> Result<Vec<String>, RecentProductsError> {
        Ok(self.devices.get(device).cloned().unwrap_or_default())
    }

    fn save(&mut self, device: &str, ids: &[String]) -> Result<(), RecentProductsError> {
        self.devices.insert(device.to_string(), ids.to_vec());

        Ok(())
    }

    fn clear(&mut self, device: &str) -> Result<(), RecentProductsError> {
        self.devices.remove(device);

        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecentProductsFile {
    #[serde(default)]
    products: Vec<String>,
}

/// Stores each device's list as `<dir>/<device>.yml`.
#[derive(Debug, Clone)]
pub struct YamlFileRecentProductsStore {
    dir: PathBuf,
}

impl YamlFileRecentProductsStore {
    /// Create a store writing into `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the per-device files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, device: &str) -> Result<PathBuf, RecentProductsError> {
        let usable = !device.is_empty()
            && device != "."
            && device != ".."
            && !device.contains(['/', '\\']);

        if !usable {
            return Err(RecentProductsError::InvalidDevice(device.to_string()));
        }

        Ok(self.dir.join(format!("{device}.yml")))
    }
}

impl RecentProductsStore for YamlFileRecentProductsStore {
    fn load(&self, device: &str) -> Result<Vec<String>, RecentProductsError> {
        let path = self.path_for(device)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let file: RecentProductsFile = serde_norway::from_str(&contents)?;

        Ok(file.products)
    }

    fn save(&mut self, device: &str, ids: &[String]) -> Result<(), RecentProductsError> {
        let path = self.path_for(device)?;
        let contents = serde_norway::to_string(&RecentProductsFile {
            products: ids.to_vec(),
        })?;

        fs::create_dir_all(&self.dir)?;
        fs::write(path, contents)?;

        Ok(())
    }

    fn clear(&mut self, device: &str) -> Result<(), RecentProductsError> {
        let path = self.path_for(device)?;

        match fs::remove_file(path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// A device's recently viewed products.
#[derive(Debug)]
pub struct RecentProducts<S> {
    device: String,
    ids: Vec<String>,
    store: S,
}

impl<S: RecentProductsStore> RecentProducts<S> {
    /// Load the list for `device` from `store`.
    ///
    /// If the store cannot be read the list starts empty.
    pub fn load(device: impl Into<String>, store: S) -> Self {
        let device = device.into();

        let mut ids = store.load(&device).unwrap_or_else(|err| {
            warn!(device = %device, error = %err, "failed to load recent products");
            Vec::new()
        });

        ids.truncate(MAX_RECENT_PRODUCTS);

        Self { device, ids, store }
    }

    /// Record a product view: it moves to the front, and the oldest entry drops off once
    /// the list is full.
    pub fn add(&mut self, product: &Product<'_>) {
        self.ids.retain(|id| *id != product.id);
        self.ids.insert(0, product.id.clone());
        self.ids.truncate(MAX_RECENT_PRODUCTS);

        debug!(device = %self.device, product_id = %product.id, "recorded recent product");

        if let Err(err) = self.store.save(&self.device, &self.ids) {
            warn!(device = %self.device, error = %err, "failed to save recent products");
        }
    }

    /// Forget every recent product for this device.
    pub fn clear(&mut self) {
        self.ids.clear();

        if let Err(err) = self.store.clear(&self.device) {
            warn!(device = %self.device, error = %err, "failed to clear recent products");
        }
    }

    /// Product ids, most recent first.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Recent products still present in `catalog`, most recent first.
    pub fn resolve<'c, 'a>(&self, catalog: &'c Catalog<'a>) -> Vec<&'c Product<'a>> {
        self.ids.iter().filter_map(|id| catalog.get(id)).collect()
    }

    /// Device the list belongs to.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

//! Proxy persistence layer
//!
//! Saves and loads the deployed proxy (token storage, active logic, upgrade
//! history and recent events) as JSON. Writes go to a temporary file that is
//! renamed into place, with rotating backups of the previous state.

use crate::proxy::Proxy;
use crate::token::STORAGE_LAYOUT_VERSION;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub proxy_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".arvol_data"),
            proxy_file: "proxy.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Proxy storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the proxy file path
    fn proxy_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.proxy_file)
    }

    /// Get a backup file path
    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.proxy_file, index))
    }

    /// Save the proxy to disk
    pub fn save(&self, proxy: &Proxy) -> Result<(), StorageError> {
        let path = self.proxy_path();

        // Create backup if enabled
        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("proxy.tmp");
        write_json(proxy, &temp_path)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        log::debug!("Saved proxy {} to {:?}", proxy.address(), path);
        Ok(())
    }

    /// Load the proxy from disk
    pub fn load(&self) -> Result<Proxy, StorageError> {
        let path = self.proxy_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Proxy file not found".to_string(),
            ));
        }

        let proxy = load_from_file(&path)?;
        log::debug!("Loaded proxy {} from {:?}", proxy.address(), path);
        Ok(proxy)
    }

    /// Check if a saved proxy exists
    pub fn exists(&self) -> bool {
        self.proxy_path().exists()
    }

    /// Delete the saved proxy
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.proxy_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                let next = self.backup_path(i + 1);
                fs::rename(&current, &next)?;
            }
        }

        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<Proxy, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        load_from_file(&backup_path)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let path = self.proxy_path();

        let file_size = if path.exists() {
            fs::metadata(&path)?.len()
        } else {
            0
        };

        Ok(StorageStats {
            file_size,
            backup_count: self.list_backups().len(),
            data_dir: self.config.data_dir.clone(),
        })
    }
}

/// Storage statistics
#[derive(Debug)]
pub struct StorageStats {
    pub file_size: u64,
    pub backup_count: usize,
    pub data_dir: PathBuf,
}

/// Save a proxy to a specific file path
pub fn save_to_file(proxy: &Proxy, path: &Path) -> Result<(), StorageError> {
    write_json(proxy, path)
}

/// Write pretty JSON and make sure it reached the disk
fn write_json(proxy: &Proxy, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, proxy)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Load a proxy from a specific file path and verify its storage
pub fn load_from_file(path: &Path) -> Result<Proxy, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let proxy: Proxy = serde_json::from_reader(reader)?;
    verify(&proxy)?;
    Ok(proxy)
}

/// Reject snapshots this build cannot safely operate on
fn verify(proxy: &Proxy) -> Result<(), StorageError> {
    let storage = proxy.storage();

    if storage.layout_version() > STORAGE_LAYOUT_VERSION {
        return Err(StorageError::InvalidData(format!(
            "Storage layout {} is newer than supported layout {}",
            storage.layout_version(),
            STORAGE_LAYOUT_VERSION
        )));
    }

    if storage.check_conservation().is_none() {
        log::warn!(
            "Proxy {} fails the supply check: balances do not sum to {}",
            proxy.address(),
            storage.total_supply()
        );
        return Err(StorageError::InvalidData(
            "Balances do not sum to total supply".to_string(),
        ));
    }

    Ok(())
}

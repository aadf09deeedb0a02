use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;

/// What an [`CsvTable::update`] closure decided to do with the rows it was given.
pub enum TableChange<R> {
    /// Write the mutated rows back and return the value.
    Commit(R),
    /// Leave the file untouched and return the value.
    Discard(R),
}

/// A header-keyed CSV file holding rows of `T`.
///
/// All access goes through one async mutex, so a read-modify-write never
/// interleaves with another. Writes land in a temp file next to the table and
/// are renamed over it, so readers see either the old or the new file.
/// Nothing is cached between calls; the file is the source of truth.
pub struct CsvTable<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _row: PhantomData<fn() -> T>,
}

impl<T> CsvTable<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row in file order. A missing file is an empty table.
    pub async fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        load_rows(self.path.clone()).await
    }

    pub async fn append(&self, row: T) -> Result<(), StoreError> {
        self.update(move |rows| {
            rows.push(row);
            TableChange::Commit(())
        })
        .await
    }

    /// Runs `mutate` over a fresh read of the table while holding the lock,
    /// then persists the rows if the closure committed.
    pub async fn update<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> TableChange<R>,
    {
        let _guard = self.lock.lock().await;
        let mut rows = load_rows(self.path.clone()).await?;

        match mutate(&mut rows) {
            TableChange::Commit(value) => {
                store_rows(self.path.clone(), rows).await?;
                Ok(value)
            }
            TableChange::Discard(value) => Ok(value),
        }
    }
}

async fn load_rows<T>(path: PathBuf) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        if !path.exists() {
            debug!("Table {} does not exist yet, treating as empty", path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
        Ok(rows)
    })
    .await?
}

async fn store_rows<T>(path: PathBuf, rows: Vec<T>) -> Result<(), StoreError>
where
    T: Serialize + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut staged = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::Writer::from_writer(staged.as_file_mut());
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        staged.as_file().sync_all()?;
        staged.persist(&path)?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    })
    .await?
}

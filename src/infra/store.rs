use std::path::PathBuf;

use color_eyre::eyre::Result;
use heed::{Database, Env, EnvOpenOptions, RwTxn, types::*};

const BLOBS_DB: &str = "blobs";

/// Wrapper around LMDB database for persistent storage.
///
/// Every store writes one opaque blob per composite key. Decoding is left to
/// the caller so malformed data can be recovered from.
#[derive(Clone)]
pub struct Store {
    env: Env,
}

impl Store {
    pub fn with_path(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(100 * 1024 * 1024) // 100MB
                .max_dbs(4)
                .open(path)?
        };
        Ok(Self { env })
    }

    /// Load the raw blob stored under `key`.
    pub fn load_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        let db: Option<Database<Str, Bytes>> = self.env.open_database(&rtxn, Some(BLOBS_DB))?;

        match db {
            Some(db) => Ok(db.get(&rtxn, key)?.map(|bytes| bytes.to_vec())),
            None => Ok(None),
        }
    }

    /// Whether a blob exists under `key`.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.load_blob(key)?.is_some())
    }

    /// Overwrite the blob stored under `key`.
    pub fn save_blob(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        let db = self.blobs(&mut wtxn)?;
        db.put(&mut wtxn, key, value)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Delete the blob stored under `key`. Missing keys are fine.
    pub fn delete_blob(&self, key: &str) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        let db = self.blobs(&mut wtxn)?;
        db.delete(&mut wtxn, key)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Read-modify-write a blob inside one write transaction.
    ///
    /// `f` receives the current bytes (if any) and returns the bytes to
    /// store together with a value handed back to the caller. LMDB allows a
    /// single writer at a time, so no other update can land between the read
    /// and the write.
    pub fn update_blob<T, F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce(Option<&[u8]>) -> Result<(Vec<u8>, T)>,
    {
        let mut wtxn = self.env.write_txn()?;
        let db = self.blobs(&mut wtxn)?;
        let current = db.get(&wtxn, key)?.map(|bytes| bytes.to_vec());
        let (next, out) = f(current.as_deref())?;
        db.put(&mut wtxn, key, &next)?;
        wtxn.commit()?;
        Ok(out)
    }

    fn blobs(&self, wtxn: &mut RwTxn) -> Result<Database<Str, Bytes>> {
        Ok(self.env.create_database(wtxn, Some(BLOBS_DB))?)
    }
}

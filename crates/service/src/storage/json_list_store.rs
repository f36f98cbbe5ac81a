use std::{io, marker::PhantomData, path::{Path, PathBuf}, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// JSON file-backed list store.
///
/// The whole list is one JSON array on disk. Nothing is cached: every `load`
/// and every `update` goes back to the file, so edits made outside the process
/// are picked up on the next request.
///
/// A missing file reads as an empty list, and so does a file that is not a JSON
/// array. Array elements that do not decode as `T` are skipped one by one.
/// Writes replace the entire document.
///
/// Reads and writes from one process are serialized through an `RwLock`, so two
/// concurrent `update` calls cannot lose each other's changes. Separate
/// processes sharing the same file are not coordinated.
pub struct JsonListStore<T> {
    file_path: PathBuf,
    lock: RwLock<()>,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a store to `path`. The file is not touched until the first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self {
            file_path: path.into(),
            lock: RwLock::new(()),
            _items: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the current list. Never fails: unreadable or corrupt content is
    /// logged and reported as an empty list.
    pub async fn load(&self) -> Vec<T> {
        let _guard = self.lock.read().await;
        match self.read_unlocked().await {
            Ok(items) => items,
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "cannot read stored list; serving empty list");
                Vec::new()
            }
        }
    }

    /// Read-modify-write the whole list under the write lock and return what was stored.
    pub async fn update<F>(&self, f: F) -> Result<Vec<T>, ServiceError>
    where
        F: FnOnce(Vec<T>) -> Vec<T>,
    {
        let _guard = self.lock.write().await;
        let current = self.read_unlocked().await?;
        let next = f(current);
        let data = to_pretty_json(&next)?;
        fs::write(&self.file_path, data).await?;
        Ok(next)
    }

    /// Missing file and non-array content both yield an empty list; any other
    /// I/O failure is returned so a writer does not clobber a file it could not read.
    async fn read_unlocked(&self) -> io::Result<Vec<T>> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let document: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "stored list is not valid JSON; treating as empty");
                return Ok(Vec::new());
            }
        };
        let serde_json::Value::Array(elements) = document else {
            warn!(path = %self.file_path.display(), "stored document is not a JSON array; treating as empty");
            return Ok(Vec::new());
        };

        // a bad row costs only itself
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value(element) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(path = %self.file_path.display(), index, error = %e, "skipping malformed stored entry");
                }
            }
        }
        Ok(items)
    }
}

/// Four-space indented JSON. serde_json leaves non-ASCII text unescaped.
fn to_pretty_json<T: Serialize>(items: &[T]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    items.serialize(&mut ser)?;
    Ok(buf)
}

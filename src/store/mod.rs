//! Record store: one experiment tree per file
//!
//! **Append-mostly design**:
//! - The whole tree is loaded for each transaction and rewritten on commit
//! - Writers are exclusive, readers share: a non-blocking advisory `fs2`
//!   lock on the sidecar `<file>.lock`
//! - A commit writes `<file>.tmp`, syncs it and renames it over the file, so
//!   the previous document survives a failed or interrupted write
//! - A write body that returns `Err` leaves the file untouched
//! - File handles (and the lock) are released on every exit path
//!
//! ## Example
//!
//! ```rust
//! use flylab_data::experiment::ExperimentRecord;
//! use flylab_data::store::{layout, RecordStore};
//!
//! # fn main() -> flylab_data::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! let store = RecordStore::new(dir.path().join("2024-05-01.json"));
//! store.initialize(&ExperimentRecord::new("/data", "mhturner", "Bruker"))?;
//!
//! store.with_write(|tree| {
//!     tree.create_child(&layout::flies_path(), "fly1")?;
//!     Ok(())
//! })?;
//!
//! let flies = store.with_read(|tree| tree.list_children(&layout::flies_path()))?;
//! assert_eq!(flies, vec!["fly1"]);
//! # Ok(())
//! # }
//! ```

pub mod layout;
pub mod tree;

pub use tree::{Attrs, Node, Tree};

use crate::experiment::ExperimentRecord;
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Format tag written at the top of every experiment file.
pub const FORMAT_TAG: &str = "flylab-tree";
/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;
/// Extension of experiment files created from a configuration.
pub const DATA_FILE_EXTENSION: &str = "json";

const LOCK_SUFFIX: &str = ".lock";
const TMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    format: String,
    version: u32,
    #[serde(flatten)]
    tree: Tree,
}

impl Document {
    fn check(&self) -> Result<()> {
        if self.format != FORMAT_TAG {
            return Err(Error::UnsupportedFormat(format!(
                "format tag {:?}, expected {FORMAT_TAG:?}",
                self.format
            )));
        }
        if self.version != FORMAT_VERSION {
            return Err(Error::UnsupportedFormat(format!(
                "version {}, expected {FORMAT_VERSION}",
                self.version
            )));
        }
        Ok(())
    }
}

/// Handle on the experiment file at a fixed path.
///
/// Cheap to construct; no file is opened until a transaction runs.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store for the experiment file at `path` (which need not exist yet).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the experiment file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the experiment file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create a new experiment file with the top-level containers and
    /// experiment attributes. Never overwrites.
    ///
    /// # Errors
    /// - `AlreadyExists` if a file is already present at the path
    /// - `Io` if another transaction holds the file, or on write failure
    pub fn initialize(&self, experiment: &ExperimentRecord) -> Result<()> {
        let _lock = self.lock(true)?;
        if self.path.exists() {
            return Err(Error::AlreadyExists {
                what: "experiment file",
                name: self.path.display().to_string(),
            });
        }

        let mut tree = Tree::new();
        experiment.write_to(&mut tree)?;
        tree.create_child("/", layout::FLIES)?;
        tree.create_child("/", layout::NOTES)?;

        self.commit(tree)?;
        tracing::info!(
            target: "flylab::store",
            path = %self.path.display(),
            "experiment file initialized"
        );
        Ok(())
    }

    /// Run `body` against a read-only view of the tree.
    ///
    /// # Errors
    /// - `NotFound` if the file does not exist
    /// - `Io` if a writer holds the file, or on read failure
    /// - whatever `body` returns
    pub fn with_read<T>(&self, body: impl FnOnce(&Tree) -> Result<T>) -> Result<T> {
        self.require_file()?;
        let _lock = self.lock(false)?;
        let doc = read_document(&self.open()?)?;
        tracing::debug!(target: "flylab::store", path = %self.path.display(), "read transaction");
        body(&doc.tree)
    }

    /// Run `body` against a mutable copy of the tree and commit it if the
    /// body succeeds.
    ///
    /// # Errors
    /// - `NotFound` if the file does not exist
    /// - `Io` if another reader or writer holds the file, or on write failure
    /// - whatever `body` returns (nothing is written in that case)
    pub fn with_write<T>(&self, body: impl FnOnce(&mut Tree) -> Result<T>) -> Result<T> {
        self.require_file()?;
        let _lock = self.lock(true)?;
        let mut tree = read_document(&self.open()?)?.tree;

        let out = body(&mut tree)?;

        self.commit(tree)?;
        tracing::debug!(target: "flylab::store", path = %self.path.display(), "write transaction committed");
        Ok(out)
    }

    fn require_file(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(self.not_found())
        }
    }

    fn not_found(&self) -> Error {
        Error::NotFound(format!("experiment file {}", self.path.display()))
    }

    fn open(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => self.not_found(),
            _ => Error::Io(e),
        })
    }

    /// Take the sidecar lock; released when the returned handle drops.
    fn lock(&self, exclusive: bool) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(sidecar(&self.path, LOCK_SUFFIX))?;
        // Qualified: newer std has inherent `File` lock methods
        if exclusive {
            FileExt::try_lock_exclusive(&file)?;
        } else {
            FileExt::try_lock_shared(&file)?;
        }
        Ok(file)
    }

    /// Replace the experiment file with `tree`: write a synced temporary
    /// sibling, then rename it over the original.
    fn commit(&self, tree: Tree) -> Result<()> {
        let doc = Document {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            tree,
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;
        let tmp = sidecar(&self.path, TMP_SUFFIX);
        if let Err(e) = write_synced(&tmp, &bytes).and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// `<path><suffix>`, next to the experiment file.
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn read_document(file: &File) -> Result<Document> {
    let doc: Document = serde_json::from_reader(BufReader::new(file))?;
    doc.check()?;
    Ok(doc)
}

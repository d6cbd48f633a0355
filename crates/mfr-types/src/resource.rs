//! Opaque byte producers for managed file contents.
//!
//! The reconciler never cares where bytes come from. A [`Resource`] can be
//! opened as a stream (IaC emission streams into a generated asset) or
//! materialized in full (direct writes never issue partial writes).

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

/// A content producer that can be opened for reading.
pub trait Resource: Send + Sync + fmt::Debug {
    /// Open a fresh reader over the full content.
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Read the full content into memory.
    ///
    /// Default implementation drains [`Resource::open`]. Implementations that
    /// already hold their bytes may override to skip the copy through a reader.
    fn materialize(&self) -> io::Result<Vec<u8>> {
        let mut reader = self.open()?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// Literal bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct BytesResource {
    data: Vec<u8>,
}

impl BytesResource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Resource for BytesResource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.data.clone())))
    }

    fn materialize(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

impl fmt::Debug for BytesResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesResource")
            .field("len", &self.data.len())
            .field("fingerprint", &content_fingerprint(&self.data))
            .finish()
    }
}

/// A UTF-8 string, typically inline manifest content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringResource(pub String);

impl Resource for StringResource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.0.clone().into_bytes())))
    }
}

/// Content read lazily from a local file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path).map_err(|e| {
            io::Error::new(e.kind(), format!("{}: {e}", self.path.display()))
        })?;
        Ok(Box::new(file))
    }
}

/// Short BLAKE3 fingerprint of some content, for logs and plan output.
pub fn content_fingerprint(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hex::encode(&hash.as_bytes()[..8])
}

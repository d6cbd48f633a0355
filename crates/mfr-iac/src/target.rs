use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IacError, IacResult};
use crate::writer::TerraformWriter;

/// Name of the generated declarations file.
pub const MAIN_FILE: &str = "kubernetes.tf.json";

/// An output directory plus the writer accumulating declarations for it.
#[derive(Debug)]
pub struct TerraformTarget {
    out_dir: PathBuf,
    writer: TerraformWriter,
}

impl TerraformTarget {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            writer: TerraformWriter::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn writer(&self) -> &TerraformWriter {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut TerraformWriter {
        &mut self.writer
    }

    /// Write the declarations file and all assets. Returns every path written.
    pub fn finish(self) -> IacResult<Vec<PathBuf>> {
        let output = self.writer.finish()?;
        let mut written = Vec::with_capacity(output.files.len() + 1);

        for (rel, data) in &output.files {
            let path = self.out_dir.join(rel);
            write_file(&path, data)?;
            written.push(path);
        }

        let main = self.out_dir.join(MAIN_FILE);
        write_file(&main, &output.main)?;
        written.push(main);

        tracing::info!(
            out_dir = %self.out_dir.display(),
            files = written.len(),
            "wrote terraform output"
        );
        Ok(written)
    }
}

fn write_file(path: &Path, data: &[u8]) -> IacResult<()> {
    let io_err = |source| IacError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, data).map_err(io_err)
}

//! Infrastructure-as-code output for the managed file reconciler.
//!
//! Instead of mutating storage directly, a renderer may append resource
//! declarations to a [`TerraformWriter`]. The writer accumulates resources
//! and their file assets in memory; [`TerraformTarget::finish`] lays them out
//! on disk for a separate provisioning run to apply.
//!
//! # Output layout
//!
//! ```text
//! <out_dir>/kubernetes.tf.json     resource declarations
//! <out_dir>/data/<type>_<name>_<field>   file assets referenced via ${file(...)}
//! ```

pub mod error;
pub mod target;
pub mod writer;

pub use error::{IacError, IacResult};
pub use target::TerraformTarget;
pub use writer::{sanitize_name, Literal, TerraformOutput, TerraformWriter};

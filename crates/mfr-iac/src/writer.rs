use std::collections::BTreeMap;
use std::io::Read;

use serde::Serialize;
use serde_json::Value;

use crate::error::{IacError, IacResult};

/// Directory (relative to the output root) that holds file assets.
pub const DATA_DIR: &str = "data";

/// Minimum Terraform version the generated JSON targets.
const REQUIRED_VERSION: &str = ">= 0.15.0";

/// A raw Terraform expression, emitted verbatim as a JSON string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Literal(String);

impl Literal {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// Expression that loads a generated asset relative to the module.
    pub fn file_ref(asset_path: &str) -> Self {
        Self(format!("${{file(\"${{path.module}}/{asset_path}\")}}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Make a name safe for use as a Terraform resource name or asset file name.
///
/// The mapping is lossy: `a.b`, `a/b` and `a:b` all become `a-b`.
/// [`TerraformWriter`] rejects such collisions between distinct names.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '/' | ':' | ' ' => '-',
            c => c,
        })
        .collect()
}

/// Serialized writer output, ready to be laid out on disk.
#[derive(Clone, Debug)]
pub struct TerraformOutput {
    /// Pretty-printed JSON for the main declarations file.
    pub main: Vec<u8>,
    /// Asset files keyed by path relative to the output root.
    pub files: BTreeMap<String, Vec<u8>>,
}

/// Accumulates Terraform resource declarations and their file assets.
///
/// Declarations are append-only: re-declaring the same resource is an error,
/// not an overwrite.
#[derive(Debug, Default)]
pub struct TerraformWriter {
    resources: BTreeMap<String, BTreeMap<String, Value>>,
    files: BTreeMap<String, Vec<u8>>,
    /// Original name behind each `<type>.<sanitized>` in use.
    names: BTreeMap<String, String>,
}

impl TerraformWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` as a file asset and return the expression that loads it.
    pub fn add_file_bytes(
        &mut self,
        resource_type: &str,
        resource_name: &str,
        field: &str,
        data: &[u8],
    ) -> IacResult<Literal> {
        let asset = asset_path(resource_type, resource_name, field)?;
        self.claim_name(resource_type, resource_name)?;
        if self.files.contains_key(&asset) {
            return Err(IacError::DuplicateResource {
                resource_type: resource_type.to_string(),
                name: format!("{resource_name} ({field})"),
            });
        }
        self.files.insert(asset.clone(), data.to_vec());
        Ok(Literal::file_ref(&asset))
    }

    /// Drain `reader` into a file asset and return the expression that loads it.
    pub fn add_file_reader(
        &mut self,
        resource_type: &str,
        resource_name: &str,
        field: &str,
        reader: &mut dyn Read,
    ) -> IacResult<Literal> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|source| IacError::AssetRead {
                asset: format!("{resource_type}.{resource_name}.{field}"),
                source,
            })?;
        self.add_file_bytes(resource_type, resource_name, field, &data)
    }

    /// Declare a resource of `resource_type` named `resource_name`.
    pub fn add_resource<T: Serialize>(
        &mut self,
        resource_type: &str,
        resource_name: &str,
        body: &T,
    ) -> IacResult<()> {
        let name = sanitize_name(resource_name);
        if name.is_empty() {
            return Err(IacError::InvalidName(resource_name.to_string()));
        }
        self.claim_name(resource_type, resource_name)?;
        let body = serde_json::to_value(body)?;
        let by_type = self.resources.entry(resource_type.to_string()).or_default();
        if by_type.contains_key(&name) {
            return Err(IacError::DuplicateResource {
                resource_type: resource_type.to_string(),
                name,
            });
        }
        tracing::debug!(resource_type, name = %name, "declared terraform resource");
        by_type.insert(name, body);
        Ok(())
    }

    fn claim_name(&mut self, resource_type: &str, resource_name: &str) -> IacResult<()> {
        let sanitized = sanitize_name(resource_name);
        let key = format!("{resource_type}.{sanitized}");
        match self.names.get(&key) {
            Some(existing) if existing != resource_name => Err(IacError::NameCollision {
                resource_type: resource_type.to_string(),
                existing: existing.clone(),
                name: resource_name.to_string(),
                sanitized,
            }),
            Some(_) => Ok(()),
            None => {
                self.names.insert(key, resource_name.to_string());
                Ok(())
            }
        }
    }

    /// Look up a declared resource body.
    pub fn resource(&self, resource_type: &str, resource_name: &str) -> Option<&Value> {
        self.resources
            .get(resource_type)?
            .get(&sanitize_name(resource_name))
    }

    /// Look up an asset by its path relative to the output root.
    pub fn file(&self, asset_path: &str) -> Option<&[u8]> {
        self.files.get(asset_path).map(Vec::as_slice)
    }

    /// Number of declared resources across all types.
    pub fn len(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    /// Returns true if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize all declarations (no disk I/O).
    pub fn finish(self) -> IacResult<TerraformOutput> {
        let doc = serde_json::json!({
            "resource": self.resources,
            "terraform": { "required_version": REQUIRED_VERSION },
        });
        let mut main = serde_json::to_vec_pretty(&doc)?;
        main.push(b'\n');
        Ok(TerraformOutput {
            main,
            files: self.files,
        })
    }
}

fn asset_path(resource_type: &str, resource_name: &str, field: &str) -> IacResult<String> {
    let name = sanitize_name(resource_name);
    if name.is_empty() {
        return Err(IacError::InvalidName(resource_name.to_string()));
    }
    Ok(format!("{DATA_DIR}/{resource_type}_{name}_{field}"))
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use mfr_acl::ClusterSpec;
use mfr_task::{CloudupContext, FeatureFlags};
use mfr_types::{BytesResource, FileResource, Lifecycle, ManagedFileSpec, PublicAcl, Resource};
use mfr_vfs::VfsContext;
use serde::Deserialize;

/// The `mfr.toml` file: one cluster, its buckets, and the files to manage.
///
/// Relative paths in `[[bucket]]` and `contents_file` are resolved against
/// the directory holding the manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub cluster: ClusterSpec,
    pub features: FeatureFlags,
    #[serde(rename = "bucket")]
    pub buckets: Vec<BucketEntry>,
    #[serde(rename = "file")]
    pub files: Vec<FileEntry>,
    #[serde(skip)]
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileEntry {
    pub name: String,
    pub base: Option<String>,
    pub location: String,
    /// Inline contents.
    pub contents: Option<String>,
    /// Contents read from a file at reconcile time.
    pub contents_file: Option<PathBuf>,
    pub public_acl: Option<bool>,
    pub lifecycle: Lifecycle,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, root).with_context(|| format!("parsing manifest {}", path.display()))
    }

    pub fn parse(text: &str, root: &Path) -> anyhow::Result<Self> {
        let mut manifest: Manifest = toml::from_str(text)?;
        manifest.root = root.to_path_buf();
        Ok(manifest)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Register every bucket and build the reconciliation context.
    pub fn context(&self) -> anyhow::Result<CloudupContext> {
        let vfs = VfsContext::new();
        for bucket in &self.buckets {
            vfs.register_bucket(&bucket.name, self.resolve(&bucket.path))
                .with_context(|| format!("registering bucket {:?}", bucket.name))?;
        }
        let ctx = CloudupContext::new(Arc::new(vfs), self.cluster.clone())?
            .with_features(self.features);
        tracing::debug!(?ctx, files = self.files.len(), "loaded manifest");
        Ok(ctx)
    }

    /// Desired state for every `[[file]]` entry, in manifest order.
    pub fn specs(&self) -> anyhow::Result<Vec<ManagedFileSpec>> {
        self.files.iter().map(|entry| self.spec(entry)).collect()
    }

    fn spec(&self, entry: &FileEntry) -> anyhow::Result<ManagedFileSpec> {
        let mut spec = ManagedFileSpec {
            name: Some(entry.name.clone()),
            lifecycle: entry.lifecycle,
            base: entry.base.clone(),
            location: Some(entry.location.clone()),
            contents: None,
            public_acl: PublicAcl::from(entry.public_acl),
        };
        spec.contents = match (&entry.contents, &entry.contents_file) {
            (Some(_), Some(_)) => bail!(
                "file {:?} sets both contents and contents_file",
                entry.name
            ),
            (Some(text), None) => {
                Some(Arc::new(BytesResource::new(text.as_bytes())) as Arc<dyn Resource>)
            }
            (None, Some(path)) => Some(Arc::new(FileResource::new(self.resolve(path))) as _),
            (None, None) => None,
        };
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfr_types::CannedAcl;

    const MANIFEST: &str = r#"
[cluster]
name = "dev"
config_base = "s3://state/dev"
default_object_acl = "bucket-owner-full-control"

[features]
terraform_managed_files = true

[[bucket]]
name = "state"
path = "buckets/state"

[[file]]
name = "foo"
location = "config/foo.yaml"
contents = "a: 1"
public_acl = true

[[file]]
name = "bar"
base = "memfs://scratch"
location = "bar"
contents_file = "bar.txt"
lifecycle = "ExistsAndValidates"
"#;

    #[test]
    fn parses_every_section() {
        let m = Manifest::parse(MANIFEST, Path::new("/srv")).unwrap();
        assert_eq!(m.cluster.config_base, "s3://state/dev");
        assert_eq!(
            m.cluster.default_object_acl,
            Some(CannedAcl::BucketOwnerFullControl)
        );
        assert!(m.features.terraform_managed_files);
        assert_eq!(m.buckets.len(), 1);
        assert_eq!(m.files.len(), 2);
        assert_eq!(m.files[1].lifecycle, Lifecycle::ExistsAndValidates);
    }

    #[test]
    fn builds_specs() {
        let m = Manifest::parse(MANIFEST, Path::new("/srv")).unwrap();
        let specs = m.specs().unwrap();
        assert_eq!(specs[0].name_str(), "foo");
        assert_eq!(specs[0].public_acl, PublicAcl::Public);
        assert_eq!(specs[1].public_acl, PublicAcl::Unset);
        assert_eq!(specs[1].base_str(), "memfs://scratch");
        assert_eq!(specs[1].lifecycle, Lifecycle::ExistsAndValidates);
    }

    #[test]
    fn builds_context_with_relative_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let m = Manifest::parse(MANIFEST, dir.path()).unwrap();
        let ctx = m.context().unwrap();
        assert_eq!(ctx.cluster_config_base().path(), "s3://state/dev");
        assert!(ctx.features().terraform_managed_files);
        assert!(dir.path().join("buckets/state/objects").is_dir());
    }

    #[test]
    fn rejects_both_contents_sources() {
        let text = r#"
[cluster]
config_base = "memfs://c"

[[file]]
name = "x"
location = "x"
contents = "a"
contents_file = "a.txt"
"#;
        let m = Manifest::parse(text, Path::new(".")).unwrap();
        let err = m.specs().unwrap_err();
        assert!(err.to_string().contains("both contents and contents_file"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let text = "bogus = 1\n[cluster]\nconfig_base = \"memfs://c\"\n";
        assert!(Manifest::parse(text, Path::new(".")).is_err());
    }

    #[test]
    fn public_default_object_acl_fails_context() {
        let text = r#"
[cluster]
config_base = "memfs://c"
default_object_acl = "public-read"
"#;
        let m = Manifest::parse(text, Path::new(".")).unwrap();
        let err = m.context().unwrap_err();
        assert!(err.to_string().contains("public-read"));
    }

    #[test]
    fn empty_manifest_needs_config_base() {
        let m = Manifest::parse("", Path::new(".")).unwrap();
        assert!(m.files.is_empty());
        assert!(m.context().is_err());
    }
}

use std::io::Read;

use mfr_iac::{Literal, TerraformWriter};
use mfr_types::Acl;
use serde::Serialize;

use crate::error::{VfsError, VfsResult};

pub(crate) const OBJECT_RESOURCE_TYPE: &str = "aws_s3_object";

/// Provider alias used for state-store objects.
const FILES_PROVIDER: &str = "aws.files";

#[derive(Serialize)]
struct TerraformObject<'a> {
    bucket: &'a str,
    key: &'a str,
    content: Literal,
    #[serde(skip_serializing_if = "Option::is_none")]
    acl: Option<&'static str>,
    server_side_encryption: &'static str,
    provider: &'static str,
}

/// Declare an object resource whose content is streamed into a file asset.
pub(crate) fn render_object(
    writer: &mut TerraformWriter,
    path: &str,
    bucket: &str,
    key: &str,
    name: &str,
    data: &mut dyn Read,
    acl: Option<&Acl>,
) -> VfsResult<()> {
    let acl = match acl {
        None => None,
        Some(acl) => match acl.canned() {
            Some(canned) => Some(canned.as_str()),
            None => {
                return Err(VfsError::UnsupportedAcl {
                    path: path.to_string(),
                    acl: acl.to_string(),
                })
            }
        },
    };

    let content = writer.add_file_reader(OBJECT_RESOURCE_TYPE, name, "content", data)?;
    writer.add_resource(
        OBJECT_RESOURCE_TYPE,
        name,
        &TerraformObject {
            bucket,
            key,
            content,
            acl,
            server_side_encryption: "AES256",
            provider: FILES_PROVIDER,
        },
    )?;
    tracing::info!(path, name, "declared object in terraform output");
    Ok(())
}

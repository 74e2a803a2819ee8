use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::TempPath;

use crate::error::{Error, Result};

pub const S3_SCHEME: &str = "s3://";

// Used for the downloaded copy when the key has no usable extension
const DEFAULT_EXTENSION: &str = "xlsx";

/// A workbook available on local disk, either the caller's own file or a
/// downloaded copy that is removed when this value is closed or dropped.
#[derive(Debug)]
pub enum LocalResource {
    Local(PathBuf),
    Temporary(TempPath),
}

impl LocalResource {
    pub fn path(&self) -> &Path {
        match self {
            LocalResource::Local(path) => path,
            LocalResource::Temporary(temp) => temp,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, LocalResource::Temporary(_))
    }

    /// Deletes a temporary copy. Local files are left untouched.
    pub fn close(self) {
        if let LocalResource::Temporary(temp) = self {
            let path = temp.to_path_buf();
            match temp.close() {
                Ok(()) => debug!("Removed temporary file {}", path.display()),
                Err(err) => warn!("Failed to remove temporary file {}: {err}", path.display()),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.key.rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext)
    }
}

pub fn is_remote_uri(path: &str) -> bool {
    path.starts_with(S3_SCHEME)
}

pub fn parse_s3_uri(uri: &str) -> Result<S3Location> {
    let rest = uri
        .strip_prefix(S3_SCHEME)
        .ok_or_else(|| Error::InvalidLocator(uri.to_string()))?;
    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    let key = key.trim_start_matches('/');

    if bucket.is_empty() || key.is_empty() {
        return Err(Error::InvalidLocator(uri.to_string()));
    }

    Ok(S3Location {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

/// Local paths are returned as-is; S3 URIs are downloaded into a new
/// temporary file (in `temp_dir` when given).
pub fn resolve_local_path(path: &str, temp_dir: Option<&Path>) -> Result<LocalResource> {
    if !is_remote_uri(path) {
        return Ok(LocalResource::Local(PathBuf::from(path)));
    }

    let location = parse_s3_uri(path)?;
    let temp = download(&location, temp_dir)?;
    Ok(LocalResource::Temporary(temp))
}

#[cfg_attr(not(feature = "s3"), allow(dead_code))]
fn create_temp_file(
    location: &S3Location,
    temp_dir: Option<&Path>,
) -> Result<tempfile::NamedTempFile> {
    let suffix = format!(".{}", location.extension().unwrap_or(DEFAULT_EXTENSION));
    let mut builder = tempfile::Builder::new();
    builder.prefix("sheetcell-").suffix(&suffix);

    let file = match temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    Ok(file)
}

#[cfg(not(feature = "s3"))]
fn download(_location: &S3Location, _temp_dir: Option<&Path>) -> Result<TempPath> {
    Err(Error::DependencyMissing("S3"))
}

#[cfg(feature = "s3")]
fn download(location: &S3Location, temp_dir: Option<&Path>) -> Result<TempPath> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Error::ResourceUnavailable(format!("unable to start S3 client: {err}")))?;

    debug!("Downloading s3://{}/{}", location.bucket, location.key);
    let bytes = runtime.block_on(s3::fetch_object(location))?;
    save_download(location, temp_dir, &bytes)
}

// Local I/O failures while storing the object count as an unavailable resource
#[cfg_attr(not(feature = "s3"), allow(dead_code))]
fn save_download(
    location: &S3Location,
    temp_dir: Option<&Path>,
    bytes: &[u8],
) -> Result<TempPath> {
    use std::io::Write;

    let unavailable = |err: std::io::Error| {
        Error::ResourceUnavailable(format!(
            "unable to store s3://{}/{} locally: {err}",
            location.bucket, location.key
        ))
    };

    let mut file = create_temp_file(location, temp_dir).map_err(|err| match err {
        Error::Io(io) => unavailable(io),
        other => other,
    })?;
    file.write_all(bytes).map_err(unavailable)?;
    file.flush().map_err(unavailable)?;

    let temp = file.into_temp_path();
    debug!("Saved {} bytes to {}", bytes.len(), temp.display());
    Ok(temp)
}

#[cfg(feature = "s3")]
mod s3 {
    use aws_credential_types::provider::ProvideCredentials;
    use aws_config::BehaviorVersion;
    use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};

    use super::S3Location;
    use crate::error::{Error, Result};

    const CREDENTIAL_HELP: &str = "configure them with `aws configure`, the AWS_ACCESS_KEY_ID and \
         AWS_SECRET_ACCESS_KEY environment variables, or an IAM role";

    pub(super) async fn fetch_object(location: &S3Location) -> Result<Vec<u8>> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let provider = config
            .credentials_provider()
            .ok_or_else(|| Error::CredentialsMissing(CREDENTIAL_HELP.to_string()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|err| Error::CredentialsMissing(format!("{err}; {CREDENTIAL_HELP}")))?;

        let client = aws_sdk_s3::Client::new(&config);
        let output = client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|err| {
                classify(location, err.code(), &DisplayErrorContext(&err).to_string())
            })?;

        let body = output.body.collect().await.map_err(|err| {
            Error::ResourceUnavailable(format!(
                "error reading s3://{}/{}: {err}",
                location.bucket, location.key
            ))
        })?;

        Ok(body.into_bytes().to_vec())
    }

    fn classify(location: &S3Location, code: Option<&str>, message: &str) -> Error {
        match code {
            Some("NoSuchKey") | Some("NotFound") => Error::ResourceUnavailable(format!(
                "file not found in S3: s3://{}/{}",
                location.bucket, location.key
            )),
            Some("NoSuchBucket") => {
                Error::ResourceUnavailable(format!("S3 bucket not found: {}", location.bucket))
            }
            Some("InvalidAccessKeyId")
            | Some("SignatureDoesNotMatch")
            | Some("ExpiredToken")
            | Some("InvalidToken") => Error::CredentialsMissing(format!("{message}; {CREDENTIAL_HELP}")),
            _ => Error::ResourceUnavailable(format!("error downloading from S3: {message}")),
        }
    }

}

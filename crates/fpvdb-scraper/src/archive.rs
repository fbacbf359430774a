//! Image Archiver: copies a remote product image into the local public
//! images directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;

use crate::error::ArchiveError;

const DEFAULT_EXTENSION: &str = ".jpg";

/// Result of a successful [`ImageArchiver::archive`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedImage {
    /// Location on disk.
    pub path: PathBuf,
    /// Public path to store as the product's `imageUrl`.
    pub public_url: String,
    /// `false` when an existing archive was reused.
    pub downloaded: bool,
}

/// Downloads product images to `{images_dir}/{product_id}{ext}`.
///
/// Files that already exist and are larger than `min_bytes` are reused, so
/// archiving the same product twice performs at most one download. Downloads
/// that come back smaller than `min_bytes` are deleted and reported as
/// [`ArchiveError::Undersized`]; retailers serve tiny placeholders and error
/// pages with a 200.
pub struct ImageArchiver {
    client: Client,
    images_dir: PathBuf,
    url_prefix: String,
    min_bytes: u64,
}

impl ImageArchiver {
    /// # Errors
    ///
    /// Returns [`ArchiveError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        images_dir: impl Into<PathBuf>,
        url_prefix: &str,
        min_bytes: u64,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ArchiveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            images_dir: images_dir.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_owned(),
            min_bytes,
        })
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// File name for `product_id`'s image, keeping the remote extension.
    #[must_use]
    pub fn file_name(product_id: &str, image_url: &str) -> String {
        format!("{product_id}{}", image_extension(image_url))
    }

    /// Public URL for a file in the images directory.
    #[must_use]
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.url_prefix)
    }

    /// Archives `image_url` for `product_id`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::UnexpectedStatus`] for any status other than 200.
    /// - [`ArchiveError::Http`] on network failure, including mid-body.
    /// - [`ArchiveError::Io`] if the directory or file cannot be written.
    /// - [`ArchiveError::Undersized`] if the result is below `min_bytes`.
    ///
    /// No partial or undersized file is left behind on error.
    pub async fn archive(
        &self,
        image_url: &str,
        product_id: &str,
    ) -> Result<ArchivedImage, ArchiveError> {
        let file_name = Self::file_name(product_id, image_url);
        let path = self.images_dir.join(&file_name);
        let public_url = self.public_url(&file_name);

        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.is_file() && meta.len() > self.min_bytes {
                tracing::debug!(path = %path.display(), "image already archived");
                return Ok(ArchivedImage {
                    path,
                    public_url,
                    downloaded: false,
                });
            }
        }

        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| io_error(&self.images_dir, e))?;

        self.download(image_url, &path).await?;

        let bytes = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_error(&path, e))?
            .len();
        if bytes < self.min_bytes {
            remove_quietly(&path).await;
            return Err(ArchiveError::Undersized {
                path: path.display().to_string(),
                bytes,
                min_bytes: self.min_bytes,
            });
        }

        tracing::info!(path = %path.display(), bytes, "image archived");
        Ok(ArchivedImage {
            path,
            public_url,
            downloaded: true,
        })
    }

    async fn download(&self, url: &str, path: &Path) -> Result<(), ArchiveError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ArchiveError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| io_error(path, e))?;

        let result: Result<(), ArchiveError> = async {
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk)
                    .await
                    .map_err(|e| io_error(path, e))?;
            }
            file.flush().await.map_err(|e| io_error(path, e))
        }
        .await;
        drop(file);

        if result.is_err() {
            remove_quietly(path).await;
        }
        result
    }
}

/// Extension of the URL path including the dot, or `.jpg`.
#[must_use]
pub fn image_extension(image_url: &str) -> String {
    let path = reqwest::Url::parse(image_url).map_or_else(
        |_| image_url.split(['?', '#']).next().unwrap_or_default().to_owned(),
        |u| u.path().to_owned(),
    );
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map_or_else(|| DEFAULT_EXTENSION.to_owned(), |ext| format!(".{ext}"))
}

fn io_error(path: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: path.display().to_string(),
        source,
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "could not remove image file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_from_url_path() {
        assert_eq!(image_extension("https://cdn.getfpv.com/a/b/nazgul.png"), ".png");
        assert_eq!(image_extension("https://cdn.getfpv.com/x.webp?w=800&h=600"), ".webp");
    }

    #[test]
    fn extension_defaults_to_jpg() {
        assert_eq!(image_extension("https://cdn.getfpv.com/image"), ".jpg");
        assert_eq!(image_extension("https://cdn.getfpv.com/?file=a.png"), ".jpg");
    }

    #[test]
    fn file_name_and_public_url() {
        let archiver = ImageArchiver::new("/tmp/parts", "/images/parts/", 2000, 5, "fpvdb-test/0.1")
            .unwrap();
        let name = ImageArchiver::file_name("meteor75-1a2b3c", "https://cdn/x.png");
        assert_eq!(name, "meteor75-1a2b3c.png");
        assert_eq!(archiver.public_url(&name), "/images/parts/meteor75-1a2b3c.png");
    }
}

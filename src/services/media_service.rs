use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Local asset store: decodes inline base64 image payloads and writes them
/// under the media root, returning the public path for the stored file.
#[derive(Debug, Clone)]
pub struct MediaService {
    root: PathBuf,
}

impl MediaService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MediaService { root: root.into() }
    }

    pub async fn store_image(&self, payload: &str) -> ServiceResult<String> {
        let (bytes, ext) = decode_image_payload(payload)?;

        let dir = self.root.join("recipes");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Validation(format!("failed to prepare media dir: {e}")))?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let path = dir.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Validation(format!("failed to store image: {e}")))?;

        Ok(format!("/media/recipes/{filename}"))
    }

    /// Best-effort removal of a stored file by its public reference, so
    /// replaced and deleted recipes do not leave orphans under the media
    /// root. A missing file is not an error.
    pub async fn remove_image(&self, reference: &str) {
        let Some(rel) = reference.strip_prefix("/media/") else {
            return;
        };
        let path = self.root.join(rel);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to remove stored image {}: {}", reference, e);
            }
        }
    }
}

/// Accepts "data:image/<ext>;base64,<payload>" or a bare base64 string
/// (treated as png). Empty input is a missing field, not a decode error.
pub fn decode_image_payload(payload: &str) -> ServiceResult<(Vec<u8>, String)> {
    if payload.trim().is_empty() {
        return Err(ServiceError::MissingField("image"));
    }

    let (encoded, ext) = match payload.strip_prefix("data:image/") {
        Some(rest) => {
            let (format, data) = rest
                .split_once(";base64,")
                .ok_or_else(|| ServiceError::Validation("malformed image data URI".to_string()))?;
            (data, format.to_string())
        }
        None => (payload, "png".to_string()),
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ServiceError::Validation(format!("image payload is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(ServiceError::MissingField("image"));
    }

    Ok((bytes, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_uri_with_extension() {
        let payload = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"fakejpg"));
        let (bytes, ext) = decode_image_payload(&payload).unwrap();
        assert_eq!(bytes, b"fakejpg");
        assert_eq!(ext, "jpeg");
    }

    #[test]
    fn decodes_bare_base64_as_png() {
        let payload = STANDARD.encode(b"rawbytes");
        let (bytes, ext) = decode_image_payload(&payload).unwrap();
        assert_eq!(bytes, b"rawbytes");
        assert_eq!(ext, "png");
    }

    #[test]
    fn empty_payload_is_missing_field() {
        let err = decode_image_payload("").unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("image")));
    }

    #[test]
    fn garbage_payload_is_rejected() {
        let err = decode_image_payload("data:image/png;base64,!!not-base64!!").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn stored_file_is_removed_by_reference() {
        let root = std::env::temp_dir().join(format!("media-test-{}", Uuid::new_v4()));
        let media = MediaService::new(&root);

        let reference = media.store_image(&STANDARD.encode(b"imgbytes")).await.unwrap();
        let path = root.join(reference.strip_prefix("/media/").unwrap());
        assert!(path.exists());

        media.remove_image(&reference).await;
        assert!(!path.exists());

        // References to files that are already gone are ignored
        media.remove_image(&reference).await;
        media.remove_image("not-a-media-reference").await;
    }
}

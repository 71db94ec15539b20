use base64ct::{Base64, Encoding};
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

/// Upper bound for a single meal photo (5 MiB, inclusive).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// An image as uploaded by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub content_type: String,
    pub bytes: Bytes,
}

impl Photo {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encodes the photo the way it is persisted: `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            Base64::encode_string(&self.bytes)
        )
    }

    pub fn from_data_uri(uri: &str) -> Result<Self, String> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| "missing data: prefix".to_string())?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| "not a base64 data uri".to_string())?;
        if !is_image_mime(mime) {
            return Err(format!("unsupported media type {mime}"));
        }
        let bytes = Base64::decode_vec(payload.trim()).map_err(|e| e.to_string())?;
        Ok(Self::new(mime, bytes))
    }
}

pub(crate) fn is_image_mime(ct: &str) -> bool {
    lazy_static! {
        static ref IMAGE_MIME_RE: Regex = Regex::new(r"^image/[a-z0-9][a-z0-9.+-]*$").unwrap();
    }
    IMAGE_MIME_RE.is_match(ct)
}

/// Guesses the media type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', ..] => Some("image/heic"),
        _ => None,
    }
}

/// Validates an upload and normalizes its content type.
///
/// A missing or generic declared type (`application/octet-stream`) is
/// replaced by the sniffed one; anything that is not `image/*` is rejected.
pub fn prepare_upload(content_type: &str, bytes: impl Into<Bytes>) -> Result<Photo, AppError> {
    let bytes = bytes.into();
    let declared = content_type.trim().to_ascii_lowercase();
    let content_type = if declared.is_empty() || declared == "application/octet-stream" {
        sniff_mime(&bytes)
            .ok_or_else(|| AppError::InvalidPhoto("unrecognized image data".into()))?
            .to_string()
    } else {
        declared
    };
    let photo = Photo::new(content_type, bytes);
    validate_photo(&photo)?;
    Ok(photo)
}

pub fn validate_photo(photo: &Photo) -> Result<(), AppError> {
    if !is_image_mime(&photo.content_type) {
        return Err(AppError::InvalidPhoto(photo.content_type.clone()));
    }
    if photo.len() > MAX_PHOTO_BYTES {
        return Err(AppError::PhotoTooLarge {
            size: photo.len(),
            max: MAX_PHOTO_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod image_tests {
    use super::*;

    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("image/"));
        assert!(!is_image_mime("application/octet-stream"));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&JPEG_HEADER), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n"), Some("image/png"));
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime(b"hello"), None);
    }

    #[test]
    fn data_uri_keeps_bytes_and_type() {
        let photo = Photo::new("image/png", vec![1u8, 2, 3, 250, 251]);
        let uri = photo.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(Photo::from_data_uri(&uri).expect("decode"), photo);
    }

    #[test]
    fn data_uri_rejects_garbage() {
        assert!(Photo::from_data_uri("plain text").is_err());
        assert!(Photo::from_data_uri("data:text/plain;base64,aGk=").is_err());
        assert!(Photo::from_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn rejects_non_image_upload() {
        let err = prepare_upload("text/plain", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, AppError::InvalidPhoto(_)));
        let err = prepare_upload("", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, AppError::InvalidPhoto(_)));
    }

    #[test]
    fn sniffs_generic_upload() {
        let photo = prepare_upload("application/octet-stream", JPEG_HEADER.to_vec()).unwrap();
        assert_eq!(photo.content_type, "image/jpeg");
    }

    #[test]
    fn size_limit_is_inclusive() {
        let exact = vec![0u8; MAX_PHOTO_BYTES];
        assert!(prepare_upload("image/jpeg", exact).is_ok());

        let over = vec![0u8; MAX_PHOTO_BYTES + 1];
        match prepare_upload("image/jpeg", over).unwrap_err() {
            AppError::PhotoTooLarge { size, max } => {
                assert_eq!(size, MAX_PHOTO_BYTES + 1);
                assert_eq!(max, MAX_PHOTO_BYTES);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

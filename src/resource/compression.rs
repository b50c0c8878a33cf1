//! Decompression stage of the fetch pipeline

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::FetchError;

/// Codecs a resource may declare in its `compression` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Resolve a declared codec name. An absent or empty name means no
    /// compression; anything other than `gzip` is rejected.
    pub fn from_name(name: Option<&str>) -> Result<Self, FetchError> {
        match name {
            None | Some("") => Ok(Compression::None),
            Some("gzip") => Ok(Compression::Gzip),
            Some(_) => Err(FetchError::CompressionInvalid),
        }
    }
}

/// Reverse the declared compression of `data`.
///
/// The codec name is validated before any bytes are looked at.
pub fn decompress(data: Vec<u8>, codec: Option<&str>) -> Result<Vec<u8>, FetchError> {
    match Compression::from_name(codec)? {
        Compression::None => Ok(data),
        Compression::Gzip => {
            let mut out = Vec::new();
            GzDecoder::new(data.as_slice())
                .read_to_end(&mut out)
                .map_err(FetchError::Decompression)?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(decompress(b"plain".to_vec(), None).unwrap(), b"plain");
        assert_eq!(decompress(b"plain".to_vec(), Some("")).unwrap(), b"plain");
    }

    #[test]
    fn test_gzip() {
        let packed = gzip(b"hello gzip");
        assert_eq!(decompress(packed, Some("gzip")).unwrap(), b"hello gzip");
    }

    #[test]
    fn test_unknown_codec_checked_before_payload() {
        let packed = gzip(b"valid gzip");
        assert!(matches!(
            decompress(packed, Some("xz")),
            Err(FetchError::CompressionInvalid)
        ));
        assert!(matches!(
            decompress(b"garbage".to_vec(), Some("GZIP")),
            Err(FetchError::CompressionInvalid)
        ));
    }

    #[test]
    fn test_corrupt_gzip() {
        assert!(matches!(
            decompress(b"not gzip at all".to_vec(), Some("gzip")),
            Err(FetchError::Decompression(_))
        ));
    }
}

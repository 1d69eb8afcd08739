use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::engine::error::AssetError;

/// Where an asset's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Path(PathBuf),
    /// An inline `data:` url, already decoded.
    Inline { mime: String, bytes: Vec<u8> },
}

impl AssetSource {
    pub fn parse(url: &str) -> Result<Self, AssetError> {
        if let Some(rest) = url.strip_prefix("data:") {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| AssetError::MalformedDataUrl(truncate(url)))?;
            let Some(mime) = header.strip_suffix(";base64") else {
                return Err(AssetError::MalformedDataUrl(truncate(url)));
            };
            let bytes = STANDARD.decode(payload.trim())?;
            return Ok(AssetSource::Inline {
                mime: mime.to_string(),
                bytes,
            });
        }
        if let Some((scheme, _)) = url.split_once("://") {
            if scheme != "file" {
                return Err(AssetError::UnsupportedScheme(url.to_string()));
            }
            return Ok(AssetSource::Path(PathBuf::from(&url[scheme.len() + 3..])));
        }
        Ok(AssetSource::Path(PathBuf::from(url)))
    }

    /// Reads the raw bytes, resolving relative paths against `base`.
    pub fn read(&self, base: Option<&Path>) -> Result<Vec<u8>, AssetError> {
        match self {
            AssetSource::Inline { bytes, .. } => Ok(bytes.clone()),
            AssetSource::Path(path) => {
                let path = match base {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.clone(),
                };
                std::fs::read(&path).map_err(|source| AssetError::Io { path, source })
            }
        }
    }
}

// Data urls can be huge; keep error messages readable.
fn truncate(url: &str) -> String {
    url.chars().take(48).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_stay_paths() {
        assert_eq!(
            AssetSource::parse("sprites/dude.png").unwrap(),
            AssetSource::Path(PathBuf::from("sprites/dude.png"))
        );
        assert_eq!(
            AssetSource::parse("file:///tmp/sky.png").unwrap(),
            AssetSource::Path(PathBuf::from("/tmp/sky.png"))
        );
    }

    #[test]
    fn decodes_base64_data_urls() {
        let source = AssetSource::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(
            source,
            AssetSource::Inline {
                mime: "image/png".to_string(),
                bytes: b"hello".to_vec(),
            }
        );
        assert_eq!(source.read(None).unwrap(), b"hello");
    }

    #[test]
    fn rejects_non_base64_data_urls() {
        assert!(matches!(
            AssetSource::parse("data:image/png,rawbytes"),
            Err(AssetError::MalformedDataUrl(_))
        ));
        assert!(matches!(
            AssetSource::parse("data:image/png;base64"),
            Err(AssetError::MalformedDataUrl(_))
        ));
        assert!(matches!(
            AssetSource::parse("data:image/png;base64,***"),
            Err(AssetError::Base64(_))
        ));
    }

    #[test]
    fn rejects_network_urls() {
        assert!(matches!(
            AssetSource::parse("https://example.com/sky.png"),
            Err(AssetError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn missing_file_reports_resolved_path() {
        let source = AssetSource::parse("does-not-exist.png").unwrap();
        match source.read(Some(Path::new("/nonexistent-base"))) {
            Err(AssetError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent-base/does-not-exist.png"))
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }
}

//! Ergonomic error context helpers.
//!
//! Provides an extension trait for converting IO errors raised while
//! loading local content into context-rich `NetError` variants.

use crate::base::neterror::NetError;
use std::io;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Attach the asset name to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use webrequest::base::context::IoResultExt;
    ///
    /// let bytes = std::fs::read(path).asset_context("webkit/start.html")?;
    /// // Error: "Asset webkit/start.html unavailable: entity not found"
    /// ```
    fn asset_context(self, name: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn asset_context(self, name: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::AssetUnavailable {
            name: name.to_string(),
            kind: e.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_asset_context() {
        let result: Result<(), io::Error> = Err(Error::new(ErrorKind::NotFound, "missing"));
        let err = result.asset_context("webkit/page.html").unwrap_err();

        match err {
            NetError::AssetUnavailable { name, kind } => {
                assert_eq!(name, "webkit/page.html");
                assert_eq!(kind, ErrorKind::NotFound);
            }
            _ => panic!("Expected AssetUnavailable"),
        }
    }

    #[test]
    fn test_asset_context_passes_ok_through() {
        let result: Result<u8, io::Error> = Ok(7);
        assert_eq!(result.asset_context("any").unwrap(), 7);
    }
}

//! Upload body for POST/PUT operations.

use bytes::Bytes;

/// Request body assembled from chunks appended before the request starts.
#[derive(Debug, Clone, Default)]
pub struct UploadData {
    chunks: Vec<Bytes>,
}

impl From<String> for UploadData {
    fn from(s: String) -> Self {
        Self::from(Bytes::from(s))
    }
}

impl From<Vec<u8>> for UploadData {
    fn from(v: Vec<u8>) -> Self {
        Self::from(Bytes::from(v))
    }
}

impl From<&str> for UploadData {
    fn from(s: &str) -> Self {
        Self::from(Bytes::from(s.to_owned()))
    }
}

impl From<Bytes> for UploadData {
    fn from(b: Bytes) -> Self {
        let mut data = UploadData::default();
        data.append(b);
        data
    }
}

impl UploadData {
    /// Append a chunk. Empty chunks are dropped.
    pub fn append(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Get the length of the body in bytes.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// Hand the chunks over in append order.
    pub fn into_chunks(self) -> Vec<Bytes> {
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body() {
        let body = UploadData::default();
        assert!(body.is_empty());
        assert_eq!(body.len(), 0);
    }

    #[test]
    fn test_chunks_keep_order() {
        let mut body = UploadData::from("hello");
        body.append(" world");
        assert_eq!(body.len(), 11);
        assert_eq!(body.chunks().len(), 2);
        assert_eq!(body.into_chunks()[1], Bytes::from_static(b" world"));
    }

    #[test]
    fn test_empty_chunk_is_dropped() {
        let mut body = UploadData::default();
        body.append(Bytes::new());
        assert!(body.is_empty());
    }

    #[test]
    fn test_from_vec() {
        let body: UploadData = vec![1u8, 2, 3, 4].into();
        assert_eq!(body.len(), 4);
    }
}

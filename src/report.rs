use std::fmt;

use serde::Serialize;

/// Outcome of compressing a file and decompressing it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripReport {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    /// Payload size of a static Huffman code for the same input, table excluded.
    pub static_huffman_bytes: Option<usize>,
    pub compression_ns: u64,
    pub decompression_ns: u64,
    pub matches: bool,
}

impl RoundTripReport {
    /// `100 - compressed / original * 100`, zero for an empty original.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        100.0 - self.compressed_bytes as f64 / self.original_bytes as f64 * 100.0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(fields) = value.as_object_mut() {
            fields.insert("reduction_percent".to_string(), serde_json::json!(self.reduction_percent()));
        }
        serde_json::to_string_pretty(&value)
    }
}

impl fmt::Display for RoundTripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "original size:        {} bytes", self.original_bytes)?;
        writeln!(f, "compressed size:      {} bytes", self.compressed_bytes)?;
        writeln!(f, "reduction:            {:.2}%", self.reduction_percent())?;
        if let Some(bytes) = self.static_huffman_bytes {
            writeln!(f, "static huffman:       {} bytes", bytes)?;
        }
        writeln!(f, "compression time:     {}ns", self.compression_ns)?;
        writeln!(f, "decompression time:   {}ns", self.decompression_ns)?;
        write!(f, "round trip:           {}", if self.matches { "ok" } else { "MISMATCH" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(original_bytes: usize, compressed_bytes: usize) -> RoundTripReport {
        RoundTripReport {
            original_bytes,
            compressed_bytes,
            static_huffman_bytes: None,
            compression_ns: 10,
            decompression_ns: 20,
            matches: true,
        }
    }

    #[test]
    fn test_reduction() {
        assert_eq!(report(200, 50).reduction_percent(), 75.0);
        assert_eq!(report(0, 1).reduction_percent(), 0.0);
        assert!(report(100, 101).reduction_percent() < 0.0);
    }

    #[test]
    fn test_display() {
        let text = report(0, 1).to_string();

        assert!(text.contains("reduction:            0.00%"));
        assert!(text.ends_with("ok"));
        assert!(!text.contains("static huffman"));
    }

    #[test]
    fn test_json() {
        let json: serde_json::Value = serde_json::from_str(&report(200, 50).to_json().unwrap()).unwrap();

        assert_eq!(json["original_bytes"], 200);
        assert_eq!(json["reduction_percent"], 75.0);
        assert_eq!(json["matches"], true);
    }
}

//! Collection log record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, whole record including this field)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Document Body    | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself. Every record holds
//! the full document, so replaying a log in order reproduces the latest
//! state of each document.

use std::io::{self, Read};

use super::checksum::compute_checksum;

/// length + id length + body length + checksum
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 4;

/// One full-document entry of a collection log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub document_id: String,
    /// Serialized JSON document
    pub body: Vec<u8>,
}

impl LogRecord {
    pub fn new(document_id: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            document_id: document_id.into(),
            body,
        }
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let record_length = (MIN_RECORD_SIZE + self.document_id.len() + self.body.len()) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&(self.document_id.len() as u32).to_le_bytes());
        record.extend_from_slice(self.document_id.as_bytes());
        record.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        record.extend_from_slice(&self.body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());
        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "Record too short"));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }
        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Record truncated: expected {} bytes, got {}", record_length, data.len()),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);
        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);
        let id_bytes = read_bytes(&mut cursor)?;
        let document_id = String::from_utf8(id_bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))?;
        let body = read_bytes(&mut cursor)?;

        Ok((Self { document_id, body }, record_length))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogRecord {
        LogRecord::new(
            "0b6f3c1e-3d0a-4c7e-9f38-2b1c6f1d9a10",
            br#"{"customer":"Acme","status":"draft"}"#.to_vec(),
        )
    }

    #[test]
    fn test_record_length_prefix() {
        let serialized = sample().serialize();
        let declared = u32::from_le_bytes([serialized[0], serialized[1], serialized[2], serialized[3]]);
        assert_eq!(declared as usize, serialized.len());
    }

    #[test]
    fn test_deserialize_consumes_one_record() {
        let mut bytes = sample().serialize();
        let first_len = bytes.len();
        bytes.extend(LogRecord::new("other", b"{}".to_vec()).serialize());

        let (record, consumed) = LogRecord::deserialize(&bytes).unwrap();
        assert_eq!(record, sample());
        assert_eq!(consumed, first_len);
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut serialized = sample().serialize();
        let mid = serialized.len() / 2;
        serialized[mid] ^= 0xFF;

        let err = LogRecord::deserialize(&serialized).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_record() {
        let serialized = sample().serialize();
        let err = LogRecord::deserialize(&serialized[..serialized.len() - 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

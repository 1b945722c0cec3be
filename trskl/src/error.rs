#[derive(Debug, thiserror::Error)]
pub enum TrsklError {
    #[error("Unexpected end of file at {position:#x} (wanted {wanted} bytes)")]
    UnexpectedEof { position: usize, wanted: usize },
    #[error("String at {position:#x} is not valid UTF-8: {source}")]
    InvalidEncoding {
        position: usize,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("Unexpected TRSKL {record} struct length: {struct_len:#06x}")]
    UnsupportedHeaderVersion {
        record: &'static str,
        struct_len: u16,
    },
    #[error("Unexpected bone transform struct length: {struct_len:#06x}")]
    UnsupportedTransformVersion { struct_len: u16 },
    #[error("Offset points outside of the file: {offset}")]
    InvalidOffset { offset: i64 },
    #[error("Negative {what} count: {count}")]
    NegativeCount { what: &'static str, count: i32 },
    #[error("Rig id out of range: {rig_id}")]
    RigIdOutOfRange { rig_id: i64 },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}

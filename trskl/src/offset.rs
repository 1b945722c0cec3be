//! Relative addressing.
//!
//! Every indirection in a TRSKL file is a signed 32-bit value added to (or, for struct
//! tables, subtracted from) an address the reader already knows. The arithmetic lives
//! here without any I/O so it can be checked on its own.

use crate::{cursor::Cursor, error::TrsklError, options::OffsetAnchor};

fn to_position(target: i64) -> Result<usize, TrsklError> {
    usize::try_from(target).map_err(|_| TrsklError::InvalidOffset { offset: target })
}

/// `anchor + raw`
pub fn resolve(anchor: usize, raw: i32) -> Result<usize, TrsklError> {
    to_position(anchor as i64 + raw as i64)
}

/// `anchor - raw`. A table stores the distance back to its struct table.
pub fn resolve_back(anchor: usize, raw: i32) -> Result<usize, TrsklError> {
    to_position(anchor as i64 - raw as i64)
}

impl Cursor<'_> {
    /// Reads the offset field at the current position and returns its absolute target.
    ///
    /// Does not seek to the target, the cursor only moves past the field. A raw value of
    /// zero is resolved like any other; callers skip absent fields before getting here.
    pub fn resolve_offset(&mut self, anchor: OffsetAnchor) -> Result<usize, TrsklError> {
        let field = self.tell();
        let raw = self.read_i32_le()?;

        resolve(anchor.position(field), raw)
    }

    /// Seeks to `field` and resolves the offset stored there.
    pub fn follow(&mut self, field: usize, anchor: OffsetAnchor) -> Result<usize, TrsklError> {
        self.seek_absolute(field)?;
        self.resolve_offset(anchor)
    }

    /// Seeks to `table`, then to the struct table its leading value points back to.
    pub fn enter_struct_table(&mut self, table: usize) -> Result<usize, TrsklError> {
        self.seek_absolute(table)?;

        let raw = self.read_i32_le()?;
        let struct_table = resolve_back(table, raw)?;

        self.seek_absolute(struct_table)?;

        Ok(struct_table)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_forward_and_back() {
        assert_eq!(resolve(0x20, 0x10).unwrap(), 0x30);
        assert_eq!(resolve(0x20, -0x20).unwrap(), 0);
        assert_eq!(resolve_back(0x20, 0x08).unwrap(), 0x18);
        assert_eq!(resolve_back(0x20, -0x08).unwrap(), 0x28);
    }

    #[test]
    fn resolve_before_start() {
        assert!(matches!(
            resolve(4, -8),
            Err(TrsklError::InvalidOffset { offset: -4 })
        ));
        assert!(matches!(
            resolve_back(4, 8),
            Err(TrsklError::InvalidOffset { offset: -4 })
        ));
    }

    #[test]
    fn resolve_offset_does_not_seek() {
        let mut bytes = vec![0u8; 4];
        bytes.extend(8i32.to_le_bytes());
        bytes.extend([0u8; 8]);

        let mut cursor = Cursor::new(&bytes);
        cursor.seek_absolute(4).unwrap();

        assert_eq!(cursor.resolve_offset(OffsetAnchor::FieldStart).unwrap(), 12);
        assert_eq!(cursor.tell(), 8);

        cursor.seek_absolute(4).unwrap();
        assert_eq!(cursor.resolve_offset(OffsetAnchor::AfterField).unwrap(), 16);
    }

    #[test]
    fn struct_table_lies_behind_table() {
        // struct table at 0, table at 4 pointing 4 bytes back
        let mut bytes = vec![0x0A, 0x00, 0x00, 0x00];
        bytes.extend(4i32.to_le_bytes());

        let mut cursor = Cursor::new(&bytes);

        assert_eq!(cursor.enter_struct_table(4).unwrap(), 0);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0A);
    }
}

use glam::Vec3;
use nom::{
    Parser,
    bytes::complete::take,
    number::complete::{le_f32, le_i32, le_u8, le_u16},
};

use crate::{
    error::TrsklError,
    nom_helpers::{IResult, le_f16, vec3},
};

/// Seekable little-endian reader over a borrowed file image.
///
/// The position never exceeds the length of the buffer: seeks past the end fail with
/// [`TrsklError::InvalidOffset`] and short reads with [`TrsklError::UnexpectedEof`].
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn tell(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn seek_absolute(&mut self, position: usize) -> Result<(), TrsklError> {
        if position > self.bytes.len() {
            return Err(TrsklError::InvalidOffset {
                offset: position as i64,
            });
        }

        self.position = position;

        Ok(())
    }

    fn read_with<T>(
        &mut self,
        wanted: usize,
        parser: impl FnOnce(&'a [u8]) -> IResult<'a, T>,
    ) -> Result<T, TrsklError> {
        let (rest, res) =
            parser(&self.bytes[self.position..]).map_err(|_| TrsklError::UnexpectedEof {
                position: self.position,
                wanted,
            })?;

        self.position = self.bytes.len() - rest.len();

        Ok(res)
    }

    pub fn read_u8(&mut self) -> Result<u8, TrsklError> {
        self.read_with(1, le_u8)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, TrsklError> {
        self.read_with(2, le_u16)
    }

    pub fn read_i32_le(&mut self) -> Result<i32, TrsklError> {
        self.read_with(4, le_i32)
    }

    pub fn read_f32_le(&mut self) -> Result<f32, TrsklError> {
        self.read_with(4, le_f32)
    }

    pub fn read_f16_le(&mut self) -> Result<f32, TrsklError> {
        self.read_with(2, le_f16)
    }

    pub fn read_vec3(&mut self) -> Result<Vec3, TrsklError> {
        self.read_with(12, vec3)
    }

    pub fn read_fixed_string(&mut self, len: usize) -> Result<String, TrsklError> {
        let position = self.position;
        let bytes = self.read_with(len, |i| take(len).parse(i))?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|source| TrsklError::InvalidEncoding { position, source })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn primitives_are_little_endian() {
        let bytes = [
            0x7F, // u8
            0x34, 0x12, // u16
            0xFE, 0xFF, 0xFF, 0xFF, // i32 -2
            0x00, 0x00, 0x80, 0x3F, // f32 1.0
            0x00, 0x3C, // f16 1.0
            0x00, 0xC0, // f16 -2.0
        ];
        let mut cursor = Cursor::new(&bytes);

        assert_eq!(cursor.read_u8().unwrap(), 0x7F);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
        assert_eq!(cursor.read_i32_le().unwrap(), -2);
        assert_eq!(cursor.read_f32_le().unwrap(), 1.0);
        assert_eq!(cursor.read_f16_le().unwrap(), 1.0);
        assert_eq!(cursor.read_f16_le().unwrap(), -2.0);
        assert_eq!(cursor.tell(), bytes.len());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn short_read_keeps_position() {
        let bytes = [0x01, 0x02, 0x03];
        let mut cursor = Cursor::new(&bytes);

        cursor.seek_absolute(1).unwrap();

        let err = cursor.read_i32_le().unwrap_err();

        assert!(matches!(
            err,
            TrsklError::UnexpectedEof {
                position: 1,
                wanted: 4
            }
        ));
        assert_eq!(cursor.tell(), 1);
    }

    #[test]
    fn seek_bounds() {
        let bytes = [0u8; 4];
        let mut cursor = Cursor::new(&bytes);

        // the end itself is a valid position, reading from it is not
        cursor.seek_absolute(4).unwrap();
        assert!(matches!(
            cursor.read_u8(),
            Err(TrsklError::UnexpectedEof { .. })
        ));

        assert!(matches!(
            cursor.seek_absolute(5),
            Err(TrsklError::InvalidOffset { offset: 5 })
        ));
    }

    #[test]
    fn fixed_string() {
        let bytes = b"rootjunk";
        let mut cursor = Cursor::new(bytes);

        assert_eq!(cursor.read_fixed_string(4).unwrap(), "root");
        assert_eq!(cursor.read_fixed_string(0).unwrap(), "");
        assert_eq!(cursor.tell(), 4);
    }

    #[test]
    fn fixed_string_invalid_utf8() {
        let bytes = [b'a', 0xC3, 0x28];
        let mut cursor = Cursor::new(&bytes);

        assert!(matches!(
            cursor.read_fixed_string(3),
            Err(TrsklError::InvalidEncoding { position: 0, .. })
        ));
    }

    #[test]
    fn vec3_read() {
        let bytes: Vec<u8> = [1.0f32, 2.0, 3.0]
            .iter()
            .flat_map(|f| f.to_le_bytes())
            .collect();
        let mut cursor = Cursor::new(&bytes);

        assert_eq!(cursor.read_vec3().unwrap(), Vec3::new(1.0, 2.0, 3.0));
    }
}

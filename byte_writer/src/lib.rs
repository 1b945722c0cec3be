//! Little-endian byte buffer with back-patching.
//!
//! Relocatable formats write a placeholder first and patch it once the target
//! position is known, so every `append_*` has a `replace_with_*` partner.

use glam::Vec3;

#[derive(Debug, Clone)]
pub struct ByteWriter {
    pub data: Vec<u8>,
    offset: usize,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offset: 0,
        }
    }

    fn offset(&mut self, offset: usize) {
        self.offset += offset;
    }

    /// Position the next append lands on.
    pub fn get_offset(&self) -> usize {
        self.offset
    }

    pub fn append_u8(&mut self, i: u8) {
        self.data.push(i);
        self.offset(1);
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
        self.offset(2);
    }

    pub fn append_i32(&mut self, i: i32) {
        self.data.extend(i.to_le_bytes());
        self.offset(4);
    }

    pub fn append_u32(&mut self, i: u32) {
        self.data.extend(i.to_le_bytes());
        self.offset(4);
    }

    pub fn append_f32(&mut self, i: f32) {
        self.data.extend(i.to_le_bytes());
        self.offset(4);
    }

    pub fn append_vec3(&mut self, v: Vec3) {
        self.append_f32(v.x);
        self.append_f32(v.y);
        self.append_f32(v.z);
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
        self.offset(i.len());
    }

    pub fn append_zeroes(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, 0);
        self.offset(count);
    }

    /// Pads with zeroes until the offset is a multiple of `alignment`.
    pub fn align_to(&mut self, alignment: usize) {
        let rem = self.offset % alignment;

        if rem != 0 {
            self.append_zeroes(alignment - rem);
        }
    }

    pub fn replace(&mut self, start: usize, length: usize, slice: &[u8]) {
        self.data[start..(length + start)].copy_from_slice(&slice[..length]);
    }

    pub fn replace_with_u16(&mut self, start: usize, val: u16) {
        self.replace(start, 2, &val.to_le_bytes());
    }

    pub fn replace_with_i32(&mut self, start: usize, val: i32) {
        self.replace(start, 4, &val.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn patch_placeholder() {
        let mut writer = ByteWriter::new();

        writer.append_u16(0xAAAA);
        let placeholder = writer.get_offset();
        writer.append_i32(0);
        writer.append_u8(7);

        writer.replace_with_i32(placeholder, -2);

        assert_eq!(writer.get_offset(), 7);
        assert_eq!(writer.data, vec![0xAA, 0xAA, 0xFE, 0xFF, 0xFF, 0xFF, 7]);
    }

    #[test]
    fn align() {
        let mut writer = ByteWriter::new();

        writer.append_u8(1);
        writer.align_to(4);
        assert_eq!(writer.get_offset(), 4);

        // already aligned
        writer.align_to(4);
        assert_eq!(writer.data.len(), 4);
    }

    #[test]
    fn vec3_is_three_floats() {
        let mut writer = ByteWriter::new();

        writer.append_vec3(Vec3::new(1.0, 0.0, -1.0));

        assert_eq!(writer.data.len(), 12);
        assert_eq!(&writer.data[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&writer.data[8..12], &(-1.0f32).to_le_bytes());
    }
}

use std::{fs::OpenOptions, io::Write, path::Path};

use byte_writer::ByteWriter;
use glam::Vec3;

use crate::{
    error::TrsklError,
    header::{RootLayout, TRANSFORM_STRUCT_LEN},
    options::{OffsetAnchor, ParseOptions},
    types::{BoneRecord, Transform, Trskl},
};

const ALIGNMENT: usize = 4;
/// Leading value of every table, the distance back to its struct table.
const SOFFSET_SIZE: usize = 4;

impl Trskl {
    pub fn write_to_bytes(&self) -> Vec<u8> {
        self.write_to_bytes_with(&ParseOptions::default())
    }

    /// Stores `rig_id - node_id_adjust` for every bone so that reading the result back
    /// with the same options yields the same rig ids.
    pub fn write_to_bytes_with(&self, options: &ParseOptions) -> Vec<u8> {
        let raw_bones: Vec<BoneRecord> = self
            .bones
            .iter()
            .map(|bone| BoneRecord {
                rig_id: bone
                    .rig_id
                    .map(|rig_id| rig_id.wrapping_sub(self.node_id_adjust)),
                ..bone.clone()
            })
            .collect();

        write_trskl(
            self.header.layout(),
            self.node_id_adjust,
            &raw_bones,
            options.offset_anchor,
        )
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), TrsklError> {
        let bytes = self.write_to_bytes();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        file.write_all(&bytes)?;
        file.flush()?;

        Ok(())
    }
}

/// Serializes a bone array. Rig ids are written as given, before any adjust.
///
/// `node_id_adjust` is only written for [`RootLayout::Extended`].
pub fn write_trskl(
    layout: RootLayout,
    node_id_adjust: i32,
    bones: &[BoneRecord],
    anchor: OffsetAnchor,
) -> Vec<u8> {
    let mut writer = ByteWriter::new();

    // root table offset, absolute
    writer.append_i32(0);

    // fields: node id base, bone table, reserved b, reserved c, node id adjust
    let mut field_offsets = vec![4, 8, 0, 0];
    let mut table_fields = vec![0, 0];

    if layout == RootLayout::Extended {
        field_offsets.push(12);
        table_fields.push(node_id_adjust);
    }

    let (table, field_positions) =
        write_table(&mut writer, layout.struct_len(), &field_offsets, |writer| {
            table_fields
                .iter()
                .map(|value| {
                    let position = writer.get_offset();
                    writer.append_i32(*value);
                    position
                })
                .collect::<Vec<usize>>()
        });

    writer.replace_with_i32(0, table as i32);

    // bone array
    writer.align_to(ALIGNMENT);

    let array = writer.get_offset();
    let bone_table_field = field_positions[1];

    writer.replace_with_i32(bone_table_field, anchor.relative(bone_table_field, array));
    writer.append_i32(bones.len() as i32);

    let slots: Vec<usize> = bones
        .iter()
        .map(|_| {
            let slot = writer.get_offset();
            writer.append_i32(0);
            slot
        })
        .collect();

    for (bone, slot) in bones.iter().zip(slots) {
        let record = write_bone(&mut writer, bone, anchor);

        writer.replace_with_i32(slot, anchor.relative(slot, record));
    }

    writer.into_bytes()
}

/// Writes a struct table and the table right after it. `write_fields` appends the table
/// body after the leading soffset.
///
/// Returns the table position and whatever `write_fields` returned.
fn write_table<T>(
    writer: &mut ByteWriter,
    struct_len: u16,
    field_offsets: &[u16],
    write_fields: impl FnOnce(&mut ByteWriter) -> T,
) -> (usize, T) {
    writer.align_to(ALIGNMENT);

    let struct_table = writer.get_offset();

    writer.append_u16(struct_len);

    let section_len_position = writer.get_offset();

    writer.append_u16(0);

    for offset in field_offsets {
        writer.append_u16(*offset);
    }

    writer.align_to(ALIGNMENT);

    let table = writer.get_offset();

    writer.append_i32((table - struct_table) as i32);

    let res = write_fields(writer);

    let section_len = writer.get_offset() - table;
    writer.replace_with_u16(section_len_position, section_len as u16);

    (table, res)
}

struct BoneFieldOffsets {
    fields: [u16; 8],
    // running end of the table body
    end: u16,
}

impl BoneFieldOffsets {
    fn new() -> Self {
        Self {
            fields: [0; 8],
            end: SOFFSET_SIZE as u16,
        }
    }

    fn place(&mut self, slot: usize, present: bool, size: u16) {
        if present {
            self.fields[slot] = self.end;
            self.end += size;
        }
    }
}

fn write_bone(writer: &mut ByteWriter, bone: &BoneRecord, anchor: OffsetAnchor) -> usize {
    let mut offsets = BoneFieldOffsets::new();

    offsets.place(0, bone.name.is_some(), 4);
    offsets.place(1, bone.transform.is_some(), 4);
    offsets.place(2, bone.scale_pivot.is_some(), 12);
    offsets.place(3, bone.rotate_pivot.is_some(), 12);
    offsets.place(4, bone.parent.is_some(), 4);
    offsets.place(5, bone.rig_id.is_some(), 4);
    offsets.place(6, bone.merge_alias.is_some(), 4);

    // out of line fields are patched once their targets exist
    let (record, (name_field, transform_field, merge_field)) = write_table(
        writer,
        bone.layout.struct_len(),
        &offsets.fields[..bone.layout.field_count()],
        |writer| {
            let mut placeholder = |present: bool| {
                present.then(|| {
                    let position = writer.get_offset();
                    writer.append_i32(0);
                    position
                })
            };

            let name_field = placeholder(bone.name.is_some());
            let transform_field = placeholder(bone.transform.is_some());

            if let Some(pivot) = bone.scale_pivot {
                writer.append_vec3(pivot);
            }

            if let Some(pivot) = bone.rotate_pivot {
                writer.append_vec3(pivot);
            }

            if let Some(parent) = bone.parent {
                writer.append_i32(parent);
            }

            if let Some(rig_id) = bone.rig_id {
                writer.append_i32(rig_id);
            }

            let merge_field = bone.merge_alias.as_ref().map(|_| {
                let position = writer.get_offset();
                writer.append_i32(0);
                position
            });

            (name_field, transform_field, merge_field)
        },
    );

    if let (Some(field), Some(name)) = (name_field, &bone.name) {
        let target = write_string(writer, name);
        writer.replace_with_i32(field, anchor.relative(field, target));
    }

    if let (Some(field), Some(transform)) = (transform_field, &bone.transform) {
        let target = write_transform(writer, transform);
        writer.replace_with_i32(field, anchor.relative(field, target));
    }

    if let (Some(field), Some(alias)) = (merge_field, &bone.merge_alias) {
        let target = write_string(writer, alias);
        writer.replace_with_i32(field, anchor.relative(field, target));
    }

    record
}

fn write_string(writer: &mut ByteWriter, s: &str) -> usize {
    writer.align_to(ALIGNMENT);

    let start = writer.get_offset();

    writer.append_i32(s.len() as i32);
    writer.append_u8_slice(s.as_bytes());

    start
}

fn write_transform(writer: &mut ByteWriter, transform: &Transform) -> usize {
    let vec3_size = 12;
    let scale = SOFFSET_SIZE as u16;
    let rotation = scale + vec3_size;
    let translation = rotation + vec3_size;

    let (table, _) = write_table(
        writer,
        TRANSFORM_STRUCT_LEN,
        &[scale, rotation, translation],
        |writer| {
            let triads: [Vec3; 3] = [transform.scale, transform.rotation, transform.translation];

            for triad in triads {
                writer.append_vec3(triad);
            }
        },
    );

    table
}

#[cfg(test)]
mod test {
    use crate::header::BoneLayout;

    use super::*;

    #[test]
    fn empty_array() {
        let bytes = write_trskl(RootLayout::Compact, 0, &[], OffsetAnchor::FieldStart);
        let trskl = Trskl::open_from_bytes(&bytes).unwrap();

        assert!(trskl.bones.is_empty());
        assert!(trskl.registry.is_empty());
        assert_eq!(trskl.header.layout(), RootLayout::Compact);
        assert_ne!(trskl.header.bone_table_rel_offset, 0);
    }

    #[test]
    fn file_ends_on_last_read_byte() {
        let bones = [BoneRecord::new("abc").with_rig_id(0)];
        let bytes = write_trskl(RootLayout::Compact, 0, &bones, OffsetAnchor::FieldStart);

        // "abc" is not padded
        assert_eq!(&bytes[bytes.len() - 3..], b"abc");
    }

    #[test]
    fn short_layout_has_seven_fields() {
        let bones = [BoneRecord::new("a")
            .with_layout(BoneLayout::Short)
            .with_rig_id(0)];
        let bytes = write_trskl(RootLayout::Compact, 0, &bones, OffsetAnchor::FieldStart);
        let trskl = Trskl::open_from_bytes(&bytes).unwrap();

        assert_eq!(trskl.bones[0].layout, BoneLayout::Short);
    }

    #[test]
    fn adjust_is_subtracted_on_write() {
        let bones = vec![BoneRecord::new("a").with_rig_id(10)];
        let trskl = Trskl::new(RootLayout::Extended, 4, bones).unwrap();

        let parsed = Trskl::open_from_bytes(&trskl.write_to_bytes()).unwrap();

        assert_eq!(parsed.node_id_adjust, 4);
        assert_eq!(parsed.bones[0].rig_id, Some(10));
    }

    #[test]
    fn write_to_file() {
        let path = std::env::temp_dir().join("trskl_writer_test.trskl");
        let trskl = Trskl::new(
            RootLayout::Compact,
            0,
            vec![BoneRecord::new("root").with_rig_id(0)],
        )
        .unwrap();

        trskl.write_to_file(&path).unwrap();

        let parsed = Trskl::open_from_file(&path).unwrap();

        assert_eq!(parsed.registry.lookup_by_name("root"), Some(0));

        std::fs::remove_file(path).unwrap();
    }
}

use std::{ffi::OsStr, fs::OpenOptions, io::Read, path::Path};

use glam::Vec3;
use log::{debug, warn};

use crate::{
    cursor::Cursor,
    error::TrsklError,
    header::{
        RootHeader, decode_bone_header, decode_root_header, decode_transform_header,
        read_node_id_adjust,
    },
    options::{OffsetAnchor, ParseOptions},
    registry::BoneRegistry,
    types::{BoneRecord, Transform, Trskl},
};

impl Trskl {
    pub fn open_from_bytes(bytes: &[u8]) -> Result<Trskl, TrsklError> {
        Self::open_from_bytes_with(bytes, &ParseOptions::default())
    }

    pub fn open_from_bytes_with(bytes: &[u8], options: &ParseOptions) -> Result<Trskl, TrsklError> {
        parse_trskl_file(bytes, options)
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<Trskl, TrsklError> {
        Self::open_from_file_with(path, &ParseOptions::default())
    }

    pub fn open_from_file_with(
        path: impl AsRef<OsStr> + AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Trskl, TrsklError> {
        let mut file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|op| TrsklError::IOError { source: op })?;
        let mut bytes = vec![];

        file.read_to_end(&mut bytes)
            .map_err(|op| TrsklError::IOError { source: op })?;

        Self::open_from_bytes_with(&bytes, options)
    }
}

/// Bone name to rig id mapping of a TRSKL file.
///
/// Relative offsets are counted from the address of the offset field itself
/// ([`OffsetAnchor::FieldStart`]). Files whose offsets count from the byte after the
/// field need [`parse_trskl_with`] and [`OffsetAnchor::AfterField`].
pub fn parse_trskl(bytes: &[u8]) -> Result<BoneRegistry, TrsklError> {
    parse_trskl_with(bytes, &ParseOptions::default())
}

pub fn parse_trskl_with(bytes: &[u8], options: &ParseOptions) -> Result<BoneRegistry, TrsklError> {
    Trskl::open_from_bytes_with(bytes, options).map(Trskl::into_registry)
}

fn parse_trskl_file(bytes: &[u8], options: &ParseOptions) -> Result<Trskl, TrsklError> {
    let mut cursor = Cursor::new(bytes);

    let (base, header) = decode_root_header(&mut cursor)?;
    let node_id_adjust = read_node_id_adjust(&mut cursor, base, &header)?;
    let bones = walk_bones(&mut cursor, base, &header, node_id_adjust, options)?;

    check_parents(&bones);

    let registry = BoneRegistry::from_bones(&bones)?;

    debug!("parsed {} bones, {} registered", bones.len(), registry.len());

    Ok(Trskl {
        header,
        node_id_adjust,
        bones,
        registry,
    })
}

fn check_parents(bones: &[BoneRecord]) {
    for (index, bone) in bones.iter().enumerate() {
        let Some(parent) = bone.parent else {
            continue;
        };

        if usize::try_from(parent).map_or(true, |parent| parent >= bones.len()) {
            warn!(
                "bone {index} (`{}`) has parent {parent} outside of {} bones",
                bone.name_or_empty(),
                bones.len()
            );
        }
    }
}

/// Decodes the bone array in file order.
pub fn walk_bones(
    cursor: &mut Cursor,
    base: usize,
    header: &RootHeader,
    node_id_adjust: i32,
    options: &ParseOptions,
) -> Result<Vec<BoneRecord>, TrsklError> {
    if header.bone_table_rel_offset == 0 {
        return Ok(vec![]);
    }

    let anchor = options.offset_anchor;
    let array = cursor.follow(base + header.bone_table_rel_offset as usize, anchor)?;

    cursor.seek_absolute(array)?;

    let bone_count = cursor.read_i32_le()?;

    if bone_count < 0 {
        return Err(TrsklError::NegativeCount {
            what: "bone",
            count: bone_count,
        });
    }

    // each slot is 4 bytes, do not trust the count any further than that
    let mut bones = Vec::with_capacity((bone_count as usize).min(cursor.remaining() / 4));

    for index in 0..bone_count as usize {
        let record = cursor.resolve_offset(anchor)?;
        let next_slot = cursor.tell();

        let bone = parse_bone(cursor, record, node_id_adjust, options)
            .inspect_err(|err| warn!("cannot parse bone {index} at {record:#x}: {err}"))?;

        debug!(
            "bone {index} `{}` rig id {:?} parent {:?}",
            bone.name_or_empty(),
            bone.rig_id,
            bone.parent
        );

        bones.push(bone);
        cursor.seek_absolute(next_slot)?;
    }

    Ok(bones)
}

fn parse_bone(
    cursor: &mut Cursor,
    record: usize,
    node_id_adjust: i32,
    options: &ParseOptions,
) -> Result<BoneRecord, TrsklError> {
    let header = decode_bone_header(cursor, record)?;
    let anchor = options.offset_anchor;
    let field = |offset: u16| (offset != 0).then(|| record + offset as usize);

    let rig_id = field(header.rig_id_rel_offset)
        .map(|at| -> Result<i32, TrsklError> {
            cursor.seek_absolute(at)?;

            let raw = cursor.read_i32_le()?;

            options
                .rig_id_quirk
                .apply(raw, node_id_adjust)
                .ok_or(TrsklError::RigIdOutOfRange {
                    rig_id: raw as i64 + node_id_adjust as i64,
                })
        })
        .transpose()?;

    let name = field(header.name_rel_offset)
        .map(|at| read_string(cursor, at, anchor))
        .transpose()?;

    let parent = field(header.parent_rel_offset)
        .map(|at| {
            cursor.seek_absolute(at)?;
            cursor.read_i32_le()
        })
        .transpose()?;

    let transform = field(header.transform_rel_offset)
        .map(|at| read_transform(cursor, at, anchor))
        .transpose()?;

    let merge_alias = field(header.bone_merge_rel_offset)
        .map(|at| read_string(cursor, at, anchor))
        .transpose()?;

    let scale_pivot = field(header.field_c)
        .map(|at| read_inline_vec3(cursor, at))
        .transpose()?;

    let rotate_pivot = field(header.field_d)
        .map(|at| read_inline_vec3(cursor, at))
        .transpose()?;

    Ok(BoneRecord {
        layout: header.layout,
        name,
        transform,
        scale_pivot,
        rotate_pivot,
        parent,
        rig_id,
        merge_alias,
    })
}

/// Length prefixed string behind the offset field at `field`.
fn read_string(
    cursor: &mut Cursor,
    field: usize,
    anchor: OffsetAnchor,
) -> Result<String, TrsklError> {
    let start = cursor.follow(field, anchor)?;

    cursor.seek_absolute(start)?;

    let len = cursor.read_i32_le()?;

    if len < 0 {
        return Err(TrsklError::NegativeCount {
            what: "string length",
            count: len,
        });
    }

    cursor.read_fixed_string(len as usize)
}

fn read_inline_vec3(cursor: &mut Cursor, at: usize) -> Result<Vec3, TrsklError> {
    cursor.seek_absolute(at)?;
    cursor.read_vec3()
}

fn read_transform(
    cursor: &mut Cursor,
    field: usize,
    anchor: OffsetAnchor,
) -> Result<Transform, TrsklError> {
    let table = cursor.follow(field, anchor)?;
    let header = decode_transform_header(cursor, table)?;
    let mut transform = Transform::default();

    let triads = [
        (header.translation_rel_offset, &mut transform.translation),
        (header.rotation_rel_offset, &mut transform.rotation),
        (header.scale_rel_offset, &mut transform.scale),
    ];

    for (offset, triad) in triads {
        if offset != 0 {
            *triad = read_inline_vec3(cursor, table + offset as usize)?;
        }
    }

    Ok(transform)
}

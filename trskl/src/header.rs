//! Struct tables.
//!
//! A struct table starts with its own length, which doubles as the only version marker
//! the format has, followed by the length of the table it describes and then one `u16`
//! per field. A field value is the distance from the start of the table to the field, or
//! zero when the field was not written.

use log::{debug, info};

use crate::{cursor::Cursor, error::TrsklError, offset::resolve};

pub const ROOT_STRUCT_LEN_COMPACT: u16 = 0x000C;
pub const ROOT_STRUCT_LEN_EXTENDED: u16 = 0x000E;
pub const BONE_STRUCT_LEN_SHORT: u16 = 0x0012;
pub const BONE_STRUCT_LEN_LONG: u16 = 0x0014;
pub const TRANSFORM_STRUCT_LEN: u16 = 0x000A;

/// Upper bound on field slots of any known struct table.
const MAX_FIELDS: usize = 8;

fn read_fields(cursor: &mut Cursor, count: usize) -> Result<[u16; MAX_FIELDS], TrsklError> {
    let mut fields = [0u16; MAX_FIELDS];

    for field in fields.iter_mut().take(count) {
        *field = cursor.read_u16_le()?;
    }

    Ok(fields)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootLayout {
    /// 0x000C, no node id adjust.
    Compact,
    /// 0x000E
    Extended,
}

impl RootLayout {
    pub fn from_struct_len(struct_len: u16) -> Result<Self, TrsklError> {
        match struct_len {
            ROOT_STRUCT_LEN_COMPACT => Ok(Self::Compact),
            ROOT_STRUCT_LEN_EXTENDED => Ok(Self::Extended),
            struct_len => Err(TrsklError::UnsupportedHeaderVersion {
                record: "root",
                struct_len,
            }),
        }
    }

    pub fn struct_len(self) -> u16 {
        match self {
            Self::Compact => ROOT_STRUCT_LEN_COMPACT,
            Self::Extended => ROOT_STRUCT_LEN_EXTENDED,
        }
    }

    pub fn field_count(self) -> usize {
        match self {
            Self::Compact => 4,
            Self::Extended => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootHeader {
    pub struct_len: u16,
    pub section_len: u16,
    pub node_id_base_rel_offset: u16,
    pub bone_table_rel_offset: u16,
    pub reserved_b: u16,
    pub reserved_c: u16,
    /// Always 0 for [`RootLayout::Compact`].
    pub node_id_adjust_rel_offset: u16,
}

impl RootHeader {
    /// Header of a file that has not been written yet. Offsets are filled in by the writer.
    pub fn new(layout: RootLayout) -> Self {
        Self {
            struct_len: layout.struct_len(),
            section_len: 0,
            node_id_base_rel_offset: 0,
            bone_table_rel_offset: 0,
            reserved_b: 0,
            reserved_c: 0,
            node_id_adjust_rel_offset: 0,
        }
    }

    pub fn layout(&self) -> RootLayout {
        // only constructed from a known struct length
        match self.struct_len {
            ROOT_STRUCT_LEN_EXTENDED => RootLayout::Extended,
            _ => RootLayout::Compact,
        }
    }
}

/// Returns the root table address, which every root field offset is relative to, and the
/// decoded root struct table.
pub fn decode_root_header(cursor: &mut Cursor) -> Result<(usize, RootHeader), TrsklError> {
    cursor.seek_absolute(0)?;

    // the very first value is absolute
    let root = cursor.read_i32_le()?;
    let base = resolve(0, root)?;

    cursor.enter_struct_table(base)?;

    let struct_len = cursor.read_u16_le()?;
    let layout = RootLayout::from_struct_len(struct_len)?;
    let section_len = cursor.read_u16_le()?;
    let fields = read_fields(cursor, layout.field_count())?;

    debug!("root table at {base:#x}, layout {layout:?}");

    Ok((
        base,
        RootHeader {
            struct_len,
            section_len,
            node_id_base_rel_offset: fields[0],
            bone_table_rel_offset: fields[1],
            reserved_b: fields[2],
            reserved_c: fields[3],
            node_id_adjust_rel_offset: fields[4],
        },
    ))
}

/// Value added to every rig id in the file.
pub fn read_node_id_adjust(
    cursor: &mut Cursor,
    base: usize,
    header: &RootHeader,
) -> Result<i32, TrsklError> {
    if header.node_id_adjust_rel_offset == 0 {
        return Ok(0);
    }

    cursor.seek_absolute(base + header.node_id_adjust_rel_offset as usize)?;

    let node_id_adjust = cursor.read_i32_le()?;

    info!("mesh node ids start at {node_id_adjust}");

    Ok(node_id_adjust)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneLayout {
    /// 0x0012, seven fields.
    Short,
    /// 0x0014, eight fields.
    Long,
    /// Anything else. Read exactly like [`BoneLayout::Long`].
    Fallback(u16),
}

impl BoneLayout {
    pub fn from_struct_len(struct_len: u16) -> Self {
        match struct_len {
            BONE_STRUCT_LEN_SHORT => Self::Short,
            BONE_STRUCT_LEN_LONG => Self::Long,
            other => Self::Fallback(other),
        }
    }

    pub fn struct_len(self) -> u16 {
        match self {
            Self::Short => BONE_STRUCT_LEN_SHORT,
            Self::Long => BONE_STRUCT_LEN_LONG,
            Self::Fallback(struct_len) => struct_len,
        }
    }

    pub fn field_count(self) -> usize {
        match self {
            Self::Short => 7,
            Self::Long | Self::Fallback(_) => 8,
        }
    }
}

/// Field offsets of one bone table, relative to the bone table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneRecordHeader {
    pub layout: BoneLayout,
    pub section_len: u16,
    pub name_rel_offset: u16,
    pub transform_rel_offset: u16,
    /// Scale pivot.
    pub field_c: u16,
    /// Rotate pivot.
    pub field_d: u16,
    pub parent_rel_offset: u16,
    pub rig_id_rel_offset: u16,
    pub bone_merge_rel_offset: u16,
    /// Always 0 for [`BoneLayout::Short`].
    pub field_h: u16,
}

pub fn decode_bone_header(
    cursor: &mut Cursor,
    record: usize,
) -> Result<BoneRecordHeader, TrsklError> {
    cursor.enter_struct_table(record)?;

    let layout = BoneLayout::from_struct_len(cursor.read_u16_le()?);

    if let BoneLayout::Fallback(struct_len) = layout {
        debug!("bone at {record:#x} has struct length {struct_len:#06x}, reading as long");
    }

    let section_len = cursor.read_u16_le()?;
    let fields = read_fields(cursor, layout.field_count())?;

    Ok(BoneRecordHeader {
        layout,
        section_len,
        name_rel_offset: fields[0],
        transform_rel_offset: fields[1],
        field_c: fields[2],
        field_d: fields[3],
        parent_rel_offset: fields[4],
        rig_id_rel_offset: fields[5],
        bone_merge_rel_offset: fields[6],
        field_h: fields[7],
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRecordHeader {
    pub section_len: u16,
    pub scale_rel_offset: u16,
    pub rotation_rel_offset: u16,
    pub translation_rel_offset: u16,
}

pub fn decode_transform_header(
    cursor: &mut Cursor,
    table: usize,
) -> Result<TransformRecordHeader, TrsklError> {
    cursor.enter_struct_table(table)?;

    let struct_len = cursor.read_u16_le()?;

    if struct_len != TRANSFORM_STRUCT_LEN {
        return Err(TrsklError::UnsupportedTransformVersion { struct_len });
    }

    let section_len = cursor.read_u16_le()?;
    let fields = read_fields(cursor, 3)?;

    Ok(TransformRecordHeader {
        section_len,
        scale_rel_offset: fields[0],
        rotation_rel_offset: fields[1],
        translation_rel_offset: fields[2],
    })
}

/// Raw rig id that older exporters wrote for bones without a slot.
pub const LEGACY_RIG_ID: i32 = -1;
/// What [`LEGACY_RIG_ID`] is read as.
pub const LEGACY_RIG_ID_REPLACEMENT: i32 = 99;

/// Order in which the legacy `-1 -> 99` rig id rewrite and the file's node id adjust are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RigIdQuirk {
    /// `raw + adjust`, except a raw `-1` which ends up as `99`.
    #[default]
    AdjustThenNormalize,
    /// A raw `-1` becomes `99`, then `+ adjust`.
    NormalizeThenAdjust,
}

impl RigIdQuirk {
    /// `None` on overflow.
    pub fn apply(self, raw: i32, node_id_adjust: i32) -> Option<i32> {
        let adjusted = raw.checked_add(node_id_adjust);

        // keyed on the raw value in both orders
        if raw != LEGACY_RIG_ID {
            return adjusted;
        }

        match self {
            RigIdQuirk::AdjustThenNormalize => adjusted.map(|_| LEGACY_RIG_ID_REPLACEMENT),
            RigIdQuirk::NormalizeThenAdjust => {
                LEGACY_RIG_ID_REPLACEMENT.checked_add(node_id_adjust)
            }
        }
    }
}

/// Which address a relative offset is counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetAnchor {
    /// The address of the offset field itself. This is how shipped files are laid out.
    #[default]
    FieldStart,
    /// The address right after the 4 byte offset field.
    AfterField,
}

impl OffsetAnchor {
    /// Address the raw value of the field at `field` is added to.
    pub fn position(self, field: usize) -> usize {
        match self {
            OffsetAnchor::FieldStart => field,
            OffsetAnchor::AfterField => field + 4,
        }
    }

    /// Raw value to store in the field at `field` so that it points at `target`.
    pub fn relative(self, field: usize, target: usize) -> i32 {
        (target as i64 - self.position(field) as i64) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub rig_id_quirk: RigIdQuirk,
    pub offset_anchor: OffsetAnchor,
}

use glam::Vec3;

use crate::{
    error::TrsklError,
    header::{BoneLayout, RootHeader, RootLayout},
    registry::BoneRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }
}

/// One entry of the bone array. Every field the file did not write is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneRecord {
    /// Struct table the record was read with, or is written with.
    pub layout: BoneLayout,
    pub name: Option<String>,
    pub transform: Option<Transform>,
    pub scale_pivot: Option<Vec3>,
    pub rotate_pivot: Option<Vec3>,
    /// Position in the bone array, not a rig id.
    pub parent: Option<i32>,
    /// Already adjusted.
    pub rig_id: Option<i32>,
    pub merge_alias: Option<String>,
}

impl BoneRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            layout: BoneLayout::Long,
            name: Some(name.into()),
            transform: None,
            scale_pivot: None,
            rotate_pivot: None,
            parent: None,
            rig_id: None,
            merge_alias: None,
        }
    }

    /// Record with every optional field absent.
    pub fn empty(layout: BoneLayout) -> Self {
        Self {
            layout,
            name: None,
            ..Self::new("")
        }
    }

    pub fn with_layout(mut self, layout: BoneLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_rig_id(mut self, rig_id: i32) -> Self {
        self.rig_id = Some(rig_id);
        self
    }

    pub fn with_parent(mut self, parent: i32) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_merge_alias(mut self, alias: impl Into<String>) -> Self {
        self.merge_alias = Some(alias.into());
        self
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Parent index with `0` standing in for "no parent".
    pub fn parent_index(&self) -> i32 {
        self.parent.unwrap_or(0)
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trskl {
    pub header: RootHeader,
    /// Added to every rig id while parsing. Zero for [`RootLayout::Compact`] files.
    pub node_id_adjust: i32,
    pub bones: Vec<BoneRecord>,
    pub registry: BoneRegistry,
}

impl Trskl {
    /// Rig ids in `bones` are adjusted values, see [`Trskl::write_to_bytes_with`].
    pub fn new(
        layout: RootLayout,
        node_id_adjust: i32,
        bones: Vec<BoneRecord>,
    ) -> Result<Self, TrsklError> {
        let registry = BoneRegistry::from_bones(&bones)?;

        Ok(Self {
            header: RootHeader::new(layout),
            node_id_adjust: match layout {
                RootLayout::Compact => 0,
                RootLayout::Extended => node_id_adjust,
            },
            bones,
            registry,
        })
    }

    pub fn registry(&self) -> &BoneRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> BoneRegistry {
        self.registry
    }
}

//! Skeleton document in the layout the Blender skeleton exporter writes, so a binary
//! TRSKL can be edited and converted back with the same tooling.

use serde::Serialize;
use trskl::{BoneRecord, Transform, Trskl, Vec3};

#[derive(Debug, Serialize, PartialEq)]
pub struct JsonVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for JsonVec3 {
    fn from(value: Vec3) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonTransform {
    #[serde(rename = "VecScale")]
    pub scale: JsonVec3,
    #[serde(rename = "VecRot")]
    pub rotation: JsonVec3,
    #[serde(rename = "VecTranslate")]
    pub translation: JsonVec3,
}

impl From<Transform> for JsonTransform {
    fn from(value: Transform) -> Self {
        Self {
            scale: value.scale.into(),
            rotation: value.rotation.into(),
            translation: value.translation.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransformNode {
    pub name: String,
    pub transform: JsonTransform,
    #[serde(rename = "scalePivot")]
    pub scale_pivot: JsonVec3,
    #[serde(rename = "rotatePivot")]
    pub rotate_pivot: JsonVec3,
    /// -1 for no parent
    pub parent_idx: i32,
    /// Before `rig_offset` is added, -1 for no rig id
    pub rig_idx: i32,
    pub effect_node: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

#[derive(Debug, Serialize)]
pub struct SkeletonDocument {
    pub res_0: i32,
    pub transform_nodes: Vec<TransformNode>,
    // bind matrices and ik chains are not decoded
    pub bones: Vec<serde_json::Value>,
    pub iks: Vec<serde_json::Value>,
    pub rig_offset: i32,
}

fn transform_node(bone: &BoneRecord, rig_offset: i32) -> TransformNode {
    TransformNode {
        name: bone.name_or_empty().to_owned(),
        transform: bone.transform.unwrap_or_default().into(),
        scale_pivot: bone.scale_pivot.unwrap_or(Vec3::ZERO).into(),
        rotate_pivot: bone.rotate_pivot.unwrap_or(Vec3::ZERO).into(),
        parent_idx: bone.parent.unwrap_or(-1),
        rig_idx: bone
            .rig_id
            .map_or(-1, |rig_id| rig_id.wrapping_sub(rig_offset)),
        effect_node: bone.merge_alias.clone().unwrap_or_default(),
        node_type: "Default".to_owned(),
    }
}

impl From<&Trskl> for SkeletonDocument {
    fn from(trskl: &Trskl) -> Self {
        Self {
            res_0: 0,
            transform_nodes: trskl
                .bones
                .iter()
                .map(|bone| transform_node(bone, trskl.node_id_adjust))
                .collect(),
            bones: vec![],
            iks: vec![],
            rig_offset: trskl.node_id_adjust,
        }
    }
}

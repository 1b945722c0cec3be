use std::collections::HashMap;

use log::warn;

use crate::{error::TrsklError, types::BoneRecord};

/// Largest rig id accepted. Rig ids index into skin data, the array is sized by them.
pub const MAX_RIG_ID: i32 = 0xFFFF;

/// Bone name <-> rig id lookup used when translating vertex group names into the bone
/// indices stored in vertex buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoneRegistry {
    by_name: HashMap<String, i32>,
    // None is an unused slot
    by_rig_id: Vec<Option<String>>,
}

impl BoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every bone that has both a name and a rig id, in array order.
    pub fn from_bones(bones: &[BoneRecord]) -> Result<Self, TrsklError> {
        bones
            .iter()
            .filter_map(|bone| Some((bone.name.as_deref()?, bone.rig_id?)))
            .try_fold(Self::new(), |mut registry, (name, rig_id)| {
                registry.insert(name, rig_id)?;
                Ok(registry)
            })
    }

    /// Returns the rig id `name` was previously registered with.
    ///
    /// Duplicate names are not rejected: the name now maps to `rig_id` while the old slot
    /// keeps the name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        rig_id: i32,
    ) -> Result<Option<i32>, TrsklError> {
        if !(0..=MAX_RIG_ID).contains(&rig_id) {
            return Err(TrsklError::RigIdOutOfRange {
                rig_id: rig_id as i64,
            });
        }

        let name = name.into();
        let slot = rig_id as usize;

        if self.by_rig_id.len() <= slot {
            self.by_rig_id.resize(slot + 1, None);
        }

        self.by_rig_id[slot] = Some(name.clone());

        let previous = self.by_name.insert(name, rig_id);

        if let Some(previous) = previous.filter(|previous| *previous != rig_id) {
            warn!(
                "bone `{}` registered again: rig id {previous} -> {rig_id}",
                self.by_rig_id[slot].as_deref().unwrap_or_default()
            );
        }

        Ok(previous)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    pub fn lookup_by_rig_id(&self, rig_id: i32) -> Option<&str> {
        let slot = usize::try_from(rig_id).ok()?;

        self.by_rig_id.get(slot)?.as_deref()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Occupied slots in rig id order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.by_rig_id
            .iter()
            .enumerate()
            .filter_map(|(slot, name)| Some((slot as i32, name.as_deref()?)))
    }

    /// Every slot up to the highest rig id, unused ones as `""`.
    pub fn names_by_rig_id(&self) -> Vec<&str> {
        self.by_rig_id
            .iter()
            .map(|name| name.as_deref().unwrap_or_default())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_grows_with_placeholders() {
        let mut registry = BoneRegistry::new();

        registry.insert("hips", 3).unwrap();

        assert_eq!(registry.names_by_rig_id(), vec!["", "", "", "hips"]);
        assert_eq!(registry.lookup_by_rig_id(3), Some("hips"));
        assert_eq!(registry.lookup_by_rig_id(1), None);
        assert_eq!(registry.lookup_by_rig_id(4), None);
        assert_eq!(registry.lookup_by_rig_id(-1), None);
        assert_eq!(registry.lookup_by_name("hips"), Some(3));
        assert_eq!(registry.lookup_by_name("spine"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_last_write_wins() {
        let mut registry = BoneRegistry::new();

        assert_eq!(registry.insert("arm", 1).unwrap(), None);
        assert_eq!(registry.insert("arm", 4).unwrap(), Some(1));

        assert_eq!(registry.lookup_by_name("arm"), Some(4));
        assert_eq!(registry.lookup_by_rig_id(1), Some("arm"));
        assert_eq!(registry.lookup_by_rig_id(4), Some("arm"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn out_of_range() {
        let mut registry = BoneRegistry::new();

        assert!(matches!(
            registry.insert("a", -2),
            Err(TrsklError::RigIdOutOfRange { rig_id: -2 })
        ));
        assert!(matches!(
            registry.insert("a", MAX_RIG_ID + 1),
            Err(TrsklError::RigIdOutOfRange { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn from_bones_skips_unregistered() {
        let bones = vec![
            BoneRecord::new("root").with_rig_id(0),
            BoneRecord::new("no_rig"),
            BoneRecord {
                name: None,
                ..BoneRecord::new("").with_rig_id(2)
            },
            BoneRecord::new("hand").with_rig_id(1),
        ];

        let registry = BoneRegistry::from_bones(&bones).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.iter().collect::<Vec<_>>(),
            vec![(0, "root"), (1, "hand")]
        );
        assert_eq!(registry.lookup_by_name("no_rig"), None);
    }

    #[test]
    fn rig_id_name_round_trip() {
        let bones: Vec<BoneRecord> = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, name)| BoneRecord::new(*name).with_rig_id(i as i32 * 2))
            .collect();

        let registry = BoneRegistry::from_bones(&bones).unwrap();

        for (rig_id, name) in registry.iter() {
            assert_eq!(registry.lookup_by_name(name), Some(rig_id));
        }
    }
}

//! Symmetrize preparation: mark the left-side bones and hand them to a
//! [`Mirrorer`], which owns the actual mirroring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scene::Skeleton;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorAxis {
    #[default]
    NegativeX,
    PositiveX,
}

impl fmt::Display for MirrorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MirrorAxis::NegativeX => "NEGATIVE_X",
            MirrorAxis::PositiveX => "POSITIVE_X",
        })
    }
}

/// Bones handed to the mirrorer, plus the anchor bone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MirrorSelection {
    pub bones: Vec<String>,
    pub active: Option<String>,
}

impl MirrorSelection {
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// Generates or aligns the mirrored counterparts of the selected bones.
pub trait Mirrorer {
    fn symmetrize(&mut self, skeleton: &mut Skeleton, selection: &MirrorSelection, axis: MirrorAxis) -> Result<()>;
}

impl<F> Mirrorer for F
where
    F: FnMut(&mut Skeleton, &MirrorSelection, MirrorAxis) -> Result<()>,
{
    fn symmetrize(&mut self, skeleton: &mut Skeleton, selection: &MirrorSelection, axis: MirrorAxis) -> Result<()> {
        self(skeleton, selection, axis)
    }
}

/// Leaves the marked selection in the skeleton for the host to mirror.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionOnly;

impl Mirrorer for SelectionOnly {
    fn symmetrize(&mut self, _skeleton: &mut Skeleton, selection: &MirrorSelection, axis: MirrorAxis) -> Result<()> {
        log::info!(
            "symmetrize {} requested for {} bone(s), anchor {}",
            axis,
            selection.bones.len(),
            selection.active.as_deref().unwrap_or("<none>")
        );
        Ok(())
    }
}

/// Names ending in ` L`, or containing `_left` in any case.
pub fn is_left_side(name: &str) -> bool {
    name.ends_with(" L") || name.to_lowercase().contains("_left")
}

/// Deselect everything, select the left-side bones (head and tail too) and
/// make the first of them the active bone. With nothing selected the active
/// bone is left as it was.
pub fn select_left_side(skeleton: &mut Skeleton) -> MirrorSelection {
    skeleton.deselect_all();
    for bone in &mut skeleton.bones {
        if is_left_side(&bone.name) {
            bone.set_selected(true);
        }
    }

    let bones: Vec<String> = skeleton.selected().map(|b| b.name.clone()).collect();
    let active = bones.first().cloned();
    if active.is_some() {
        skeleton.active_bone = active.clone();
    }
    MirrorSelection { bones, active }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records every call instead of mirroring.
    #[derive(Default)]
    pub struct RecordingMirrorer {
        pub calls: Vec<(MirrorSelection, MirrorAxis)>,
    }

    impl Mirrorer for RecordingMirrorer {
        fn symmetrize(&mut self, skeleton: &mut Skeleton, selection: &MirrorSelection, axis: MirrorAxis) -> Result<()> {
            // The skeleton must already carry the selection it is handed.
            let marked: Vec<String> = skeleton.selected().map(|b| b.name.clone()).collect();
            assert_eq!(marked, selection.bones);
            self.calls.push((selection.clone(), axis));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingMirrorer;
    use super::*;
    use crate::error::ArmatureError;
    use crate::scene::Bone;
    use glam::Vec3;

    fn skeleton(names: &[&str]) -> Skeleton {
        Skeleton::new(names.iter().map(|n| Bone::new(*n, Vec3::ZERO, Vec3::Z)).collect())
    }

    #[test]
    fn left_side_detection() {
        assert!(is_left_side("Bip01_Clavicle L"));
        assert!(is_left_side("B_eye_inner_left"));
        assert!(is_left_side("B_EYE_LEFT"));
        assert!(!is_left_side("Bip01_Clavicle R"));
        assert!(!is_left_side("B_eye_outer_right"));
        assert!(!is_left_side("Lid L2"));
        assert!(!is_left_side("leftover"));
    }

    #[test]
    fn selects_left_bones_and_anchors_first() {
        let mut sk = skeleton(&["root", "Bip01_Clavicle R", "Bip01_Clavicle L", "B_eye_outer_left", "Bip01_UpArm L"]);
        sk.bones[1].set_selected(true);

        let sel = select_left_side(&mut sk);
        assert_eq!(sel.bones, vec!["Bip01_Clavicle L", "B_eye_outer_left", "Bip01_UpArm L"]);
        assert_eq!(sel.active.as_deref(), Some("Bip01_Clavicle L"));
        assert_eq!(sk.active_bone.as_deref(), Some("Bip01_Clavicle L"));

        assert!(!sk.bones[1].select);
        let left = &sk.bones[2];
        assert!(left.select && left.select_head && left.select_tail);
    }

    #[test]
    fn empty_selection_keeps_active_bone() {
        let mut sk = skeleton(&["root", "spine"]);
        sk.active_bone = Some("spine".into());
        let sel = select_left_side(&mut sk);
        assert!(sel.is_empty());
        assert_eq!(sel.active, None);
        assert_eq!(sk.active_bone.as_deref(), Some("spine"));
    }

    #[test]
    fn mirrorer_sees_marked_skeleton() {
        let mut sk = skeleton(&["Hand L", "Hand R"]);
        let sel = select_left_side(&mut sk);
        let mut rec = RecordingMirrorer::default();
        rec.symmetrize(&mut sk, &sel, MirrorAxis::NegativeX).unwrap();
        assert_eq!(rec.calls.len(), 1);
        assert_eq!(rec.calls[0].0.bones, vec!["Hand L"]);
        assert_eq!(rec.calls[0].1, MirrorAxis::NegativeX);
    }

    #[test]
    fn closures_are_mirrorers() {
        let mut sk = skeleton(&["Hand L"]);
        let sel = select_left_side(&mut sk);
        let mut failing = |_: &mut Skeleton, _: &MirrorSelection, _: MirrorAxis| -> Result<()> {
            Err(ArmatureError::Mirror("no edit bones".into()))
        };
        assert!(failing.symmetrize(&mut sk, &sel, MirrorAxis::NegativeX).is_err());
        assert!(SelectionOnly.symmetrize(&mut sk, &sel, MirrorAxis::NegativeX).is_ok());
    }

    #[test]
    fn axis_display_matches_host_names() {
        assert_eq!(MirrorAxis::NegativeX.to_string(), "NEGATIVE_X");
        assert_eq!(MirrorAxis::PositiveX.to_string(), "POSITIVE_X");
    }
}

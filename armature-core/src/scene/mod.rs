//! Scene documents: the objects a run can target, the active selection and
//! the current mode.

pub mod schema;

use std::ops::{Deref, DerefMut};
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;

use crate::error::ArmatureError;
pub use schema::{Bone, Mode, ObjectKind, Scene, SceneObject, Skeleton};

pub fn load_from_yaml_str(s: &str) -> Result<Scene> {
    let scene: Scene = serde_yaml::from_str(s)?;
    Ok(scene)
}

pub fn load_from_json_str(s: &str) -> Result<Scene> {
    let scene: Scene = serde_json::from_str(s)?;
    Ok(scene)
}

/// Load a scene, picking JSON for `.json` files and YAML otherwise.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let scene = if is_json(path) { load_from_json_str(&data) } else { load_from_yaml_str(&data) };
    scene.with_context(|| format!("parsing scene {}", path.display()))
}

pub fn save_to_path<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
    let path = path.as_ref();
    let data = if is_json(path) {
        serde_json::to_string_pretty(scene)?
    } else {
        serde_yaml::to_string(scene)?
    };
    std::fs::write(path, data).with_context(|| format!("writing scene {}", path.display()))
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

impl Bone {
    pub fn new(name: impl Into<String>, head: Vec3, tail: Vec3) -> Self {
        Self {
            name: name.into(),
            head,
            tail,
            parent: None,
            select: false,
            select_head: false,
            select_tail: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn length(&self) -> f32 {
        (self.tail - self.head).length()
    }

    /// Unit vector from head to tail, `None` for a zero-length bone.
    pub fn direction(&self) -> Option<Vec3> {
        let len = self.length();
        (len > 0.0).then(|| (self.tail - self.head) / len)
    }

    /// Select the bone together with both of its end points.
    pub fn set_selected(&mut self, on: bool) {
        self.select = on;
        self.select_head = on;
        self.select_tail = on;
    }
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones, active_bone: None }
    }

    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    pub fn bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bones.iter_mut().find(|b| b.name == name)
    }

    /// Parent of the bone at `index`, if its parent name resolves.
    pub fn parent_of(&self, index: usize) -> Option<&Bone> {
        let parent = self.bones.get(index)?.parent.as_deref()?;
        self.bone(parent)
    }

    /// Rename the bone at `index`, re-pointing children and the active bone.
    ///
    /// Returns `true` when another bone already carries `new_name`; the rename
    /// still happens.
    pub fn rename_bone(&mut self, index: usize, new_name: &str) -> bool {
        let collision = self
            .bones
            .iter()
            .enumerate()
            .any(|(i, b)| i != index && b.name == new_name);
        let old = std::mem::replace(&mut self.bones[index].name, new_name.to_string());
        for bone in &mut self.bones {
            if bone.parent.as_deref() == Some(old.as_str()) {
                bone.parent = Some(new_name.to_string());
            }
        }
        if self.active_bone.as_deref() == Some(old.as_str()) {
            self.active_bone = Some(new_name.to_string());
        }
        collision
    }

    pub fn deselect_all(&mut self) {
        for bone in &mut self.bones {
            bone.set_selected(false);
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter().filter(|b| b.select)
    }
}

impl Scene {
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn set_active(&mut self, name: impl Into<String>) {
        self.active = Some(name.into());
    }

    /// Selection guard: the active object must exist and be an armature.
    pub fn active_skeleton(&self) -> Result<&Skeleton, ArmatureError> {
        let name = self.active.as_deref().ok_or(ArmatureError::NoActiveObject)?;
        let obj = self
            .object(name)
            .ok_or_else(|| ArmatureError::ActiveObjectMissing(name.to_string()))?;
        match &obj.kind {
            ObjectKind::Armature(skeleton) => Ok(skeleton),
            other => Err(ArmatureError::NotAnArmature { name: name.to_string(), kind: other.label() }),
        }
    }

    pub fn active_skeleton_mut(&mut self) -> Result<&mut Skeleton, ArmatureError> {
        active_in(self.active.as_deref(), &mut self.objects)
    }

    /// Enter edit mode on the active armature. Object mode comes back when
    /// the returned scope is dropped.
    pub fn edit(&mut self) -> Result<EditScope<'_>, ArmatureError> {
        let Scene { active, mode, objects } = self;
        let skeleton = active_in(active.as_deref(), objects)?;
        *mode = Mode::Edit;
        log::debug!("mode -> edit");
        Ok(EditScope { mode, skeleton })
    }
}

fn active_in<'a>(
    active: Option<&str>,
    objects: &'a mut [SceneObject],
) -> Result<&'a mut Skeleton, ArmatureError> {
    let name = active.ok_or(ArmatureError::NoActiveObject)?;
    let obj = objects
        .iter_mut()
        .find(|o| o.name == name)
        .ok_or_else(|| ArmatureError::ActiveObjectMissing(name.to_string()))?;
    match &mut obj.kind {
        ObjectKind::Armature(skeleton) => Ok(skeleton),
        other => Err(ArmatureError::NotAnArmature { name: name.to_string(), kind: other.label() }),
    }
}

/// Edit-mode access to the active skeleton.
pub struct EditScope<'a> {
    mode: &'a mut Mode,
    skeleton: &'a mut Skeleton,
}

impl Deref for EditScope<'_> {
    type Target = Skeleton;
    fn deref(&self) -> &Skeleton {
        self.skeleton
    }
}

impl DerefMut for EditScope<'_> {
    fn deref_mut(&mut self) -> &mut Skeleton {
        self.skeleton
    }
}

impl Drop for EditScope<'_> {
    fn drop(&mut self) {
        *self.mode = Mode::Object;
        log::debug!("mode -> object");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE_YAML: &str = r#"
active: Armature
objects:
  - name: Armature
    kind:
      type: armature
      bones:
        - name: root
          head: [0.0, 0.0, 0.0]
          tail: [0.0, 0.0, 2.0]
        - name: Bip01_R_Clavicle
          head: [0.0, 0.0, 2.0]
          tail: [0.5, 0.0, 2.0]
          parent: root
  - name: Body
    kind:
      type: mesh
"#;

    #[test]
    fn yaml_scene_loads() {
        let scene = load_from_yaml_str(SCENE_YAML).expect("valid yaml");
        assert_eq!(scene.mode, Mode::Object);
        assert_eq!(scene.objects.len(), 2);
        let skeleton = scene.active_skeleton().expect("armature");
        assert_eq!(skeleton.bones.len(), 2);
        assert_eq!(skeleton.bones[1].parent.as_deref(), Some("root"));
        assert!((skeleton.bones[1].length() - 0.5).abs() < 1e-6);
        assert!(!skeleton.bones[0].select);
    }

    #[test]
    fn json_round_trip_keeps_bones() {
        let scene = load_from_yaml_str(SCENE_YAML).unwrap();
        let json = serde_json::to_string(&scene).unwrap();
        let back = load_from_json_str(&json).unwrap();
        assert_eq!(back.active_skeleton().unwrap(), scene.active_skeleton().unwrap());
    }

    #[test]
    fn guard_rejects_missing_or_wrong_selection() {
        let mut scene = load_from_yaml_str(SCENE_YAML).unwrap();

        scene.active = None;
        assert!(matches!(scene.active_skeleton(), Err(ArmatureError::NoActiveObject)));

        scene.set_active("Body");
        match scene.active_skeleton_mut() {
            Err(ArmatureError::NotAnArmature { name, kind }) => {
                assert_eq!(name, "Body");
                assert_eq!(kind, "mesh");
            }
            other => panic!("unexpected: {:?}", other),
        }

        scene.set_active("Ghost");
        assert!(matches!(scene.edit(), Err(ArmatureError::ActiveObjectMissing(_))));
        assert_eq!(scene.mode, Mode::Object);
    }

    #[test]
    fn edit_scope_restores_object_mode() {
        let mut scene = load_from_yaml_str(SCENE_YAML).unwrap();
        {
            let mut skeleton = scene.edit().unwrap();
            skeleton.bones[0].tail = Vec3::new(0.0, 0.0, 3.0);
        }
        assert_eq!(scene.mode, Mode::Object);
        assert_eq!(scene.active_skeleton().unwrap().bones[0].tail, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn rename_repoints_children_and_active() {
        let mut skeleton = Skeleton::new(vec![
            Bone::new("a", Vec3::ZERO, Vec3::Z),
            Bone::new("b", Vec3::Z, Vec3::Z * 2.0).with_parent("a"),
            Bone::new("c", Vec3::Z, Vec3::X).with_parent("a"),
        ]);
        skeleton.active_bone = Some("a".into());

        assert!(!skeleton.rename_bone(0, "spine"));
        assert_eq!(skeleton.bones[1].parent.as_deref(), Some("spine"));
        assert_eq!(skeleton.bones[2].parent.as_deref(), Some("spine"));
        assert_eq!(skeleton.active_bone.as_deref(), Some("spine"));
        assert_eq!(skeleton.parent_of(1).map(|b| b.name.as_str()), Some("spine"));

        assert!(skeleton.rename_bone(2, "b"));
    }

    #[test]
    fn zero_length_bone_has_no_direction() {
        let bone = Bone::new("nub", Vec3::ONE, Vec3::ONE);
        assert_eq!(bone.length(), 0.0);
        assert!(bone.direction().is_none());
        let bone = Bone::new("arm", Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        let dir = bone.direction().unwrap();
        assert!((dir - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-6);
    }
}

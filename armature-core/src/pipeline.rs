//! Scene-level operations and the full fix → rename → symmetrize run.

use serde::Serialize;

use crate::config::NormalizeConfig;
use crate::error::Result;
use crate::rig::{
    fix_bone_lengths, normalize_bone_names, select_left_side, LengthFix, MirrorSelection, Mirrorer, RenameRecord,
};
use crate::scene::Scene;

/// Extend short bones of the active armature, in edit mode.
pub fn fix_lengths(scene: &mut Scene, cfg: &NormalizeConfig) -> Result<Vec<LengthFix>> {
    let mut skeleton = scene.edit()?;
    Ok(fix_bone_lengths(&mut skeleton, &cfg.lengths))
}

/// Normalize the bone names of the active armature.
pub fn rename_bones(scene: &mut Scene, cfg: &NormalizeConfig) -> Result<Vec<RenameRecord>> {
    let skeleton = scene.active_skeleton_mut()?;
    Ok(normalize_bone_names(skeleton, cfg.names.rules()))
}

/// Select the left-side bones of the active armature and pass them to
/// `mirrorer`, in edit mode. Mirrorer errors propagate.
pub fn symmetrize(scene: &mut Scene, cfg: &NormalizeConfig, mirrorer: &mut dyn Mirrorer) -> Result<MirrorSelection> {
    let mut skeleton = scene.edit()?;
    let selection = select_left_side(&mut skeleton);
    if selection.is_empty() {
        log::warn!("no left-side bones selected; symmetrize has nothing to mirror");
    }
    mirrorer.symmetrize(&mut skeleton, &selection, cfg.mirror.axis)?;
    Ok(selection)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Idle,
    LengthsFixed,
    NamesNormalized,
    Mirrored,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Idle => Stage::LengthsFixed,
            Stage::LengthsFixed => Stage::NamesNormalized,
            Stage::NamesNormalized => Stage::Mirrored,
            Stage::Mirrored => Stage::Idle,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub lengths: Vec<LengthFix>,
    pub renames: Vec<RenameRecord>,
    pub mirror: MirrorSelection,
}

/// Runs the three passes in order on the active armature.
///
/// The selection is checked once up front; a failing check leaves the scene
/// untouched. A later failure keeps whatever earlier stages already changed,
/// and [`Pipeline::stage`] tells how far the run got.
pub struct Pipeline<'c> {
    config: &'c NormalizeConfig,
    stage: Stage,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c NormalizeConfig) -> Self {
        Self { config, stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self) {
        let next = self.stage.next();
        log::debug!("pipeline {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    pub fn run(&mut self, scene: &mut Scene, mirrorer: &mut dyn Mirrorer) -> Result<RunReport> {
        self.stage = Stage::Idle;
        scene.active_skeleton()?;

        let lengths = fix_lengths(scene, self.config)?;
        self.advance();
        let renames = rename_bones(scene, self.config)?;
        self.advance();
        let mirror = symmetrize(scene, self.config, mirrorer)?;
        self.advance();

        self.advance();
        Ok(RunReport { lengths, renames, mirror })
    }
}

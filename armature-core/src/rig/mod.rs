//! Rigging passes over a skeleton: bone length fixing, bone renaming and
//! symmetrize preparation.

pub mod lengths;
pub mod mirror;
pub mod names;

pub use lengths::{fix_bone_lengths, LengthFix};
pub use mirror::{select_left_side, MirrorAxis, MirrorSelection, Mirrorer, SelectionOnly};
pub use names::{normalize_bone_names, normalize_name, NameRules, RenameKind, RenameRecord};

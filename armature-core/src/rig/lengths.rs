use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::config::LengthConfig;
use crate::scene::Skeleton;

/// One bone extended by [`fix_bone_lengths`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthFix {
    pub bone: String,
    pub old_length: f32,
    pub new_length: f32,
}

impl fmt::Display for LengthFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.3}m → {:.3}m", self.bone, self.old_length, self.new_length)
    }
}

/// Extend every bone shorter than `cfg.min_length`, in collection order.
///
/// Bones with a length keep their direction and grow by `cfg.extension`.
/// Zero-length bones point along their parent (as it stands at that moment
/// in the pass) or along the fallback direction, and end up exactly
/// `cfg.extension` long. Only `tail` moves.
pub fn fix_bone_lengths(skeleton: &mut Skeleton, cfg: &LengthConfig) -> Vec<LengthFix> {
    let fallback = cfg.fallback_direction();
    let mut fixed = Vec::new();

    for i in 0..skeleton.bones.len() {
        let bone = &skeleton.bones[i];
        let current = bone.length();
        // NaN lengths compare as unordered and are left alone.
        if current.partial_cmp(&cfg.min_length) != Some(Ordering::Less) {
            continue;
        }

        let head = bone.head;
        let tail = if current > 0.0 {
            let direction = (bone.tail - head) / current;
            head + direction * (current + cfg.extension)
        } else {
            let direction = skeleton
                .parent_of(i)
                .and_then(|parent| parent.direction())
                .unwrap_or(fallback);
            head + direction * cfg.extension
        };

        let bone = &mut skeleton.bones[i];
        bone.tail = tail;
        let fix = LengthFix { bone: bone.name.clone(), old_length: current, new_length: bone.length() };
        log::debug!("fixed length {}", fix);
        fixed.push(fix);
    }

    fixed
}

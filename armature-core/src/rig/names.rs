//! Bone name normalization.
//!
//! Side markers buried in a name (`Bip01_R_Clavicle`, `Bip01_LUpArmTwist`,
//! `B_eyebrow_right_up`, ...) are moved to a trailing ` R` / ` L` token.
//! A few eye bones whose names carry two side words are mapped through a
//! fixed table first.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::scene::Skeleton;

const SPECIAL_EYE_BONES: [(&str, &str); 4] = [
    ("B_eye_left_right", "B_eye_inner_left"),
    ("B_eye_left_left", "B_eye_outer_left"),
    ("B_eye_right_right", "B_eye_outer_right"),
    ("B_eye_right_left", "B_eye_inner_right"),
];

/// Which rewrite produced a new name. Rules are listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameKind {
    /// Exact hit in the eye-bone table.
    Special,
    /// `PREFIX_R_SUFFIX`
    SideToken,
    /// `PREFIX_LSuffix`
    SideLetter,
    /// `PREFIX_right_SUFFIX`
    SideWord,
    /// `PREFIX_rightsuffix`
    SideWordFused,
}

struct RewriteRule {
    kind: RenameKind,
    pattern: Regex,
}

impl RewriteRule {
    fn new(kind: RenameKind, pattern: &str) -> Self {
        let pattern = Regex::new(pattern).expect("built-in rename pattern must compile");
        Self { kind, pattern }
    }

    fn apply(&self, name: &str) -> Option<String> {
        let caps = self.pattern.captures(name)?;
        Some(match self.kind {
            RenameKind::SideToken | RenameKind::SideLetter => {
                format!("{}_{} {}", &caps[1], &caps[3], &caps[2])
            }
            RenameKind::SideWord | RenameKind::SideWordFused => {
                format!("{}_{} {}", &caps[1], &caps[2], side_of_word(&caps))
            }
            RenameKind::Special => return None,
        })
    }
}

// The side comes from the whole name, not the matched word: a name holding
// "right" anywhere is treated as right-side.
fn side_of_word(caps: &Captures<'_>) -> char {
    if caps[0].contains("right") { 'R' } else { 'L' }
}

/// Ordered rename rules; the first rule that matches wins.
pub struct NameRules {
    special: bool,
    rules: Vec<RewriteRule>,
}

impl NameRules {
    fn build(special: bool) -> Self {
        let rules = vec![
            RewriteRule::new(RenameKind::SideToken, r"^(.*?)_(R|L)_(.*)$"),
            RewriteRule::new(RenameKind::SideLetter, r"^(.*?)_(L|R)([A-Z].*)$"),
            RewriteRule::new(RenameKind::SideWord, r"^(.+?)_(?:right|left)_(.+)$"),
            RewriteRule::new(RenameKind::SideWordFused, r"^(.+?)_(?:right|left)([a-z][^_]*)$"),
        ];
        Self { special, rules }
    }

    /// Eye-bone table followed by the generic rules.
    pub fn standard() -> &'static NameRules {
        static RULES: OnceLock<NameRules> = OnceLock::new();
        RULES.get_or_init(|| NameRules::build(true))
    }

    /// Generic rules only, without the eye-bone table.
    pub fn generic_only() -> &'static NameRules {
        static RULES: OnceLock<NameRules> = OnceLock::new();
        RULES.get_or_init(|| NameRules::build(false))
    }

    /// New name for `name`, or `None` when it should stay as it is.
    pub fn rename(&self, name: &str) -> Option<(String, RenameKind)> {
        if self.special {
            if let Some(new) = special_case(name) {
                return Some((new.to_string(), RenameKind::Special));
            }
        }
        if has_side_suffix(name) {
            return None;
        }
        self.rules
            .iter()
            .find_map(|rule| rule.apply(name).map(|new| (new, rule.kind)))
            .filter(|(new, _)| new != name)
    }
}

fn special_case(name: &str) -> Option<&'static str> {
    SPECIAL_EYE_BONES.iter().find(|(from, _)| *from == name).map(|(_, to)| *to)
}

/// Already in `"<stem> R"` / `"<stem> L"` form. Rule A would otherwise
/// re-match names such as `A_B_R_C R` on a second pass.
pub fn has_side_suffix(name: &str) -> bool {
    name.len() > 2 && (name.ends_with(" R") || name.ends_with(" L"))
}

/// Normalized form of a single name with the standard rules.
pub fn normalize_name(name: &str) -> Option<String> {
    NameRules::standard().rename(name).map(|(new, _)| new)
}

/// One bone renamed by [`normalize_bone_names`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub old: String,
    pub new: String,
    pub kind: RenameKind,
    /// Another bone already had `new` when this one was renamed.
    pub collision: bool,
}

impl fmt::Display for RenameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.kind == RenameKind::Special { "Special rename" } else { "Renamed" };
        write!(f, "{}: {} → {}", label, self.old, self.new)
    }
}

/// Rename every bone of `skeleton` in collection order.
///
/// Name collisions are not prevented; they are logged and flagged on the
/// record. Parent links follow the renamed bone.
pub fn normalize_bone_names(skeleton: &mut Skeleton, rules: &NameRules) -> Vec<RenameRecord> {
    let mut records = Vec::new();
    for i in 0..skeleton.bones.len() {
        let Some((new, kind)) = rules.rename(&skeleton.bones[i].name) else { continue };
        let old = skeleton.bones[i].name.clone();
        let collision = skeleton.rename_bone(i, &new);
        if collision {
            log::warn!("rename {} → {} collides with an existing bone", old, new);
        }
        let record = RenameRecord { old, new, kind, collision };
        log::debug!("{}", record);
        records.push(record);
    }
    records
}

use serde::{Deserialize, Serialize};

/// Per-edge inset used for display padding and window margins.
///
/// Deserializes from either a single integer (applied to every edge) or a
/// `[left, top, right, bottom]` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InsetRepr")]
pub struct Inset {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InsetRepr {
    All(i32),
    Edges([i32; 4]),
    Named {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
}

impl From<InsetRepr> for Inset {
    fn from(repr: InsetRepr) -> Self {
        match repr {
            InsetRepr::All(value) => Self::all(value),
            InsetRepr::Edges([left, top, right, bottom]) => Self {
                left,
                top,
                right,
                bottom,
            },
            InsetRepr::Named {
                left,
                top,
                right,
                bottom,
            } => Self {
                left,
                top,
                right,
                bottom,
            },
        }
    }
}

impl Inset {
    pub const fn all(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

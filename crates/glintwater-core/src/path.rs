//! Render path selection.

use serde::{Deserialize, Serialize};

/// Which color pipeline turns shaded radiance into display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderPathKind {
    /// Tone map and encode each fragment as it is shaded.
    #[default]
    Direct,
    /// Shade into a linear HDR target, post-process, then tone map and encode.
    Composited,
}

impl RenderPathKind {
    /// Returns the other path.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            RenderPathKind::Direct => RenderPathKind::Composited,
            RenderPathKind::Composited => RenderPathKind::Direct,
        }
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RenderPathKind::Direct => "direct",
            RenderPathKind::Composited => "composited",
        }
    }
}

impl std::fmt::Display for RenderPathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

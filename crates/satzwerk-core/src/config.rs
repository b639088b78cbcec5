// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render configuration.

use serde::{Deserialize, Serialize};

/// Per-renderer options, passed explicitly into the orchestrator constructor.
///
/// These replace ambient process-wide toggles so that concurrent renders with
/// different diagnostic needs do not interfere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Produce a debug-overlay document (field boxes, labels, data-presence
    /// colors) alongside every render.
    pub debug_overlay: bool,
    /// Auto-crop blank white margins from images before fitting. Keeps
    /// hand-drawn sketches from rendering tiny inside their box.
    pub auto_crop_images: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            debug_overlay: false,
            auto_crop_images: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_overlay_off_and_crop_on() {
        let opts = RenderOptions::default();
        assert!(!opts.debug_overlay);
        assert!(opts.auto_crop_images);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzwerk-core — shared types, errors, and configuration for the Satzwerk
// template filler.

pub mod config;
pub mod error;
pub mod types;

pub use config::RenderOptions;
pub use error::{Result, SatzwerkError};
pub use types::{
    Alignment, FieldKind, FitMode, ImageSource, PageGeometry, Rect, RenderValue, RenderValues, Rgb,
};

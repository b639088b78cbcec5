// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzwerk-layout — pure layout engines for the Satzwerk template filler.
// Everything here is geometry and measurement; no PDF objects are touched.

pub mod image;
pub mod metrics;
pub mod table;
pub mod text;

pub use image::{PlacedImage, decode_image, layout_image};
pub use metrics::measure_text;
pub use table::{PlacedRow, layout_table};
pub use text::{FittedLine, layout_text, truncate_to_width};

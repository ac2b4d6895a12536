//! Station icon rendering.
//!
//! Implements the symbol icons requested by the map engine:
//! - Doughnut charts of mechanical bikes, e-bikes and free docks
//! - Flat single-metric discs
//! - The "station not functional" glyph
//! - Seven-segment numeric labels
//! - PNG encoding of the resulting bitmaps

pub mod glyphs;
pub mod icons;
pub mod pie;
pub mod png;
pub mod style;
pub mod synth;

pub use icons::{render_icon, IconBitmap};
pub use pie::{pie_slices, PieSlice};
pub use style::{IconStyle, Rgba, StyleError};
pub use synth::{EncodedIcon, IconSynthesizer, ResolvedIcon};

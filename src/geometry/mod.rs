//! Time window, region of interest and crop/scale geometry of a snippet.

pub mod interval;
pub mod roi;
pub mod scale;

pub use interval::padded_interval;
pub use roi::{Roi, compute_roi, padded_roi};
pub use scale::{closest_divisible, crop_and_scale, scaled_size};

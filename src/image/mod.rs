//! Frame buffers consumed and produced by the inpainting pipeline.
//!
//! - [`ImageU8`]: borrowed 8-bit view, used for the per-pixel confidence map.
//! - [`DepthImage`]: owned `i16` depth in millimetres, inpainted in place.
//! - [`RgbImage`]: owned 8-bit RGB color image, inpainted in place.
//!
//! All buffers are row-major. Depth and confidence share dimensions; the
//! color image may have a different resolution (see
//! [`ColorMapping`](crate::inpaint::ColorMapping)).
pub mod depth;
pub mod io;
pub mod rgb;
pub mod traits;
pub mod u8;
pub mod yuv;

pub use self::depth::DepthImage;
pub use self::rgb::{Rgb, RgbImage};
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;

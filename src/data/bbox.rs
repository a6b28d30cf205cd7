//! Bounding box types.
//!
//! Stored annotations describe boxes as a top-left corner plus an extent
//! (XYWH). YOLO wants the center form instead, so both shapes exist here,
//! each tagged with the coordinate space it lives in.

use std::marker::PhantomData;

use super::space::{Normalized, Pixel};

/// An axis-aligned box as top-left corner plus width/height.
///
/// Construction does not check that the extent is positive; exporters pass
/// stored values through as-is.
#[derive(Clone, Copy, PartialEq)]
pub struct BBox<TSpace> {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBox<TSpace> {
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            _space: PhantomData,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn xmax(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn ymax(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the box as `[x, y, width, height]`.
    #[inline]
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Converts to center form: `(x + width/2, y + height/2, width, height)`.
    pub fn to_center(&self) -> CenterBox<TSpace> {
        CenterBox {
            cx: self.x + self.width / 2.0,
            cy: self.y + self.height / 2.0,
            width: self.width,
            height: self.height,
            _space: PhantomData,
        }
    }
}

impl<TSpace> std::fmt::Debug for BBox<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBox")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// A box described by its center point and extent.
#[derive(Clone, Copy, PartialEq)]
pub struct CenterBox<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> std::fmt::Debug for CenterBox<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CenterBox")
            .field("cx", &self.cx)
            .field("cy", &self.cy)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl CenterBox<Pixel> {
    /// Divides every field by the image size.
    ///
    /// Returns `None` when either dimension is unknown or zero, so callers
    /// never divide by zero.
    pub fn normalize(
        &self,
        image_width: Option<u32>,
        image_height: Option<u32>,
    ) -> Option<CenterBox<Normalized>> {
        let w = f64::from(image_width.filter(|w| *w > 0)?);
        let h = f64::from(image_height.filter(|h| *h > 0)?);

        Some(CenterBox {
            cx: self.cx / w,
            cy: self.cy / h,
            width: self.width / w,
            height: self.height / h,
            _space: PhantomData,
        })
    }
}

impl CenterBox<Normalized> {
    /// Returns `(cx, cy, width, height)`.
    #[inline]
    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.cx, self.cy, self.width, self.height)
    }
}

//! Wire records for drawables.
//!
//! A record is the JSON form of one drawable in one frame: geometry in
//! pixel space, stroke widths normalized, colors as hex strings, pixel
//! buffers base64-encoded. Records are produced by the capture crate and
//! consumed by the replay crate; this module only defines the format.
//!
//! Decoding is lenient about the styling extensions (`line_cap`,
//! `line_join`, gradient and background-stroke fields): older documents
//! omit them and they fall back to defaults. The `type` tag is strict;
//! an unknown tag is a fatal decode error.

use serde::{Deserialize, Serialize};

use crate::camera::Point2;
use crate::style::{Color, LineCap, LineJoin};

/// One drawable as it appears in a frame record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawableRecord {
    PathShape(PathShapeRecord),
    RasterImage(RasterImageRecord),
    PointCloud(PointCloudRecord),
}

impl DrawableRecord {
    /// Wire name of the variant, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PathShape(_) => "path_shape",
            Self::RasterImage(_) => "raster_image",
            Self::PointCloud(_) => "point_cloud",
        }
    }
}

/// Wire form of a bezier path shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShapeRecord {
    /// Control points in pixel space.
    pub points: Vec<Point2>,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_opacity: f64,
    /// Normalized stroke width.
    pub stroke_width: f64,
    #[serde(default)]
    pub line_cap: LineCap,
    #[serde(default)]
    pub line_join: LineJoin,
    /// Gradient endpoints in pixel space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_points: Option<[Point2; 2]>,
    #[serde(default)]
    pub background_stroke_color: Color,
    /// Normalized background-stroke width.
    #[serde(default)]
    pub background_stroke_width: f64,
}

/// Wire form of a bitmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterImageRecord {
    /// Base64-encoded RGBA bytes, row-major.
    pub data: String,
    /// Buffer dimensions, carried so `data` decodes losslessly.
    pub rows: u32,
    pub cols: u32,
    /// Displayed size in model units (deliberately not pixel space).
    pub width: f64,
    pub height: f64,
    /// Pixel-space position of the top-left corner.
    pub top_left: Point2,
}

/// Wire form of a point set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudRecord {
    /// Points in pixel space.
    pub points: Vec<Point2>,
    pub color: Color,
    /// Normalized point diameter.
    pub stroke_width: f64,
}

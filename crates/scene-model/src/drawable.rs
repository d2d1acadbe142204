//! Scene-side drawable model.
//!
//! These are the in-memory shapes a scene engine hands to the capture
//! pipeline and the replay engine rebuilds from a document. Geometry is in
//! model space; the pixel-space conversion happens when a drawable is
//! turned into a wire record, not here.

use crate::camera::Point3;
use crate::frame::ObjectId;
use crate::style::{Color, LineCap, LineJoin};

/// A filled-and-stroked bezier path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    /// Flattened cubic bezier control points, in model space.
    pub points: Vec<Point3>,
    pub fill_color: Color,
    /// Fill opacity `[0.0, 1.0]`.
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_opacity: f64,
    /// Stroke width in native model units.
    pub stroke_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    /// Endpoints of a linear color gradient, when the shape has one.
    pub gradient_points: Option<[Point3; 2]>,
    /// Stroke drawn behind the shape to separate it from what it overlaps.
    pub background_stroke_color: Color,
    pub background_stroke_width: f64,
}

impl Default for PathShape {
    fn default() -> Self {
        Self {
            points: vec![],
            fill_color: Color::WHITE,
            fill_opacity: 0.0,
            stroke_color: Color::WHITE,
            stroke_opacity: 1.0,
            stroke_width: 4.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            gradient_points: None,
            background_stroke_color: Color::BLACK,
            background_stroke_width: 0.0,
        }
    }
}

/// A bitmap placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Source pixels.
    pub pixels: PixelBuffer,
    /// Displayed width in model units.
    pub width: f64,
    /// Displayed height in model units.
    pub height: f64,
    /// Model-space position of the top-left corner.
    pub top_left: Point3,
}

/// A row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub rows: u32,
    pub cols: u32,
    /// RGBA bytes, row-major; `rows * cols * 4` entries.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Number of bytes a buffer of these dimensions must hold.
    pub fn expected_len(rows: u32, cols: u32) -> usize {
        rows as usize * cols as usize * 4
    }

    /// Whether `data` matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == Self::expected_len(self.rows, self.cols)
    }

    /// A single-color buffer of the given dimensions.
    pub fn solid(rows: u32, cols: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(Self::expected_len(rows, cols));
        for _ in 0..rows as usize * cols as usize {
            data.extend_from_slice(&rgba);
        }
        Self { rows, cols, data }
    }
}

/// A set of styled points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Point3>,
    pub color: Color,
    /// Point diameter in native model units.
    pub stroke_width: f64,
}

/// Any object the capture pipeline can serialize.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Path(PathShape),
    Image(RasterImage),
    Points(PointCloud),
}

impl Drawable {
    /// Wire name of the variant, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "path_shape",
            Self::Image(_) => "raster_image",
            Self::Points(_) => "point_cloud",
        }
    }
}

/// A node in the scene tree handed to the snapshotter.
///
/// Groups carry no geometry of their own; capture flattens them and
/// records leaves only.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// A drawable with its session identity.
    Leaf { id: ObjectId, drawable: Drawable },
    /// A container of child nodes.
    Group { children: Vec<SceneNode> },
}

impl SceneNode {
    pub fn leaf(id: ObjectId, drawable: Drawable) -> Self {
        Self::Leaf { id, drawable }
    }

    pub fn group(children: Vec<SceneNode>) -> Self {
        Self::Group { children }
    }

    /// Depth-first collection of the leaves of this subtree.
    pub fn leaves(&self) -> Vec<(ObjectId, &Drawable)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(ObjectId, &'a Drawable)>) {
        match self {
            SceneNode::Leaf { id, drawable } => out.push((*id, drawable)),
            SceneNode::Group { children } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

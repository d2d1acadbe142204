//! Scene flattening and wire-record construction.
//!
//! One snapshot turns a scene tree into a [`FrameRecord`]: groups are
//! flattened away, geometry moves into pixel space, stroke widths are
//! normalized, and pixel buffers are base64-encoded. The inverse lives in
//! the replay crate.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use scenecast_common::error::{ScenecastError, ScenecastResult};
use scenecast_scene_model::{
    CameraState, Drawable, DrawableRecord, FrameRecord, PathShape, PathShapeRecord, PointCloud,
    PointCloudRecord, RasterImage, RasterImageRecord, SceneNode,
};

/// Snapshot a scene into a frame record at the given simulated time.
///
/// Path shapes with no points yet (typically mid-construction) are
/// silently excluded; they would carry no drawable geometry.
pub fn snapshot_scene(
    nodes: &[SceneNode],
    camera: &CameraState,
    time: f64,
) -> ScenecastResult<FrameRecord> {
    let mut frame = FrameRecord::new(time, camera.background_rgba());
    for node in nodes {
        for (id, drawable) in node.leaves() {
            if let Drawable::Path(path) = drawable {
                if path.points.is_empty() {
                    tracing::trace!(%id, "Skipping path shape with no points");
                    continue;
                }
            }
            frame.objects.insert(id, drawable_record(drawable, camera)?);
        }
    }
    Ok(frame)
}

/// Convert one drawable to its wire record under the given camera.
pub fn drawable_record(
    drawable: &Drawable,
    camera: &CameraState,
) -> ScenecastResult<DrawableRecord> {
    Ok(match drawable {
        Drawable::Path(path) => DrawableRecord::PathShape(path_record(path, camera)),
        Drawable::Image(image) => DrawableRecord::RasterImage(image_record(image, camera)?),
        Drawable::Points(cloud) => DrawableRecord::PointCloud(cloud_record(cloud, camera)),
    })
}

fn path_record(path: &PathShape, camera: &CameraState) -> PathShapeRecord {
    PathShapeRecord {
        points: camera.model_to_pixel(&path.points),
        fill_color: path.fill_color,
        fill_opacity: path.fill_opacity,
        stroke_color: path.stroke_color,
        stroke_opacity: path.stroke_opacity,
        stroke_width: camera.normalize_stroke_width(path.stroke_width),
        line_cap: path.line_cap,
        line_join: path.line_join,
        gradient_points: path
            .gradient_points
            .map(|[a, b]| [camera.point_to_pixel(a), camera.point_to_pixel(b)]),
        background_stroke_color: path.background_stroke_color,
        background_stroke_width: camera.normalize_stroke_width(path.background_stroke_width),
    }
}

fn image_record(image: &RasterImage, camera: &CameraState) -> ScenecastResult<RasterImageRecord> {
    if !image.pixels.is_consistent() {
        return Err(ScenecastError::capture(format!(
            "Pixel buffer is {} bytes but {}x{} RGBA needs {}",
            image.pixels.data.len(),
            image.pixels.rows,
            image.pixels.cols,
            scenecast_scene_model::PixelBuffer::expected_len(image.pixels.rows, image.pixels.cols),
        )));
    }
    Ok(RasterImageRecord {
        data: BASE64.encode(&image.pixels.data),
        rows: image.pixels.rows,
        cols: image.pixels.cols,
        // Displayed size stays in model units; only placement converts.
        width: image.width,
        height: image.height,
        top_left: camera.point_to_pixel(image.top_left),
    })
}

fn cloud_record(cloud: &PointCloud, camera: &CameraState) -> PointCloudRecord {
    PointCloudRecord {
        points: camera.model_to_pixel(&cloud.points),
        color: cloud.color,
        stroke_width: camera.normalize_stroke_width(cloud.stroke_width),
    }
}

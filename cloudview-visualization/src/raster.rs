//! CPU rasterization of viewer frames
//!
//! Turns the output of the controllers into pixels: resample + affine
//! placement for images, and projected square splats for point clouds.

use crate::camera::{Frustum, PointDraw, ViewTransform};
use cloudview_core::Affine2D;
use image::imageops::{self, FilterType};
use image::{GenericImageView, Rgba, RgbaImage};
use nalgebra::{Matrix2, Point2, Vector2, Vector4};

pub fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Cut the `(x, y, width, height)` rectangle out of `source` and resample
/// it to `size` pixels
pub fn resample_region(source: &RgbaImage, rect: (u32, u32, u32, u32), size: (u32, u32)) -> RgbaImage {
    let (x, y, width, height) = rect;
    let region = imageops::crop_imm(source, x, y, width, height);
    if region.dimensions() == size {
        return region.to_image();
    }
    imageops::resize(&*region, size.0.max(1), size.1.max(1), FilterType::Triangle)
}

/// Place `image` on a `canvas`-sized frame through `transform`.
///
/// Canvas pixels that map outside `image` are filled with `background`.
pub fn warp_affine(
    image: &RgbaImage,
    transform: &Affine2D,
    canvas: (u32, u32),
    background: Rgba<u8>,
) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(canvas.0, canvas.1, background);

    if transform.is_translation() {
        let origin = transform.apply(&Point2::origin());
        imageops::replace(&mut frame, image, origin.x.round() as i64, origin.y.round() as i64);
        return frame;
    }

    let m = &transform.matrix;
    let linear = Matrix2::new(m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
    let Some(inverse) = linear.try_inverse() else {
        return frame;
    };
    let offset = transform.offset();

    for (x, y, pixel) in frame.enumerate_pixels_mut() {
        let dst = Vector2::new(x as f32 + 0.5, y as f32 + 0.5) - offset;
        let src = inverse * dst;
        let (sx, sy) = (src.x.floor(), src.y.floor());
        if sx >= 0.0 && sy >= 0.0 && (sx as u32) < image.width() && (sy as u32) < image.height() {
            *pixel = *image.get_pixel(sx as u32, sy as u32);
        }
    }
    frame
}

/// Fill a disc of `radius` pixels centred on `center`
pub fn draw_marker(image: &mut RgbaImage, center: Point2<f32>, radius: u32, color: Rgba<u8>) {
    let r = radius as i64;
    let (cx, cy) = (center.x.round() as i64, center.y.round() as i64);

    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && x < image.width() as i64 && y < image.height() as i64 {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Grey card with a light grid, shown when no image is given
pub fn test_card(width: u32, height: u32, background: [u8; 3]) -> RgbaImage {
    let grid = rgba([
        background[0].saturating_add(40),
        background[1].saturating_add(40),
        background[2].saturating_add(40),
    ]);
    RgbaImage::from_fn(width, height, |x, y| {
        if x % 50 == 0 || y % 50 == 0 {
            grid
        } else {
            rgba(background)
        }
    })
}

/// Project `draws` and splat each as a square of `size` pixels.
///
/// Points behind the camera or outside the near/far range are dropped, as
/// are points whose size is not positive. A depth buffer keeps the nearest
/// splat per pixel.
pub fn render_points(
    draws: &[PointDraw],
    frustum: &Frustum,
    view: &ViewTransform,
    size: (u32, u32),
    background: Rgba<u8>,
) -> RgbaImage {
    let (width, height) = size;
    let mut frame = RgbaImage::from_pixel(width, height, background);
    let mut depth = vec![f32::INFINITY; (width as usize) * (height as usize)];
    let mvp = frustum.to_matrix() * view.matrix();

    for draw in draws {
        if !(draw.size > 0.0) {
            continue;
        }

        let p = draw.position;
        let clip = mvp * Vector4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= 0.0 {
            continue;
        }
        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            continue;
        }

        let sx = (ndc.x + 1.0) * 0.5 * width as f32;
        let sy = (1.0 - ndc.y) * 0.5 * height as f32;
        let side = draw.size.round().max(1.0).min(width.max(height) as f32);
        let half = side / 2.0;

        let x0 = (sx - half).floor().max(0.0) as i64;
        let y0 = (sy - half).floor().max(0.0) as i64;
        let x1 = ((sx + half).ceil() as i64).min(width as i64);
        let y1 = ((sy + half).ceil() as i64).min(height as i64);
        let color = rgba(draw.color);

        for y in y0..y1 {
            for x in x0..x1 {
                let index = y as usize * width as usize + x as usize;
                if ndc.z < depth[index] {
                    depth[index] = ndc.z;
                    frame.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use cloudview_core::{IntensityPoint3f, IntensityPointCloud, Point3f};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_translation_places_image_origin() {
        let mut source = RgbaImage::from_pixel(10, 10, WHITE);
        source.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

        let frame = warp_affine(&source, &Affine2D::translation(5.0, 7.0), (40, 40), BLACK);
        assert_eq!(*frame.get_pixel(5, 7), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(4, 7), BLACK);
        assert_eq!(*frame.get_pixel(5, 6), BLACK);
        assert_eq!(*frame.get_pixel(14, 16), WHITE);
        assert_eq!(*frame.get_pixel(15, 17), BLACK);
    }

    #[test]
    fn test_negative_translation_clips() {
        let source = RgbaImage::from_pixel(10, 10, WHITE);
        let frame = warp_affine(&source, &Affine2D::translation(-5.0, -5.0), (20, 20), BLACK);
        assert_eq!(*frame.get_pixel(0, 0), WHITE);
        assert_eq!(*frame.get_pixel(4, 4), WHITE);
        assert_eq!(*frame.get_pixel(5, 5), BLACK);
    }

    #[test]
    fn test_general_affine_uses_inverse_mapping() {
        let mut source = RgbaImage::from_pixel(4, 4, WHITE);
        source.put_pixel(1, 0, Rgba([0, 255, 0, 255]));

        let mut transform = Affine2D::translation(0.0, 0.0);
        transform.matrix[(0, 0)] = 2.0;
        transform.matrix[(1, 1)] = 2.0;

        let frame = warp_affine(&source, &transform, (8, 8), BLACK);
        assert_eq!(*frame.get_pixel(2, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*frame.get_pixel(3, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(*frame.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_resample_region_changes_size() {
        let source = RgbaImage::from_pixel(100, 50, WHITE);
        assert_eq!(resample_region(&source, (0, 0, 100, 50), (110, 55)).dimensions(), (110, 55));
        assert_eq!(resample_region(&source, (0, 0, 100, 50), (0, 0)).dimensions(), (1, 1));
    }

    #[test]
    fn test_resample_region_crops_before_scaling() {
        let mut source = RgbaImage::from_pixel(100, 100, BLACK);
        source.put_pixel(60, 70, WHITE);

        let cropped = resample_region(&source, (60, 70, 2, 2), (2, 2));
        assert_eq!(cropped.dimensions(), (2, 2));
        assert_eq!(*cropped.get_pixel(0, 0), WHITE);
        assert_eq!(*cropped.get_pixel(1, 1), BLACK);

        // the crop is clamped to the source, so a region past its edge is smaller
        let edge = resample_region(&source, (98, 98, 10, 10), (2, 2));
        assert_eq!(edge.dimensions(), (2, 2));
    }

    #[test]
    fn test_marker_is_clipped_at_edges() {
        let mut image = RgbaImage::from_pixel(10, 10, BLACK);
        draw_marker(&mut image, Point2::new(0.0, 0.0), 2, WHITE);
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(2, 0), WHITE);
        assert_eq!(*image.get_pixel(2, 2), BLACK);
    }

    #[test]
    fn test_center_point_lands_in_middle() {
        let cloud: IntensityPointCloud = vec![IntensityPoint3f::new(10.0, 10.0, 10.0, 300.0)]
            .into_iter()
            .collect();
        let camera = OrbitCamera::for_cloud(Default::default(), &cloud);
        let (frustum, view) = camera.build_view_and_projection(1.0);
        let draws = OrbitCamera::point_draws(&cloud, [255, 255, 255]);

        let frame = render_points(&draws, &frustum, &view, (101, 101), BLACK);
        assert_eq!(*frame.get_pixel(50, 50), WHITE);
        assert_eq!(*frame.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_non_positive_and_huge_sizes_do_not_panic() {
        let draws = [
            PointDraw { position: Point3f::origin(), size: 0.0, color: [255, 255, 255] },
            PointDraw { position: Point3f::origin(), size: -3.0, color: [255, 255, 255] },
            PointDraw { position: Point3f::origin(), size: f32::NAN, color: [255, 255, 255] },
        ];
        let camera = OrbitCamera::default();
        let (frustum, view) = camera.build_view_and_projection(1.0);
        let frame = render_points(&draws, &frustum, &view, (32, 32), BLACK);
        assert!(frame.pixels().all(|p| *p == BLACK));

        let huge = [PointDraw { position: Point3f::origin(), size: 1.0e9, color: [255, 255, 255] }];
        let frame = render_points(&huge, &frustum, &view, (32, 32), BLACK);
        assert!(frame.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_points_behind_camera_are_dropped() {
        let draws = [PointDraw {
            position: Point3f::new(0.0, 0.0, 1000.0),
            size: 5.0,
            color: [255, 255, 255],
        }];
        let camera = OrbitCamera::default();
        let (frustum, view) = camera.build_view_and_projection(1.0);
        let frame = render_points(&draws, &frustum, &view, (32, 32), BLACK);
        assert!(frame.pixels().all(|p| *p == BLACK));
    }
}

use image::{Rgba, RgbaImage};
use nalgebra::Vector2;
use std::path::Path;

use crate::core::draw_target::DrawTarget;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// RGBA raster surface. Pixels with zero alpha are treated as "no paint" when
/// compositing, which is how the trail and pose layers stack on top of each
/// other.
#[derive(Clone, Debug)]
pub struct Canvas {
    buffer: RgbaImage,
}

impl Canvas {
    pub fn new(resolution: &Vector2<u32>, fill: Rgba<u8>) -> Canvas {
        Canvas {
            buffer: RgbaImage::from_pixel(resolution[0], resolution[1], fill),
        }
    }

    pub fn transparent(resolution: &Vector2<u32>) -> Canvas {
        Canvas::new(resolution, TRANSPARENT)
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.buffer.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Alpha-blends this canvas over `dest`. Fully transparent pixels leave
    /// `dest` untouched and fully opaque ones replace it.
    pub fn composite_onto(&self, dest: &mut Canvas) {
        debug_assert_eq!(self.buffer.dimensions(), dest.buffer.dimensions());
        for (src, dst) in self.buffer.pixels().zip(dest.buffer.pixels_mut()) {
            match src[3] {
                0 => {}
                255 => *dst = *src,
                alpha => *dst = blend(src, dst, alpha),
            }
        }
    }

    /**
     * Copies the canvas into an RGBA screen buffer of the same resolution,
     * such as the frame of a `pixels::Pixels` surface.
     */
    pub fn write_rgba_frame(&self, screen: &mut [u8]) {
        debug_assert_eq!(screen.len(), self.buffer.as_raw().len());
        screen.copy_from_slice(self.buffer.as_raw());
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }

    fn put_pixel_checked(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.buffer.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Paints a small disc of the given diameter around a pixel; a diameter
    /// of one paints just that pixel.
    fn stamp(&mut self, x: i64, y: i64, diameter: u32, color: Rgba<u8>) {
        if diameter <= 1 {
            self.put_pixel_checked(x, y, color);
            return;
        }
        let radius = diameter as f64 / 2.0;
        let reach = radius.ceil() as i64;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f64) <= radius * radius {
                    self.put_pixel_checked(x + dx, y + dy, color);
                }
            }
        }
    }
}

fn blend(src: &Rgba<u8>, dst: &Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = alpha as u16;
    let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * (255 - a)) / 255) as u8;
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        dst[3].max(alpha),
    ])
}

/// Liang-Barsky clip of the segment `p0 -> p1` against the box
/// `[lower, upper]`. Returns `None` when nothing of the segment is inside.
fn clip_segment(
    p0: &Vector2<f64>,
    p1: &Vector2<f64>,
    lower: &Vector2<f64>,
    upper: &Vector2<f64>,
) -> Option<(Vector2<f64>, Vector2<f64>)> {
    let delta = p1 - p0;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    for axis in 0..2 {
        let checks = [
            (-delta[axis], p0[axis] - lower[axis]),
            (delta[axis], upper[axis] - p0[axis]),
        ];
        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t_enter = t_enter.max(t);
                } else {
                    t_exit = t_exit.min(t);
                }
            }
        }
    }
    if t_enter > t_exit {
        return None;
    }
    // Untouched end points are returned exactly, not re-derived from `t`.
    let start = if t_enter > 0.0 { p0 + t_enter * delta } else { *p0 };
    let end = if t_exit < 1.0 { p0 + t_exit * delta } else { *p1 };
    Some((start, end))
}

impl DrawTarget for Canvas {
    fn resolution(&self) -> Vector2<u32> {
        Vector2::new(self.width(), self.height())
    }

    fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = color;
        }
    }

    /// Bresenham's algorithm, with each point stamped at the line width.
    fn draw_line(&mut self, from: &Vector2<f64>, to: &Vector2<f64>, color: Rgba<u8>, width: u32) {
        if !(from.iter().chain(to.iter()).all(|x| x.is_finite())) {
            return;
        }
        let margin = width as f64;
        let lower = Vector2::new(-margin, -margin);
        let upper = Vector2::new(self.width() as f64 + margin, self.height() as f64 + margin);
        let (from, to) = match clip_segment(from, to, &lower, &upper) {
            Some(segment) => segment,
            None => return,
        };
        if !(from.iter().chain(to.iter()).all(|x| x.is_finite())) {
            return; // the span itself overflowed
        }

        let (mut x0, mut y0) = (from[0].round() as i64, from[1].round() as i64);
        let (x1, y1) = (to[0].round() as i64, to[1].round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            self.stamp(x0, y0, width, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_circle(&mut self, center: &Vector2<f64>, radius: f64, color: Rgba<u8>) {
        let drawable = center.iter().all(|x| x.is_finite()) && radius.is_finite() && radius > 0.0;
        if !drawable {
            return;
        }
        let x_min = (center[0] - radius).floor().max(0.0);
        let x_max = (center[0] + radius).ceil().min(self.width() as f64 - 1.0);
        let y_min = (center[1] - radius).floor().max(0.0);
        let y_max = (center[1] + radius).ceil().min(self.height() as f64 - 1.0);
        if x_min > x_max || y_min > y_max {
            return;
        }
        for y in (y_min as u32)..=(y_max as u32) {
            for x in (x_min as u32)..=(x_max as u32) {
                let offset = Vector2::new(x as f64, y as f64) - center;
                if offset.norm_squared() <= radius * radius {
                    self.buffer.put_pixel(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn small_canvas() -> Canvas {
        Canvas::transparent(&Vector2::new(20, 10))
    }

    fn painted_count(canvas: &Canvas) -> usize {
        canvas.image().pixels().filter(|p| p[3] != 0).count()
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = small_canvas();
        canvas.draw_line(&Vector2::new(2.0, 3.0), &Vector2::new(7.0, 3.0), RED, 1);
        for x in 2..=7 {
            assert_eq!(canvas.pixel(x, 3), RED);
        }
        assert_eq!(painted_count(&canvas), 6);
    }

    #[test]
    fn test_diagonal_line_end_points() {
        let mut canvas = small_canvas();
        canvas.draw_line(&Vector2::new(0.0, 0.0), &Vector2::new(9.0, 9.0), RED, 1);
        for i in 0..10 {
            assert_eq!(canvas.pixel(i, i), RED);
        }
    }

    #[test]
    fn test_thick_line_is_wider() {
        let mut thin = small_canvas();
        let mut thick = small_canvas();
        let (a, b) = (Vector2::new(3.0, 5.0), Vector2::new(15.0, 5.0));
        thin.draw_line(&a, &b, RED, 1);
        thick.draw_line(&a, &b, RED, 5);
        assert!(painted_count(&thick) > 3 * painted_count(&thin));
        assert_eq!(thick.pixel(9, 7), RED);
    }

    #[test]
    fn test_non_finite_primitives_are_dropped() {
        let mut canvas = small_canvas();
        canvas.draw_line(&Vector2::new(f64::NAN, 1.0), &Vector2::new(5.0, 5.0), RED, 2);
        canvas.draw_line(&Vector2::new(1.0, 1.0), &Vector2::new(f64::INFINITY, 5.0), RED, 2);
        canvas.fill_circle(&Vector2::new(f64::NAN, 3.0), 4.0, RED);
        assert_eq!(painted_count(&canvas), 0);
    }

    #[test]
    fn test_huge_line_is_clipped() {
        let mut canvas = small_canvas();
        canvas.draw_line(&Vector2::new(-1e9, 4.0), &Vector2::new(1e9, 4.0), RED, 1);
        for x in 0..20 {
            assert_eq!(canvas.pixel(x, 4), RED);
        }
        assert_eq!(painted_count(&canvas), 20);
    }

    #[test]
    fn test_line_outside_canvas_draws_nothing() {
        let mut canvas = small_canvas();
        canvas.draw_line(&Vector2::new(-50.0, -50.0), &Vector2::new(-30.0, -40.0), RED, 3);
        assert_eq!(painted_count(&canvas), 0);
    }

    #[test]
    fn test_fill_circle() {
        let mut canvas = small_canvas();
        canvas.fill_circle(&Vector2::new(10.0, 5.0), 2.0, BLUE);
        assert_eq!(canvas.pixel(10, 5), BLUE);
        assert_eq!(canvas.pixel(12, 5), BLUE);
        assert_eq!(canvas.pixel(10, 3), BLUE);
        assert_eq!(canvas.pixel(12, 7), TRANSPARENT);
        // Radius 2 covers the 13 lattice points within distance 2.
        assert_eq!(painted_count(&canvas), 13);
    }

    #[test]
    fn test_circle_partially_off_canvas() {
        let mut canvas = small_canvas();
        canvas.fill_circle(&Vector2::new(0.0, 0.0), 1.0, BLUE);
        assert_eq!(painted_count(&canvas), 3);
    }

    #[test]
    fn test_composite_skips_transparent_pixels() {
        let resolution = Vector2::new(4, 4);
        let mut background = Canvas::new(&resolution, BLUE);
        let mut layer = Canvas::transparent(&resolution);
        layer.draw_line(&Vector2::new(0.0, 0.0), &Vector2::new(3.0, 0.0), RED, 1);
        layer.composite_onto(&mut background);
        assert_eq!(background.pixel(2, 0), RED);
        assert_eq!(background.pixel(2, 1), BLUE);
    }

    #[test]
    fn test_composite_blends_partial_alpha() {
        let resolution = Vector2::new(1, 1);
        let mut background = Canvas::new(&resolution, Rgba([0, 0, 0, 255]));
        let layer = Canvas::new(&resolution, Rgba([255, 255, 255, 51]));
        layer.composite_onto(&mut background);
        assert_eq!(background.pixel(0, 0), Rgba([51, 51, 51, 255]));
    }

    #[test]
    fn test_clear_and_frame_copy() {
        let mut canvas = Canvas::transparent(&Vector2::new(2, 1));
        canvas.fill_circle(&Vector2::new(0.0, 0.0), 0.5, RED);
        let mut frame = vec![7u8; 8];
        canvas.write_rgba_frame(&mut frame);
        assert_eq!(frame, vec![255, 0, 0, 255, 0, 0, 0, 0]);

        canvas.clear(BLUE);
        canvas.write_rgba_frame(&mut frame);
        assert_eq!(frame, vec![0, 0, 255, 255, 0, 0, 255, 255]);
    }
}

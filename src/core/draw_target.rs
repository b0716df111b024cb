use image::Rgba;
use nalgebra::Vector2;

/// The drawing primitives the simulation needs from a 2D surface. The
/// renderer only ever talks to this trait, so it can draw into an off-screen
/// canvas, the window's frame buffer, or a recorder in tests.
pub trait DrawTarget {
    /// Size of the surface in pixels, `[width, height]`.
    fn resolution(&self) -> Vector2<u32>;

    /// Fills every pixel with a single color.
    ///
    /// # Parameters
    ///
    /// - `color`: Use a zero alpha channel for a fully transparent surface.
    fn clear(&mut self, color: Rgba<u8>);

    /// Draws a straight segment between two points in screen space.
    ///
    /// # Parameters
    ///
    /// - `from`, `to`: End points in pixels. Segments with a non-finite end point
    ///   are dropped rather than drawn.
    /// - `color`: Line color.
    /// - `width`: Line thickness in pixels, at least 1.
    fn draw_line(&mut self, from: &Vector2<f64>, to: &Vector2<f64>, color: Rgba<u8>, width: u32);

    /// Draws a filled disc.
    ///
    /// # Parameters
    ///
    /// - `center`: Disc center in pixels. Non-finite centers are dropped.
    /// - `radius`: Radius in pixels.
    /// - `color`: Fill color.
    fn fill_circle(&mut self, center: &Vector2<f64>, radius: f64, color: Rgba<u8>);
}

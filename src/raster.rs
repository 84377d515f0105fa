//! Shape rasterization on top of window fills and single-pixel writes.
//!
//! Everything here is written to minimise window programming on the bus:
//! straight runs become one `fill_rect`, filled shapes are built from
//! vertical or horizontal spans.

use core::f32::consts::PI;
use core::ops::BitOr;

use heapless::Vec;

/// How out-of-range coordinates are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WrapOptions(u8);

impl WrapOptions {
    pub const NONE: Self = Self(0x00);
    /// Lines are drawn pixel by pixel so each point can wrap.
    pub const WRAP: Self = Self(0x01);
    pub const WRAP_H: Self = Self(0x02);
    pub const WRAP_V: Self = Self(0x04);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x07)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for WrapOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The minimum a target has to offer the rasterizer.
pub trait Canvas {
    type Error;

    /// Active (rotated) width and height.
    fn size(&self) -> (i32, i32);

    fn wrap(&self) -> WrapOptions;

    /// Write one pixel that is known to be on screen.
    fn write_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), Self::Error>;

    /// Solid fill, clipped to the active area.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16)
        -> Result<(), Self::Error>;

    /// Stream big-endian RGB565 bytes into the `w` x `h` window at `(x, y)`.
    fn blit_buffer(&mut self, buf: &[u8], x: u16, y: u16, w: u16, h: u16)
        -> Result<(), Self::Error>;
}

pub const MAX_SIDES: usize = 32;
const MAX_POINTS: usize = 2 * MAX_SIDES + 2;

pub type PolygonPoints = Vec<(i32, i32), MAX_POINTS>;

/// Outline of a regular polygon with "bumped" edge midpoints.
///
/// Returns `2 * (sides + 1)` points: each vertex followed by the midpoint of
/// the edge leaving it, pushed away from (`bump > 1`) or pulled towards
/// (`bump < 1`) the centre. The last pair repeats the first so the outline
/// closes. `sides` is capped at [`MAX_SIDES`].
///
/// Without an explicit `angle_offset` even polygons sit on a flat edge and
/// odd ones point up.
pub fn polygon_points(
    cx: i32,
    cy: i32,
    r: i32,
    sides: usize,
    bump: f32,
    angle_offset: Option<f32>,
) -> PolygonPoints {
    let mut points = PolygonPoints::new();
    let n = sides.min(MAX_SIDES);
    if n == 0 {
        return points;
    }

    let step = 360.0 / n as f32;
    let offset = angle_offset.unwrap_or(if n % 2 == 0 { step / 2.0 } else { 90.0 });
    let (cx, cy, r) = (cx as f32, cy as f32, r as f32);
    let vertex = |deg: f32| {
        let rad = PI / 180.0 * (deg - offset);
        (cx + r * libm::cosf(rad), cy + r * libm::sinf(rad))
    };

    for i in 0..=n {
        let (vx, vy) = vertex(step * i as f32);
        let (nx, ny) = vertex(step * (i + 1) as f32);
        let (mx, my) = (vx + (nx - vx) / 2.0, vy + (ny - vy) / 2.0);
        let (bx, by) = (cx + (mx - cx) * bump, cy + (my - cy) * bump);

        // n <= MAX_SIDES, so both pushes fit.
        points.push((round(vx), round(vy))).ok();
        points.push((round(bx), round(by))).ok();
    }

    points
}

fn round(v: f32) -> i32 {
    libm::roundf(v) as i32
}

pub struct Rasterizer<'a, C: ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> Rasterizer<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        Self { canvas }
    }

    pub fn canvas(&mut self) -> &mut C {
        self.canvas
    }

    /// Plot one pixel, wrapping first and dropping anything still off screen.
    pub fn pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), C::Error> {
        let (width, height) = self.canvas.size();
        let wrap = self.canvas.wrap();

        let x = if wrap.contains(WrapOptions::WRAP_H) && width > 0 {
            x.rem_euclid(width)
        } else {
            x
        };
        let y = if wrap.contains(WrapOptions::WRAP_V) && height > 0 {
            y.rem_euclid(height)
        } else {
            y
        };

        if (0..width).contains(&x) && (0..height).contains(&y) {
            self.canvas.write_pixel(x as u16, y as u16, color)?;
        }
        Ok(())
    }

    pub fn hline(&mut self, x: i32, y: i32, len: i32, color: u16) -> Result<(), C::Error> {
        if self.canvas.wrap().is_empty() {
            return self.canvas.fill_rect(x, y, len, 1, color);
        }
        for i in 0..len {
            self.pixel(x + i, y, color)?;
        }
        Ok(())
    }

    pub fn vline(&mut self, x: i32, y: i32, len: i32, color: u16) -> Result<(), C::Error> {
        if self.canvas.wrap().is_empty() {
            return self.canvas.fill_rect(x, y, 1, len, color);
        }
        for i in 0..len {
            self.pixel(x, y + i, color)?;
        }
        Ok(())
    }

    /// Bresenham, emitting each run along the major axis as one span.
    pub fn line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u16,
    ) -> Result<(), C::Error> {
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let (mut x0, mut y0, mut x1, mut y1) = if steep {
            (y0, x0, y1, x1)
        } else {
            (x0, y0, x1, y1)
        };
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut start = x0;
        let mut len = 0;

        for x in x0..=x1 {
            len += 1;
            err -= dy;
            if err < 0 {
                self.run(steep, start, y0, len, color)?;
                len = 0;
                y0 += ystep;
                start = x + 1;
                err += dx;
            }
        }
        if len > 0 {
            self.run(steep, start, y0, len, color)?;
        }
        Ok(())
    }

    fn run(
        &mut self,
        steep: bool,
        start: i32,
        across: i32,
        len: i32,
        color: u16,
    ) -> Result<(), C::Error> {
        match (steep, len) {
            (true, 1) => self.pixel(across, start, color),
            (false, 1) => self.pixel(start, across, color),
            (true, _) => self.vline(across, start, len, color),
            (false, _) => self.hline(start, across, len, color),
        }
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), C::Error> {
        self.hline(x, y, w, color)?;
        self.hline(x, y + h - 1, w, color)?;
        self.vline(x, y, h, color)?;
        self.vline(x + w - 1, y, h, color)
    }

    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: u16,
    ) -> Result<(), C::Error> {
        self.canvas.fill_rect(x, y, w, h, color)
    }

    /// Midpoint circle outline.
    pub fn circle(&mut self, xm: i32, ym: i32, r: i32, color: u16) -> Result<(), C::Error> {
        let mut f = 1 - r;
        let mut ddx = 1;
        let mut ddy = -2 * r;
        let mut x = 0;
        let mut y = r;

        for (px, py) in [(xm, ym + r), (xm, ym - r), (xm + r, ym), (xm - r, ym)] {
            self.pixel(px, py, color)?;
        }

        while x < y {
            if f >= 0 {
                y -= 1;
                ddy += 2;
                f += ddy;
            }
            x += 1;
            ddx += 2;
            f += ddx;

            for (px, py) in [
                (xm + x, ym + y),
                (xm - x, ym + y),
                (xm + x, ym - y),
                (xm - x, ym - y),
                (xm + y, ym + x),
                (xm - y, ym + x),
                (xm + y, ym - x),
                (xm - y, ym - x),
            ] {
                self.pixel(px, py, color)?;
            }
        }
        Ok(())
    }

    /// Filled disk from vertical spans, O(r) windows.
    pub fn fill_circle(&mut self, xm: i32, ym: i32, r: i32, color: u16) -> Result<(), C::Error> {
        self.vline(xm, ym - r, 2 * r + 1, color)?;

        let mut f = 1 - r;
        let mut ddx = 1;
        let mut ddy = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddy += 2;
                f += ddy;
            }
            x += 1;
            ddx += 2;
            f += ddx;

            for (px, py, len) in [
                (xm + x, ym - y, 2 * y + 1),
                (xm + y, ym - x, 2 * x + 1),
                (xm - x, ym - y, 2 * y + 1),
                (xm - y, ym - x, 2 * x + 1),
            ] {
                self.vline(px, py, len, color)?;
            }
        }
        Ok(())
    }

    /// Connect consecutive points with lines.
    pub fn polyline(&mut self, points: &[(i32, i32)], color: u16) -> Result<(), C::Error> {
        for pair in points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            self.line(x0, y0, x1, y1, color)?;
        }
        Ok(())
    }

    /// Even-odd scanline fill of a closed point list, then its outline.
    pub fn fill_points(&mut self, points: &[(i32, i32)], color: u16) -> Result<(), C::Error> {
        let (Some(ymin), Some(ymax)) = (
            points.iter().map(|p| p.1).min(),
            points.iter().map(|p| p.1).max(),
        ) else {
            return Ok(());
        };

        for y in ymin..=ymax {
            let mut xs: Vec<i32, MAX_POINTS> = Vec::new();
            for (i, &(ax, ay)) in points.iter().enumerate() {
                let (bx, by) = points[(i + 1) % points.len()];
                if (ay <= y && y < by) || (by <= y && y < ay) {
                    if xs.push(ax + (y - ay) * (bx - ax) / (by - ay)).is_err() {
                        break;
                    }
                }
            }
            xs.sort_unstable();
            for span in xs.chunks_exact(2) {
                self.hline(span[0], y, span[1] - span[0] + 1, color)?;
            }
        }

        self.polyline(points, color)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn polygon(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        sides: usize,
        bump: f32,
        angle_offset: Option<f32>,
        color: u16,
    ) -> Result<(), C::Error> {
        let points = polygon_points(cx, cy, r, sides, bump, angle_offset);
        self.polyline(&points, color)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fill_polygon(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        sides: usize,
        bump: f32,
        angle_offset: Option<f32>,
        color: u16,
    ) -> Result<(), C::Error> {
        let points = polygon_points(cx, cy, r, sides, bump, angle_offset);
        self.fill_points(&points, color)
    }

    /// Ring segment plotted one degree at a time, `width` pixels thick.
    /// Angles are in degrees, clockwise from 3 o'clock.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        width: i32,
        start_deg: i32,
        end_deg: i32,
        color: u16,
    ) -> Result<(), C::Error> {
        for rr in r..r + width {
            for deg in start_deg..end_deg {
                let rad = PI / 180.0 * deg as f32;
                let x = cx as f32 + rr as f32 * libm::cosf(rad);
                let y = cy as f32 + rr as f32 * libm::sinf(rad);
                self.pixel(round(x), round(y), color)?;
            }
        }
        Ok(())
    }

    /// Circular gauge filled clockwise from 12 o'clock.
    #[allow(clippy::too_many_arguments)]
    pub fn progress_bar(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        value: i32,
        min: i32,
        max: i32,
        width: i32,
        color: u16,
        background: u16,
    ) -> Result<(), C::Error> {
        let span = max - min;
        let angle = if span > 0 {
            ((value - min).clamp(0, span) as f32 / span as f32 * 360.0) as i32
        } else {
            0
        };

        self.arc(cx, cy, r, width, angle - 90, 270, background)?;
        self.arc(cx, cy, r, width, -90, angle - 90, color)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    extern crate std;

    use std::collections::BTreeSet;
    use std::vec::Vec;

    use super::{Canvas, WrapOptions};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        Pixel(i32, i32, u16),
        Fill(i32, i32, i32, i32, u16),
        Blit(i32, i32, i32, i32, Vec<u8>),
    }

    pub struct RecordingCanvas {
        pub width: i32,
        pub height: i32,
        pub wrap: WrapOptions,
        pub calls: Vec<Call>,
    }

    impl RecordingCanvas {
        pub fn new(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                wrap: WrapOptions::NONE,
                calls: Vec::new(),
            }
        }

        pub fn pixels(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Pixel(..)))
                .count()
        }

        pub fn fills(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Fill(..)))
                .count()
        }

        /// Every on-screen point touched by a pixel or fill.
        pub fn covered(&self) -> BTreeSet<(i32, i32)> {
            let mut set = BTreeSet::new();
            for call in &self.calls {
                match *call {
                    Call::Pixel(x, y, _) => {
                        set.insert((x, y));
                    }
                    Call::Fill(x, y, w, h, _) => {
                        for px in x..x + w {
                            for py in y..y + h {
                                set.insert((px, py));
                            }
                        }
                    }
                    Call::Blit(..) => {}
                }
            }
            set
        }
    }

    impl Canvas for RecordingCanvas {
        type Error = ();

        fn size(&self) -> (i32, i32) {
            (self.width, self.height)
        }

        fn wrap(&self) -> WrapOptions {
            self.wrap
        }

        fn write_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), ()> {
            self.calls.push(Call::Pixel(x as i32, y as i32, color));
            Ok(())
        }

        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), ()> {
            self.calls.push(Call::Fill(x, y, w, h, color));
            Ok(())
        }

        fn blit_buffer(&mut self, buf: &[u8], x: u16, y: u16, w: u16, h: u16) -> Result<(), ()> {
            self.calls.push(Call::Blit(
                x as i32,
                y as i32,
                w as i32,
                h as i32,
                buf.to_vec(),
            ));
            Ok(())
        }
    }
}

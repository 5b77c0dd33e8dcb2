use std::error::Error;
use std::fmt;

/// A (hue, saturation) pair. Hue in degrees `[0, 360)`, saturation in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub hue: f64,
    pub saturation: f64,
}

impl ColorSample {
    pub const fn new(hue: f64, saturation: f64) -> Self {
        Self { hue, saturation }
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hue {:.0}°, sat {:.0}%", self.hue, self.saturation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Disk the wheel is drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub center: Point,
    pub radius: f64,
}

impl WheelGeometry {
    /// A wheel of the given radius whose bounding box starts at the origin.
    pub fn with_radius(radius: f64) -> Self {
        Self { center: Point::new(radius, radius), radius }
    }

    pub fn point_to_color(&self, point: Point) -> Result<ColorSample, OutOfBounds> {
        point_to_color(point, self.center, self.radius)
    }

    pub fn color_to_point(&self, color: ColorSample) -> Point {
        color_to_point(color, self.center, self.radius)
    }
}

/// The point lies outside the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfBounds {
    pub distance: f64,
    pub radius: f64,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point is {:.1} from center, wheel radius is {:.1}", self.distance, self.radius)
    }
}

impl Error for OutOfBounds {}

// Relative slack so points computed exactly on the rim are not rejected.
const RIM_TOLERANCE: f64 = 1e-9;

/// Wraps any angle in degrees into `[0, 360)`.
#[inline(always)]
pub fn normalize_hue(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

pub fn point_to_color(point: Point, center: Point, radius: f64) -> Result<ColorSample, OutOfBounds> {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let distance = dx.hypot(dy);
    // negated so NaN coordinates or radius fail the check
    if !(radius > 0.0 && distance <= radius * (1.0 + RIM_TOLERANCE)) {
        return Err(OutOfBounds { distance, radius });
    }

    let hue = normalize_hue(dy.atan2(dx).to_degrees());
    let saturation = (100.0 * distance / radius).min(100.0);
    Ok(ColorSample { hue, saturation })
}

pub fn color_to_point(color: ColorSample, center: Point, radius: f64) -> Point {
    let distance = radius * color.saturation / 100.0;
    let angle = color.hue.to_radians();
    Point {
        x: center.x + distance * angle.cos(),
        y: center.y + distance * angle.sin(),
    }
}

/// HSL (degrees, percent, percent) to 8-bit RGB. Used for swatches only.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let h = normalize_hue(h);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

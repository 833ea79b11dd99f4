use std::ops::{Add, AddAssign, Mul, Sub};

use crate::config;

/// Screen-plane point or offset, in virtual pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UNIT_X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const UNIT_Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[cfg(test)]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Rotates about a unit `axis` by `angle` radians (right-handed, Rodrigues).
    pub fn apply_axis_angle(self, axis: Vec3, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * (axis.dot(self) * (1.0 - cos))
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Rotation pair in radians: `x` about the horizontal axis, `y` about the vertical one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angles {
    pub x: f32,
    pub y: f32,
}

impl Angles {
    pub const ZERO: Angles = Angles { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Angles {
    type Output = Angles;

    fn add(self, rhs: Angles) -> Angles {
        Angles::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_byte(r), to_byte(g), to_byte(b))
    }
}

#[derive(Clone, Debug)]
pub struct Word {
    pub text: String,
    pub insertion_index: usize,
    pub base_hue: u16,
    pub position: Vec3,
}

impl Word {
    pub fn new(text: String, insertion_index: usize) -> Self {
        Self {
            text,
            insertion_index,
            base_hue: hue_for(insertion_index),
            position: Vec3::ZERO,
        }
    }
}

pub fn hue_for(insertion_index: usize) -> u16 {
    config::HUE_PALETTE[insertion_index % config::HUE_PALETTE.len()]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloudStats {
    pub distinct_word_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    mod vec2_ops {
        use super::*;

        #[test]
        fn length_squared() {
            assert_eq!(Vec2::new(3.0, 4.0).length_sq(), 25.0);
        }

        #[test]
        fn sub_gives_offset() {
            let d = Vec2::new(5.0, 7.0) - Vec2::new(2.0, 3.0);
            assert_eq!(d, Vec2::new(3.0, 4.0));
        }

        #[test]
        fn add_assign_modifies_in_place() {
            let mut a = Vec2::new(1.0, 2.0);
            a += Vec2::new(3.0, 4.0);
            assert_eq!(a, Vec2::new(4.0, 6.0));
        }

        #[test]
        fn scales_by_scalar() {
            assert_eq!(Vec2::new(2.0, 3.0) * 2.0, Vec2::new(4.0, 6.0));
        }
    }

    mod vec3_basics {
        use super::*;

        #[test]
        fn length_of_pythagorean_triple() {
            assert_eq!(Vec3::new(2.0, 3.0, 6.0).length(), 7.0);
        }

        #[test]
        fn cross_of_axes_is_third_axis() {
            let z = Vec3::UNIT_X.cross(Vec3::UNIT_Y);
            assert_eq!(z, Vec3::new(0.0, 0.0, 1.0));
        }

        #[test]
        fn perpendicular_dot_is_zero() {
            assert_eq!(Vec3::UNIT_X.dot(Vec3::UNIT_Y), 0.0);
        }
    }

    mod apply_axis_angle {
        use super::*;
        use std::f32::consts::FRAC_PI_2;

        #[test]
        fn quarter_turn_about_y_sends_x_to_negative_z() {
            let r = Vec3::UNIT_X.apply_axis_angle(Vec3::UNIT_Y, FRAC_PI_2);
            assert_close(r, Vec3::new(0.0, 0.0, -1.0));
        }

        #[test]
        fn quarter_turn_about_x_sends_y_to_z() {
            let r = Vec3::UNIT_Y.apply_axis_angle(Vec3::UNIT_X, FRAC_PI_2);
            assert_close(r, Vec3::new(0.0, 0.0, 1.0));
        }

        #[test]
        fn vector_on_axis_is_unchanged() {
            let v = Vec3::new(0.0, 5.0, 0.0);
            assert_close(v.apply_axis_angle(Vec3::UNIT_Y, 1.234), v);
        }

        #[test]
        fn preserves_length() {
            let v = Vec3::new(120.0, -80.0, 250.0);
            let r = v.apply_axis_angle(Vec3::UNIT_X, 2.5);
            assert!((r.length() - v.length()).abs() < 1e-3);
        }
    }

    mod hsl {
        use super::*;

        #[test]
        fn pure_red() {
            let c = Hsl { hue: 0.0, saturation: 100.0, lightness: 50.0 };
            assert_eq!(c.to_rgb(), (255, 0, 0));
        }

        #[test]
        fn zero_saturation_is_gray() {
            let c = Hsl { hue: 200.0, saturation: 0.0, lightness: 50.0 };
            assert_eq!(c.to_rgb(), (128, 128, 128));
        }

        #[test]
        fn palette_hue_leans_blue() {
            let (r, g, b) = Hsl { hue: 210.0, saturation: 70.0, lightness: 65.0 }.to_rgb();
            assert!(b > g && g > r);
        }
    }

    mod word {
        use super::*;

        #[test]
        fn hue_cycles_through_palette() {
            let hues: Vec<u16> = (0..6).map(hue_for).collect();
            assert_eq!(hues, vec![190, 200, 210, 160, 190, 200]);
        }

        #[test]
        fn new_word_takes_hue_from_index() {
            let word = Word::new("sky".to_string(), 3);
            assert_eq!(word.base_hue, 160);
            assert_eq!(word.position, Vec3::ZERO);
        }
    }
}

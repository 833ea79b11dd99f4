use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng};

use crate::{
    config,
    types::{Angles, Vec2},
};

/// Pointer-within-footprint test: the hover disc is slightly wider than the sphere.
pub fn is_inside_sphere(pointer: Vec2, center: Vec2, radius: f32) -> bool {
    let hover_radius = radius * config::HOVER_RADIUS_FACTOR;
    (pointer - center).length_sq() <= hover_radius * hover_radius
}

/// Folds an angle back into (−2π, 2π) once it leaves that range.
pub fn wrap_angle(angle: f32) -> f32 {
    if angle >= TAU || angle <= -TAU {
        angle % TAU
    } else {
        angle
    }
}

/// Manual + auto-drift rotation state, damped by how long the pointer has hovered.
#[derive(Debug)]
pub struct RotationController {
    base_speed: f32,
    manual_target: Angles,
    manual_current: Angles,
    auto_angle: Angles,
    auto_velocity: Angles,
    hover_active: bool,
    hover_blend: f32,
    next_shuffle_ms: f64,
    rng: StdRng,
}

impl RotationController {
    pub fn new(base_speed: f32, now_ms: f64, rng: StdRng) -> Self {
        let mut controller = Self {
            base_speed,
            manual_target: Angles::ZERO,
            manual_current: Angles::ZERO,
            auto_angle: Angles::ZERO,
            auto_velocity: Angles::ZERO,
            hover_active: false,
            hover_blend: 1.0,
            next_shuffle_ms: now_ms,
            rng,
        };
        controller.shuffle(now_ms, config::FIRST_SHUFFLE_MS);
        controller
    }

    pub fn set_hover(&mut self, active: bool) {
        self.hover_active = active;
    }

    pub fn set_manual_target(&mut self, target: Angles) {
        self.manual_target = target;
    }

    /// One animation step; returns the total rotation to project with.
    pub fn advance(&mut self, now_ms: f64) -> Angles {
        if now_ms >= self.next_shuffle_ms {
            self.shuffle(now_ms, config::SHUFFLE_MS);
        }
        self.ease_blend();
        self.ease_manual();
        self.accumulate_auto();
        self.total_rotation()
    }

    pub fn total_rotation(&self) -> Angles {
        self.manual_current + self.auto_angle
    }

    pub fn hover_blend(&self) -> f32 {
        self.hover_blend
    }

    #[cfg(test)]
    pub fn auto_velocity(&self) -> Angles {
        self.auto_velocity
    }

    #[cfg(test)]
    pub fn auto_angle(&self) -> Angles {
        self.auto_angle
    }

    #[cfg(test)]
    pub fn manual_current(&self) -> Angles {
        self.manual_current
    }

    #[cfg(test)]
    pub fn next_shuffle_ms(&self) -> f64 {
        self.next_shuffle_ms
    }

    fn shuffle(&mut self, now_ms: f64, base_interval_ms: f64) {
        self.auto_velocity = Angles::new(self.random_speed(), self.random_speed());
        self.next_shuffle_ms =
            now_ms + base_interval_ms + self.rng.gen_range(0.0..config::SHUFFLE_JITTER_MS);
        tracing::trace!(
            vx = self.auto_velocity.x,
            vy = self.auto_velocity.y,
            next_ms = self.next_shuffle_ms,
            "auto-drift resampled"
        );
    }

    fn random_speed(&mut self) -> f32 {
        let min = self.base_speed * config::AUTO_SPEED_MIN_FACTOR;
        let max = self.base_speed * config::AUTO_SPEED_MAX_FACTOR;
        let magnitude = if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        };
        if self.rng.gen_bool(0.5) {
            -magnitude
        } else {
            magnitude
        }
    }

    fn ease_blend(&mut self) {
        let target = if self.hover_active { 0.0 } else { 1.0 };
        self.hover_blend += (target - self.hover_blend) * config::BLEND_EASE;
        self.hover_blend = self.hover_blend.clamp(0.0, 1.0);
    }

    fn ease_manual(&mut self) {
        let ease = config::MANUAL_EASE * self.hover_blend;
        self.manual_current.x += (self.manual_target.x - self.manual_current.x) * ease;
        self.manual_current.y += (self.manual_target.y - self.manual_current.y) * ease;
    }

    fn accumulate_auto(&mut self) {
        self.auto_angle.x = wrap_angle(self.auto_angle.x + self.auto_velocity.x * self.hover_blend);
        self.auto_angle.y = wrap_angle(self.auto_angle.y + self.auto_velocity.y * self.hover_blend);
    }
}

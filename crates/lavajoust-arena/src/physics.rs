use crate::config::PhysicsConfig;
use crate::entity::Body;

/// Lower bound of flap momentum. Momentum decays toward this when idle.
pub const BASE_MOMENTUM: f32 = 1.0;

/// Per-type flight characteristics derived from `PhysicsConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightProfile {
    pub gravity_factor: f32,
    /// Fraction of the configured flap power this type gets.
    pub flap_scale: f32,
    pub max_momentum: f32,
    pub momentum_decay: f32,
    /// Largest upward speed a flap can produce.
    pub max_rise_speed: f32,
}

impl FlightProfile {
    pub fn rider(physics: &PhysicsConfig) -> Self {
        Self {
            gravity_factor: 1.0,
            flap_scale: 1.0,
            max_momentum: physics.max_flap_momentum,
            momentum_decay: physics.flap_momentum_decay,
            max_rise_speed: physics.max_vertical_speed,
        }
    }

    pub fn enemy(physics: &PhysicsConfig) -> Self {
        Self {
            gravity_factor: physics.enemy_gravity_factor,
            flap_scale: physics.enemy_flap_scale,
            max_momentum: physics.enemy_max_flap_momentum,
            momentum_decay: physics.enemy_momentum_decay,
            max_rise_speed: physics.max_vertical_speed * physics.enemy_rise_factor,
        }
    }
}

/// Pull `vy` down by gravity, clamped to the vertical cap.
pub fn apply_gravity(body: &mut Body, physics: &PhysicsConfig, gravity_factor: f32) {
    body.vy += physics.gravity * gravity_factor;
    body.vy = body
        .vy
        .clamp(-physics.max_vertical_speed, physics.max_vertical_speed);
}

/// One flap: build momentum, then kick upward by power scaled with it.
pub fn flap(body: &mut Body, momentum: &mut f32, physics: &PhysicsConfig, profile: &FlightProfile) {
    *momentum = (*momentum + physics.flap_momentum_gain).clamp(BASE_MOMENTUM, profile.max_momentum);
    body.vy -= physics.flap_power * profile.flap_scale * *momentum;
    if body.vy < -profile.max_rise_speed {
        body.vy = -profile.max_rise_speed;
    }
}

/// Idle tick: momentum drifts back toward its base.
pub fn decay_momentum(momentum: &mut f32, profile: &FlightProfile) {
    *momentum = (*momentum - profile.momentum_decay).clamp(BASE_MOMENTUM, profile.max_momentum);
}

/// Horizontal control for one tick.
///
/// A non-zero `move_dir` accelerates in that direction, scaled by air
/// control while airborne. With no input, speed bleeds off toward zero
/// without crossing it.
pub fn steer(body: &mut Body, move_dir: f32, grounded: bool, physics: &PhysicsConfig) {
    // Sanitize NaN/Inf
    let move_dir = if move_dir.is_finite() {
        move_dir.clamp(-1.0, 1.0)
    } else {
        0.0
    };

    if move_dir != 0.0 {
        let control = if grounded { 1.0 } else { physics.air_control };
        body.vx += move_dir * physics.horizontal_acceleration * control;
        body.facing_right = move_dir > 0.0;
        body.vx = body
            .vx
            .clamp(-physics.max_horizontal_speed, physics.max_horizontal_speed);
    } else if body.vx > 0.0 {
        body.vx = (body.vx - physics.horizontal_deceleration).max(0.0);
    } else if body.vx < 0.0 {
        body.vx = (body.vx + physics.horizontal_deceleration).min(0.0);
    }
}

/// Clamp velocity to the caps, move, and wrap horizontally.
pub fn integrate(body: &mut Body, physics: &PhysicsConfig, screen_width: f32) {
    if !body.vx.is_finite() {
        body.vx = 0.0;
    }
    if !body.vy.is_finite() {
        body.vy = 0.0;
    }
    body.vx = body
        .vx
        .clamp(-physics.max_horizontal_speed, physics.max_horizontal_speed);
    body.vy = body
        .vy
        .clamp(-physics.max_vertical_speed, physics.max_vertical_speed);

    body.x += body.vx;
    body.y += body.vy;
    body.wrap_horizontal(screen_width);
}

/// Keep a body below the top of the screen. Upward speed is dropped.
pub fn clamp_to_ceiling(body: &mut Body) {
    if body.y < 0.0 {
        body.y = 0.0;
        if body.vy < 0.0 {
            body.vy = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn gravity_accumulates_and_caps() {
        let p = physics();
        let mut b = Body::new(0.0, 0.0, 64, 64);
        apply_gravity(&mut b, &p, 1.0);
        assert_eq!(b.vy, 0.5);
        for _ in 0..100 {
            apply_gravity(&mut b, &p, 1.0);
        }
        assert_eq!(b.vy, p.max_vertical_speed);
    }

    #[test]
    fn enemy_gravity_is_weaker() {
        let p = physics();
        let profile = FlightProfile::enemy(&p);
        let mut b = Body::new(0.0, 0.0, 64, 64);
        apply_gravity(&mut b, &p, profile.gravity_factor);
        assert!((b.vy - 0.4).abs() < 1e-6);
    }

    #[test]
    fn repeated_flaps_build_momentum_to_cap() {
        let p = physics();
        let profile = FlightProfile::rider(&p);
        let mut b = Body::new(0.0, 300.0, 64, 64);
        let mut m = BASE_MOMENTUM;

        flap(&mut b, &mut m, &p, &profile);
        assert!((m - 1.4).abs() < 1e-6);
        assert!((b.vy + 3.0 * 1.4).abs() < 1e-5);

        for _ in 0..20 {
            flap(&mut b, &mut m, &p, &profile);
        }
        assert_eq!(m, p.max_flap_momentum);
        assert_eq!(b.vy, -p.max_vertical_speed, "rise speed capped");
    }

    #[test]
    fn enemy_flap_is_scaled_and_rise_capped_lower() {
        let p = physics();
        let profile = FlightProfile::enemy(&p);
        let mut b = Body::new(0.0, 300.0, 64, 64);
        let mut m = BASE_MOMENTUM;
        flap(&mut b, &mut m, &p, &profile);
        assert!((b.vy + 3.0 * 0.7 * 1.4).abs() < 1e-5);
        for _ in 0..20 {
            flap(&mut b, &mut m, &p, &profile);
        }
        assert!((b.vy + 12.0).abs() < 1e-5);
        assert_eq!(m, p.enemy_max_flap_momentum);
    }

    #[test]
    fn momentum_decays_to_base_and_stops() {
        let p = physics();
        let profile = FlightProfile::rider(&p);
        let mut m = 1.05;
        decay_momentum(&mut m, &profile);
        assert!((m - 1.02).abs() < 1e-6);
        decay_momentum(&mut m, &profile);
        assert_eq!(m, BASE_MOMENTUM);
        decay_momentum(&mut m, &profile);
        assert_eq!(m, BASE_MOMENTUM);
    }

    #[test]
    fn air_control_reduces_acceleration() {
        let p = physics();
        let mut ground = Body::new(0.0, 0.0, 64, 64);
        let mut air = ground.clone();
        steer(&mut ground, 1.0, true, &p);
        steer(&mut air, 1.0, false, &p);
        assert!((ground.vx - 0.3).abs() < 1e-6);
        assert!((air.vx - 0.21).abs() < 1e-6);
        assert!(ground.facing_right);
    }

    #[test]
    fn deceleration_never_overshoots_zero() {
        let p = physics();
        let mut b = Body::new(0.0, 0.0, 64, 64);
        b.vx = 0.05;
        steer(&mut b, 0.0, true, &p);
        assert_eq!(b.vx, 0.0);
        b.vx = -0.15;
        steer(&mut b, 0.0, false, &p);
        assert!((b.vx + 0.05).abs() < 1e-6);
        steer(&mut b, 0.0, false, &p);
        assert_eq!(b.vx, 0.0);
    }

    #[test]
    fn steering_respects_horizontal_cap() {
        let p = physics();
        let mut b = Body::new(0.0, 0.0, 64, 64);
        for _ in 0..200 {
            steer(&mut b, -1.0, true, &p);
        }
        assert_eq!(b.vx, -p.max_horizontal_speed);
        assert!(!b.facing_right);
    }

    #[test]
    fn nan_move_dir_is_ignored() {
        let p = physics();
        let mut b = Body::new(0.0, 0.0, 64, 64);
        steer(&mut b, f32::NAN, true, &p);
        assert_eq!(b.vx, 0.0);
    }

    #[test]
    fn integrate_clamps_before_moving() {
        let p = physics();
        let mut b = Body::new(100.0, 100.0, 64, 64);
        b.vx = 9.0;
        b.vy = -40.0;
        integrate(&mut b, &p, 1280.0);
        assert_eq!(b.vx, 8.0);
        assert_eq!(b.vy, -15.0);
        assert_eq!(b.x, 108.0);
        assert_eq!(b.y, 85.0);
    }

    #[test]
    fn integrate_wraps_off_the_right_edge() {
        let p = physics();
        let mut b = Body::new(1278.0, 100.0, 64, 64);
        b.vx = 4.0;
        integrate(&mut b, &p, 1280.0);
        assert_eq!(b.x, -64.0);
    }

    #[test]
    fn ceiling_stops_upward_motion() {
        let mut b = Body::new(0.0, -3.0, 64, 64);
        b.vy = -6.0;
        clamp_to_ceiling(&mut b);
        assert_eq!(b.y, 0.0);
        assert_eq!(b.vy, 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn speeds_stay_capped(
                start_vx in -50.0f32..50.0,
                start_vy in -50.0f32..50.0,
                moves in proptest::collection::vec((-1.0f32..=1.0, any::<bool>()), 1..120)
            ) {
                let p = PhysicsConfig::default();
                let profile = FlightProfile::rider(&p);
                let mut b = Body::new(600.0, 300.0, 64, 64);
                b.vx = start_vx;
                b.vy = start_vy;
                let mut m = BASE_MOMENTUM;

                for &(dir, flapping) in &moves {
                    steer(&mut b, dir, false, &p);
                    if flapping {
                        flap(&mut b, &mut m, &p, &profile);
                    } else {
                        decay_momentum(&mut m, &profile);
                    }
                    apply_gravity(&mut b, &p, profile.gravity_factor);
                    integrate(&mut b, &p, 1280.0);

                    prop_assert!(b.vx.abs() <= p.max_horizontal_speed);
                    prop_assert!(b.vy.abs() <= p.max_vertical_speed);
                    prop_assert!((BASE_MOMENTUM..=p.max_flap_momentum).contains(&m));
                }
            }

            #[test]
            fn enemy_momentum_stays_in_bounds(
                flaps in proptest::collection::vec(any::<bool>(), 1..200)
            ) {
                let p = PhysicsConfig::default();
                let profile = FlightProfile::enemy(&p);
                let mut b = Body::new(600.0, 300.0, 64, 64);
                let mut m = BASE_MOMENTUM;
                for &f in &flaps {
                    if f {
                        flap(&mut b, &mut m, &p, &profile);
                    } else {
                        decay_momentum(&mut m, &profile);
                    }
                    prop_assert!((BASE_MOMENTUM..=p.enemy_max_flap_momentum).contains(&m));
                }
            }
        }
    }
}

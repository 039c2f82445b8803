use lavajoust_core::geometry::Rect;

use crate::entity::Body;

/// Outcome of a rider touching an ordinary enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joust {
    RiderWins,
    EnemyWins,
    /// Neither is above the other; they bounce apart.
    Tie,
}

/// Decide a joust by vertical dominance. Caller checks overlap.
pub fn joust(rider: &Body, enemy: &Body) -> Joust {
    if rider.is_above(enemy) {
        Joust::RiderWins
    } else if enemy.is_above(rider) {
        Joust::EnemyWins
    } else {
        Joust::Tie
    }
}

/// Tie response: both bodies reverse horizontal direction.
pub fn bounce_apart(a: &mut Body, b: &mut Body) {
    a.vx = -a.vx;
    b.vx = -b.vx;
    a.face_velocity();
    b.face_velocity();
}

/// Outcome of a rider touching the special flyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyerStrike {
    FlyerDefeated,
    RiderDies,
}

/// The flyer only falls to a strike from above that lands on its mouth.
/// The rider's whole box is the strike rectangle. Any other contact kills
/// the rider.
pub fn strike_flyer(rider: &Body, flyer: &Body, mouth: Rect) -> FlyerStrike {
    if rider.is_above(flyer) && rider.rect().intersects(&mouth) {
        FlyerStrike::FlyerDefeated
    } else {
        FlyerStrike::RiderDies
    }
}

use invaders::entities::{Bullet, Enemy, EnemyKind, Player};
use invaders::geometry::{overlaps, Aabb, Bounded};

use proptest::prelude::*;

#[test]
fn bullet_overlapping_enemy_edge() {
    let bullet = Aabb::new(100.0, 100.0, 5.0, 15.0);
    let enemy = Aabb::new(98.0, 100.0, 40.0, 40.0);
    assert!(overlaps(&bullet, &enemy));
}

#[test]
fn bullet_left_of_enemy_misses() {
    let bullet = Aabb::new(100.0, 100.0, 5.0, 15.0);
    let enemy = Aabb::new(106.0, 100.0, 40.0, 40.0);
    assert!(!overlaps(&bullet, &enemy));
}

#[test]
fn shared_edge_is_not_overlap() {
    // Half-open intervals: [0, 10) and [10, 20) do not meet
    let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
    let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
    let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
    assert!(!a.overlaps(&right));
    assert!(!a.overlaps(&below));
}

#[test]
fn contained_box_overlaps() {
    let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
    let inner = Aabb::new(40.0, 40.0, 5.0, 5.0);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn right_and_bottom_edges() {
    let b = Aabb::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(b.right(), 40.0);
    assert_eq!(b.bottom(), 60.0);
}

#[test]
fn entities_report_their_boxes() {
    let bullet = Bullet::new(100.0, 100.0);
    assert_eq!(bullet.bounds(), Aabb::new(100.0, 100.0, 5.0, 15.0));

    let enemy = Enemy::new(98.0, 100.0, EnemyKind::Robot);
    assert_eq!(enemy.bounds(), Aabb::new(98.0, 100.0, 40.0, 40.0));
    assert!(bullet.collides_with(&enemy));

    let player = Player::centred(800.0, 600.0);
    assert_eq!(player.bounds(), Aabb::new(375.0, 570.0, 50.0, 30.0));
    assert!(!player.collides_with(&enemy));
}

fn any_box() -> impl Strategy<Value = Aabb> {
    (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
        .prop_map(|(x, y, w, h)| Aabb::new(x, y, w, h))
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in any_box(), b in any_box()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }

    #[test]
    fn solid_box_overlaps_itself(a in any_box()) {
        prop_assume!(a.width >= 1.0 && a.height >= 1.0);
        prop_assert!(overlaps(&a, &a));
    }

    #[test]
    fn box_never_overlaps_its_right_neighbour(a in any_box(), h in 0.0f32..200.0) {
        let neighbour = Aabb::new(a.x + a.width, a.y, 10.0, h);
        prop_assert!(!overlaps(&a, &neighbour));
    }
}

//! Collision detection between the flyer, pipes and the ground
//!
//! All shapes are axis-aligned boxes. A pipe pair is hit when the flyer's
//! horizontal span overlaps the pipe column and its vertical span is not
//! fully inside the gap.

use super::state::{Flyer, Obstacle};

/// Open-interval overlap test: touching edges do not overlap
#[inline]
pub fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max && a_max > b_min
}

/// True if the vertical span `[top, bottom]` is not contained in the gap
#[inline]
pub fn escapes_gap(top: f32, bottom: f32, obstacle: &Obstacle) -> bool {
    top < obstacle.gap_top || bottom > obstacle.gap_end()
}

/// Check the flyer against one pipe pair
pub fn flyer_obstacle_collision(flyer: &Flyer, obstacle: &Obstacle) -> bool {
    spans_overlap(flyer.left(), flyer.right(), obstacle.x, obstacle.right())
        && escapes_gap(flyer.top(), flyer.bottom(), obstacle)
}

/// Check the flyer against the ground line
#[inline]
pub fn flyer_ground_collision(flyer: &Flyer, floor_y: f32) -> bool {
    flyer.bottom() >= floor_y
}

/// ID of the first obstacle the flyer is touching, if any
pub fn first_obstacle_hit(flyer: &Flyer, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| flyer_obstacle_collision(flyer, o))
        .map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn flyer_at(y: f32, h: f32) -> Flyer {
        Flyer {
            pos: Vec2::new(50.0, y),
            size: Vec2::new(40.0, h),
            vel_y: 0.0,
        }
    }

    fn pipe(x: f32, gap_top: f32, gap_size: f32) -> Obstacle {
        Obstacle::new(1, x, 60.0, gap_top, gap_size, 640.0)
    }

    #[test]
    fn test_inside_gap_no_collision() {
        // Flyer 40..70 inside a gap spanning 20..180
        let flyer = flyer_at(40.0, 30.0);
        let o = pipe(60.0, 20.0, 160.0);
        assert!(!flyer_obstacle_collision(&flyer, &o));
    }

    #[test]
    fn test_top_pipe_hit() {
        // Flyer 0..30 against a gap starting at 40
        let flyer = flyer_at(0.0, 30.0);
        let o = pipe(60.0, 40.0, 150.0);
        assert!(flyer_obstacle_collision(&flyer, &o));
    }

    #[test]
    fn test_bottom_pipe_hit() {
        let flyer = flyer_at(170.0, 30.0);
        let o = pipe(60.0, 20.0, 160.0);
        assert!(flyer_obstacle_collision(&flyer, &o));
    }

    #[test]
    fn test_no_horizontal_overlap_no_collision() {
        let flyer = flyer_at(0.0, 30.0);
        // Flyer spans 50..90; pipe starts exactly at its right edge
        let o = pipe(90.0, 40.0, 150.0);
        assert!(!flyer_obstacle_collision(&flyer, &o));
        // Pipe ends exactly at the flyer's left edge
        let o = pipe(-10.0, 40.0, 150.0);
        assert!(!flyer_obstacle_collision(&flyer, &o));
    }

    #[test]
    fn test_ground_collision_is_inclusive() {
        let flyer = flyer_at(500.0, 40.0);
        assert!(flyer_ground_collision(&flyer, 540.0));
        let flyer = flyer_at(499.9, 40.0);
        assert!(!flyer_ground_collision(&flyer, 540.0));
    }

    #[test]
    fn test_first_obstacle_hit() {
        let flyer = flyer_at(0.0, 30.0);
        let mut far = pipe(300.0, 40.0, 150.0);
        far.id = 7;
        let mut near = pipe(60.0, 40.0, 150.0);
        near.id = 3;
        assert_eq!(first_obstacle_hit(&flyer, &[far.clone(), near]), Some(3));
        assert_eq!(first_obstacle_hit(&flyer, &[far]), None);
    }

    proptest! {
        #[test]
        fn prop_collision_iff_overlap_and_escape(
            y in 0.0f32..500.0,
            x in -100.0f32..500.0,
            gap_top in 50.0f32..340.0,
            gap_size in 90.0f32..150.0,
        ) {
            let flyer = flyer_at(y, 40.0);
            let o = pipe(x, gap_top, gap_size);
            let overlap = flyer.left() < o.right() && flyer.right() > o.x;
            let escape = flyer.top() < o.gap_top || flyer.bottom() > o.gap_top + o.gap_size;
            prop_assert_eq!(flyer_obstacle_collision(&flyer, &o), overlap && escape);
        }
    }
}

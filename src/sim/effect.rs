//! Transient visual markers

use glam::Vec2;

/// Impact mark left where the player was hit
#[derive(Debug, Clone)]
pub struct ImpactMark {
    pub pos: Vec2,
    pub age: u32,
    pub max_age: u32,
}

impl ImpactMark {
    pub fn new(pos: Vec2, max_age: u32) -> Self {
        Self { pos, age: 0, max_age }
    }

    /// 0.0 when fresh, 1.0 when about to expire (for fading)
    pub fn normalized_age(&self) -> f32 {
        (self.age as f32 / self.max_age.max(1) as f32).min(1.0)
    }

    pub fn expired(&self) -> bool {
        self.age >= self.max_age
    }
}

/// Age every mark by one tick and drop the expired ones
pub fn age_and_prune(marks: &mut Vec<ImpactMark>) {
    for mark in marks.iter_mut() {
        mark.age += 1;
    }
    marks.retain(|m| !m.expired());
}

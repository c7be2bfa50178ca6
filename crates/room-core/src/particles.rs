//! Cosmetic spark particles orbiting a live glow.

use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct Spark {
    pub offset: Vec3,
    vel: Vec3,
    pub age: f32,
    ttl: f32,
}

pub struct SparkField {
    sparks: Vec<Spark>,
    rng: StdRng,
    pub center: Vec3,
    active: bool,
}

impl SparkField {
    pub fn new(seed: u64) -> Self {
        Self {
            sparks: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            center: Vec3::ZERO,
            active: false,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.sparks.clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn spawn_one(rng: &mut StdRng) -> Spark {
        let dir = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        )
        .normalize_or_zero();
        let ttl = SPARK_TTL_MIN_SEC + rng.gen::<f32>() * (SPARK_TTL_MAX_SEC - SPARK_TTL_MIN_SEC);
        Spark {
            offset: dir * (rng.gen::<f32>() * SPARK_SPAWN_RADIUS),
            vel: dir * SPARK_SPEED,
            age: 0.0,
            ttl,
        }
    }

    /// Age sparks, respawn the expired ones, top the field up while active.
    pub fn update(&mut self, dt_sec: f32) {
        if !self.active {
            return;
        }
        while self.sparks.len() < SPARK_COUNT {
            let s = Self::spawn_one(&mut self.rng);
            self.sparks.push(s);
        }
        for s in &mut self.sparks {
            s.age += dt_sec;
            if s.age >= s.ttl {
                *s = Self::spawn_one(&mut self.rng);
            } else {
                s.offset += s.vel * dt_sec;
            }
        }
    }

    /// World position and remaining-life fade for every live spark.
    pub fn alive(&self) -> impl Iterator<Item = (Vec3, f32)> + '_ {
        self.sparks
            .iter()
            .map(|s| (self.center + s.offset, 1.0 - (s.age / s.ttl).clamp(0.0, 1.0)))
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }
}

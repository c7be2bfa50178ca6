// Interaction and animation tuning constants

use glam::Vec3;

// Summon delay before the creature becomes visible (seconds)
pub const SUMMON_DELAY_SEC: f32 = 2.5;

// Rasengan enlarge multiplier applied to the base scale
pub const RASENGAN_SCALE_MULTIPLIER: f32 = 2.5;

// Continuous animation rates (radians per second)
pub const SPIN_RATE_RAD_PER_SEC: f32 = 2.4;
pub const ORBIT_RATE_RAD_PER_SEC: f32 = 1.6;
pub const ORBIT_RADIUS: f32 = 0.12;

// Glow overlay shell
pub const GLOW_MESH_SCALE: f32 = 1.15;
pub const GLOW_BASE_OPACITY: f32 = 0.35;
pub const GLOW_PULSE_AMPLITUDE: f32 = 0.12;
pub const GLOW_PULSE_FREQ_RAD_PER_SEC: f32 = 2.0;
pub const GLOW_SCALE_PULSE_AMPLITUDE: f32 = 0.05;
pub const GLOW_LIGHT_INTENSITY: f32 = 1.4;

// Spark particles around a live glow
pub const SPARK_COUNT: usize = 24;
pub const SPARK_TTL_MIN_SEC: f32 = 0.4;
pub const SPARK_TTL_MAX_SEC: f32 = 1.1;
pub const SPARK_SPEED: f32 = 0.5;
pub const SPARK_SPAWN_RADIUS: f32 = 0.18;

// Lamp rig presets; the warm point light matches the source fixture
pub const LAMP_POINT_COLOR: Vec3 = Vec3::new(1.0, 0.933, 0.533);
pub const LAMP_POINT_INTENSITY: f32 = 1.0;
pub const AMBIENT_INTENSITY_OFF: f32 = 0.15;
pub const AMBIENT_INTENSITY_ON: f32 = 0.5;
pub const BACKGROUND_OFF: Vec3 = Vec3::new(0.02, 0.02, 0.045);
pub const BACKGROUND_ON: Vec3 = Vec3::new(0.09, 0.10, 0.16);
pub const HEMISPHERE_SKY: Vec3 = Vec3::new(0.55, 0.62, 0.80);
pub const HEMISPHERE_GROUND: Vec3 = Vec3::new(0.22, 0.18, 0.12);
pub const DIRECTIONAL_COLOR: Vec3 = Vec3::new(1.0, 0.98, 0.92);
pub const DIRECTIONAL_INTENSITY: f32 = 0.6;

// Free-look camera
pub const MOVE_SPEED: f32 = 2.0;
pub const LOOK_DAMPING_TAU_SEC: f32 = 0.12;
pub const PITCH_LIMIT_RAD: f32 = 1.45;

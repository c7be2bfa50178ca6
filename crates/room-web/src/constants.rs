// Canvas, assets, and camera tuning for the web front end

use glam::Vec3;

pub const CANVAS_ID: &str = "room-canvas";

// Model locations, fetched relative to the page
pub const ASSET_ROOM: &str = "assets/hokage_room.glb";
pub const ASSET_NARUTO: &str = "assets/naruto.glb";
pub const ASSET_SASUKE: &str = "assets/sasuke.glb";
pub const ASSET_RASENGAN: &str = "assets/rasengan.glb";
pub const ASSET_SUSANOO: &str = "assets/susanoo.glb";
pub const ASSET_COMPANION: &str = "assets/scroll.glb";

// Where the standalone models sit inside the room
pub const NARUTO_POS: Vec3 = Vec3::new(-0.9, 0.0, -0.6);
pub const SASUKE_POS: Vec3 = Vec3::new(0.9, 0.0, -0.6);
pub const RASENGAN_POS: Vec3 = Vec3::new(-0.55, 1.05, -0.45);

// Camera boot pose; eye works out to roughly (0, 1.6, 5) like the source
pub const CAMERA_FOCUS: Vec3 = Vec3::new(0.0, 1.2, 0.0);
pub const CAMERA_RADIUS: f32 = 4.9;
pub const CAMERA_START_YAW: f32 = 0.0;
pub const CAMERA_START_PITCH: f32 = 0.082;
pub const FOVY_RAD: f32 = std::f32::consts::FRAC_PI_3;
pub const ZNEAR: f32 = 0.1;
pub const ZFAR: f32 = 1000.0;

// Pointer behavior
pub const DRAG_LOOK_SENSITIVITY: f32 = 0.005;
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 5.0;

// Seed for the spark field rng
pub const VIEWER_SEED: u64 = 42;

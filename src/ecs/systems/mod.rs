pub mod collision;

pub use collision::{collision_response_system, collision_system, integrate_motion};

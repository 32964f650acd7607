pub mod states;
pub mod trail;
pub mod params;
pub mod error;
pub mod engine;
pub mod rules;
pub mod kinematic;
pub mod forces;
pub mod partition;
pub mod store;
pub mod pipeline;
pub mod scheduler;
pub mod scenario;

pub mod ecs;
pub mod racer;

pub use ecs::EcsRewriter;
pub use racer::DohUpstreamRacer;

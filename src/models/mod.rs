pub mod agent;
pub mod animation;
pub mod event;
pub mod geometry;
pub mod pet;

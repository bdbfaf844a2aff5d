pub mod arbitration;
pub mod behavior;
pub mod geometry;
pub mod movement;
pub mod pointer_monitor;
pub mod scheduler;

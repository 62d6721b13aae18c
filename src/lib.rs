pub mod app;
pub mod config;
pub mod engine;
pub mod generators;
pub mod maze;
pub mod progress;
pub mod solvers;

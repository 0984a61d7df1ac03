pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod graphics;
pub mod machine;
pub mod player;
pub mod renderer;
pub mod system;
pub mod types;

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod graphics;
pub mod input;
pub mod text;
pub mod world;

pub use app::run;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

pub mod carousel;
pub mod config;
pub mod error;
pub mod events;
pub mod tasks {
    pub mod driver;
}
pub mod view;

pub use error::{Error, Result};

mod admins;
mod audio;
pub mod db;
mod manuscripts;
pub mod models;
mod tables;

pub use db::{Catalog, CatalogError};
pub use tables::*;

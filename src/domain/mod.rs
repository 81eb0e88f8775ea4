// Domain module: backend-facing models and the solver contract

pub mod models;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use solver_service::*;
pub use value_objects::*;

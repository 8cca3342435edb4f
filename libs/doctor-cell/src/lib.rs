pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::Doctor;
pub use router::doctor_routes;
pub use services::catalog::DoctorCatalog;

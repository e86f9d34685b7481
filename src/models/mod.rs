pub mod credentials;
pub mod device_models;
pub mod devices;
pub mod interfaces;
pub mod templates;

pub use credentials::*;
pub use device_models::*;
pub use devices::*;
pub use interfaces::*;
pub use templates::*;

//! Type definitions for the Rap2 client
//!
//! Entities, request bodies and test results exchanged with the server.

pub mod model;
pub mod request;
pub mod response;
pub mod serde_helpers;

pub use model::{Rap2Interface, Rap2InterfaceBase, Rap2Module, Rap2Property, Rap2Repository, Rap2User};
pub use request::{CreateModuleRequest, LoginRequest, PropertiesSummary, UpdatePropertiesRequest};
pub use response::{TestCode, TestResult};

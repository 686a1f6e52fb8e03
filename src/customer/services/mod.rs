//! Orchestration services for the customer context.

mod directory;

pub use directory::{
    CustomerDirectoryService, CustomerServiceError, CustomerServiceResult,
    RegisterCustomerRequest,
};

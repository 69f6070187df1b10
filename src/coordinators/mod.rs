// Coordinators layer - Workflow orchestration
//
// Coordinators compose validation and service calls for specific API
// endpoints. They determine the sequence of operations without containing
// business logic themselves.

pub mod auth_coordinator;

pub use auth_coordinator::AuthCoordinator;

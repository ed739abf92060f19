//! Storage backend trait abstraction
//!
//! Async domain traits at the seams the agent toolkit depends on, so tools
//! can run against PostgreSQL or an in-memory fake.

pub mod employee;
pub mod sql;
pub mod vector;

pub use employee::EmployeeStore;
pub use sql::SqlDatabase;
pub use vector::VectorStore;

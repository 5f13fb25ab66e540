//! Controllers
//!
//! Operações de negócio por entidade. Os handlers HTTP só extraem a
//! requisição e delegam para cá.

pub mod supplier_controller;
pub mod vehicle_controller;

#[cfg(test)]
pub mod test_support;

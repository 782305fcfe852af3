//! Retail loan credit risk: scoring tables, affordability, Basel-style
//! metrics and the approve/reject decision.

pub mod affordability;
pub mod application;
pub mod assessment;
pub mod decision;
pub mod metrics;
pub mod report;
pub mod scoring;
pub mod stress;

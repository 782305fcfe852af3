pub mod credit;
pub mod portfolio;

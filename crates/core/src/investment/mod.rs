//! Fixed-term investment packages.

pub mod book;
pub mod package;

pub use book::InvestmentBook;
pub use package::{Investment, InvestmentPackage, InvestmentStatus};

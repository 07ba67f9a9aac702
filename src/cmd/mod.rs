//! Command module structure for swagcheck CLI

pub mod check;
pub mod util;

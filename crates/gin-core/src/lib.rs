#![deny(warnings)]
pub mod meld;
pub mod model;

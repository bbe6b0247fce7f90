#![allow(dead_code)]

pub mod env;
pub mod model;
pub mod wav;

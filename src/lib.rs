#![allow(clippy::implicit_hasher)]

pub mod constants;
pub mod geometry;
pub mod import;
pub mod logging;
pub mod models;
pub mod topology;
pub mod union_find;

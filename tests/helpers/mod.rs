#![allow(dead_code)]

pub mod class_language;
pub mod node_assertions;

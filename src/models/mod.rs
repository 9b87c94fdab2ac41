// src/models/mod.rs

pub mod class;
pub mod message;
pub mod question;
pub mod quiz;
pub mod user;

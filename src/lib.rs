//! Library crate for the party-games client, exposing modules for the console binary and
//! integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod games;
pub mod services;
pub mod state;
pub mod view;

//! Domain entities and transition table for the Content domain

pub mod entities;
pub mod state;

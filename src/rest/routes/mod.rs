//! Route handlers for the REST API.

pub mod claims;
pub mod health;
pub mod occupations;
pub mod pages;

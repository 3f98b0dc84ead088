//! relquery - related-object filters compiled to SQL fragments
//!
//! This crate lets a posts query be narrowed to rows connected to other
//! objects through registered relationship types:
//! - A relationship registry mapping (object kinds, type) to storage tables
//! - Normalization and validation of loosely structured filter specifications
//! - Generation of JOIN and WHERE fragments ready to splice into a query

pub mod config;
pub mod graph_catalog;
pub mod relationship_query;

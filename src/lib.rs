//! Shramic CMS - website and admin panel for Shramic Networks
//!
//! Public marketing pages, a blog with search, and a session-protected
//! admin panel for editing all site content.

pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
pub mod web;

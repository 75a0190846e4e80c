/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, logout, me)
/// - `projects`: Project management endpoints
/// - `issues`: Issue lifecycle endpoints

pub mod auth;
pub mod health;
pub mod issues;
pub mod projects;

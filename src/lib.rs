// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idea Journal: backend API for recording daily idea sessions.
//!
//! Users sign up through Firebase Authentication, record sessions of short
//! free-form ideas, and read back totals, weekly groupings, streaks and
//! searches over their own sessions. Data lives in Firestore; profile images
//! are hosted on Cloudinary.

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{CloudinaryClient, FirebaseAuth};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub firebase: FirebaseAuth,
    pub cloudinary: CloudinaryClient,
}

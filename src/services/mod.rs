// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for external providers.

pub mod cloudinary;
pub mod firebase;

pub use cloudinary::{CloudinaryClient, DestroyResult, UploadedImage};
pub use firebase::{CreatedAccount, FirebaseAuth, TokenError, VerifiedIdentity};

//! HTTP REST surface for the habits tracker.
//! Exposes `habits_core` as resource collections plus a liveness endpoint.

pub mod api;

//! Response envelope used by every JSON endpoint of the donation backend.
//!
//! Successful responses are wrapped as `{ "_status": 200, "data": ... }` and
//! failures as `{ "_status": 4xx/5xx, "error": { "type": ..., "message": ... } }`.
//! Endpoints whose wire format is fixed by existing clients (the donation
//! routes) return bare `axum::Json` instead and only use the error envelope.

pub mod response;

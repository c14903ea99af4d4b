//! End-to-end engine tests over the in-memory store

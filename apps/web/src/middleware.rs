//! # ミドルウェア
//!
//! Web サーバー用のミドルウェアを提供する。

mod cache_control;
pub mod request_id;
mod session_gate;

pub use cache_control::no_cache;
pub use session_gate::{
    CurrentSession,
    GateMode,
    SESSION_COOKIE_NAME,
    SessionGateState,
    require_session,
};

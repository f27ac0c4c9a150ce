pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn generate() -> LogCtx<ops::generate::Generate> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }

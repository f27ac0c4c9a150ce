use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::OnceLock;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "shopfeed.v1";

/// One id per process so the envelope can be matched to its log lines.
pub fn run_id() -> Uuid {
    static RUN_ID: OnceLock<Uuid> = OnceLock::new();
    *RUN_ID.get_or_init(Uuid::new_v4)
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub run_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    pub fn plan<T: Serialize>(op: &'static str, plan: &T) -> Result<Self, serde_json::Error> {
        Ok(Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            run_id: run_id(),
            op,
            apply: false,
            plan: Some(serde_json::to_value(plan)?),
            result: None,
        })
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T) -> Result<Self, serde_json::Error> {
        Ok(Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            run_id: run_id(),
            op,
            apply: true,
            plan: None,
            result: Some(serde_json::to_value(result)?),
        })
    }
}

pub fn print_plan<T: Serialize>(op: &'static str, plan: &T) -> Result<()> {
    write_envelope(&Envelope::plan(op, plan)?)
}

pub fn print_result<T: Serialize>(op: &'static str, result: &T) -> Result<()> {
    write_envelope(&Envelope::result(op, result)?)
}

fn write_envelope(env: &Envelope) -> Result<()> {
    let mut out = io::stdout();
    serde_json::to_writer(&mut out, env)?;
    writeln!(&mut out)?;
    out.flush()?;
    Ok(())
}

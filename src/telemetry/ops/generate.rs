use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Generate;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Fetch, Page, Build, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Fetch => "fetch",
        Phase::Page => "page",
        Phase::Build => "build",
        Phase::Write => "write",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Page => info_span!("page"),
        Phase::Build => info_span!("build"),
        Phase::Write => info_span!("write"),
    }}
}

impl OpMarker for Generate {
    const NAME: &'static str = "generate";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("generate") }
}

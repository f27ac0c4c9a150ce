use serde::Serialize;

use crate::feed::FeedStats;

#[derive(Serialize)]
pub struct GeneratePlan { pub output: String, pub bytes: usize, pub stats: FeedStats }

#[derive(Serialize)]
pub struct GenerateResult { pub output: String, pub bytes: usize, pub stats: FeedStats }

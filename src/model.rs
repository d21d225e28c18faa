use serde::Serialize;
use serde_json::Value;

use rrf_fuse::fusion::Appearance;

#[derive(Debug, Clone, Serialize)]
pub struct TracedResult<'a> {
    pub rank: usize,
    pub score: f64,
    pub key_sha256: String,
    pub first_seen: usize,
    pub appearances: &'a [Appearance],
    pub document: &'a Value,
}

#[derive(Debug, Serialize)]
pub struct FuseResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl FuseResponse {
    pub fn success(results: Vec<Value>) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
            kind: None,
        }
    }

    pub fn failure(error: String, kind: &'static str) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error),
            kind: Some(kind),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FusionReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_source: String,
    pub input_sha256: String,
    pub rrf_k: f64,
    pub tie_break: String,
    pub output_shape: String,
    pub list_count: usize,
    pub list_lengths: Vec<usize>,
    pub observation_count: usize,
    pub unique_count: usize,
    pub duplicate_observations: usize,
    pub limit: Option<usize>,
    pub returned: usize,
}

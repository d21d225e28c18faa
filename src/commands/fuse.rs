use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::info;

use rrf_fuse::fusion::{self, FusedDocument, FusionError, TIE_BREAK_POLICY};

use crate::cli::{FuseArgs, OutputShape};
use crate::model::{FuseResponse, FusionReport, TracedResult};
use crate::util::{now_utc_string, sha256_bytes, write_json_pretty};

const REPORT_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    fn from_arg(input: Option<&Path>) -> Self {
        match input {
            Some(path) if path != Path::new("-") => Self::File(path.to_path_buf()),
            _ => Self::Stdin,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Stdin => "stdin".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let mut raw = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut raw)
                    .context("failed to read input from stdin")?;
                Ok(raw)
            }
            Self::File(path) => fs::read(path)
                .with_context(|| format!("failed to read input file: {}", path.display())),
        }
    }
}

#[derive(Debug)]
struct FuseOutcome {
    results: Vec<Value>,
    list_lengths: Vec<usize>,
    unique_count: usize,
}

/// Fuse the payload named by `args` and print the response envelope.
///
/// The envelope is written for failures too; the error is then returned so
/// the process exits non-zero.
pub fn run(args: FuseArgs) -> Result<()> {
    match execute(&args) {
        Ok(results) => write_response(&FuseResponse::success(results), args.pretty),
        Err(err) => {
            write_response(&failure_response(&err), args.pretty)?;
            Err(err)
        }
    }
}

fn execute(args: &FuseArgs) -> Result<Vec<Value>> {
    let source = InputSource::from_arg(args.input.as_deref());
    let raw = source.read()?;
    let outcome = fuse_payload(&raw, args.rrf_k, args.shape, args.limit)?;

    if let Some(report_path) = &args.report_path {
        let report = build_report(&source, &raw, args, &outcome);
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote fusion report");
    }

    info!(
        source = %source.describe(),
        lists = outcome.list_lengths.len(),
        unique = outcome.unique_count,
        returned = outcome.results.len(),
        shape = args.shape.as_str(),
        "fusion completed"
    );

    Ok(outcome.results)
}

fn fuse_payload(
    raw: &[u8],
    rrf_k: f64,
    shape: OutputShape,
    limit: Option<usize>,
) -> Result<FuseOutcome> {
    let payload: Value = serde_json::from_slice(raw)
        .map_err(|err| FusionError::InvalidInput(format!("input is not valid JSON: {err}")))?;
    let lists = fusion::ranked_lists_from_value(payload)?;

    let mut fused = fusion::fuse(&lists, rrf_k)?;
    let unique_count = fused.len();
    if let Some(limit) = limit {
        fused.truncate(limit);
    }

    let results = project(&fused, shape)?;

    Ok(FuseOutcome {
        results,
        list_lengths: lists.iter().map(Vec::len).collect(),
        unique_count,
    })
}

fn project(fused: &[FusedDocument<'_, Value>], shape: OutputShape) -> Result<Vec<Value>> {
    fused
        .iter()
        .enumerate()
        .map(|(index, entry)| match shape {
            OutputShape::Documents => Ok(entry.to_document()),
            OutputShape::Scored => {
                let (document, score) = entry.to_scored();
                Ok(json!([document, score]))
            }
            OutputShape::Traced => serde_json::to_value(TracedResult {
                rank: index + 1,
                score: entry.score,
                key_sha256: entry.key.sha256_hex(),
                first_seen: entry.first_seen,
                appearances: &entry.appearances,
                document: entry.document,
            })
            .context("failed to serialize traced result"),
        })
        .collect()
}

fn build_report(
    source: &InputSource,
    raw: &[u8],
    args: &FuseArgs,
    outcome: &FuseOutcome,
) -> FusionReport {
    let observation_count: usize = outcome.list_lengths.iter().sum();

    FusionReport {
        manifest_version: REPORT_MANIFEST_VERSION,
        generated_at: now_utc_string(),
        input_source: source.describe(),
        input_sha256: sha256_bytes(raw),
        rrf_k: args.rrf_k,
        tie_break: TIE_BREAK_POLICY.to_string(),
        output_shape: args.shape.as_str().to_string(),
        list_count: outcome.list_lengths.len(),
        list_lengths: outcome.list_lengths.clone(),
        observation_count,
        unique_count: outcome.unique_count,
        duplicate_observations: observation_count - outcome.unique_count,
        limit: args.limit,
        returned: outcome.results.len(),
    }
}

fn failure_response(err: &anyhow::Error) -> FuseResponse {
    let kind = err
        .downcast_ref::<FusionError>()
        .map(FusionError::kind)
        .unwrap_or("io");
    FuseResponse::failure(format!("{err:#}"), kind)
}

fn write_response(response: &FuseResponse, pretty: bool) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    let written = if pretty {
        serde_json::to_writer_pretty(&mut output, response)
    } else {
        serde_json::to_writer(&mut output, response)
    };
    written.context("failed to serialize fusion output")?;

    writeln!(output)?;
    output.flush()?;
    Ok(())
}

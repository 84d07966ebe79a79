//! Run identity for solve calls.
//!
//! A caller-supplied `runId` is used verbatim. Otherwise the id is derived
//! from a canonical form (the key-sorted problem JSON without its run id, or
//! the account plus idempotency key), hashed with SHA-256 and prefixed with
//! the account so equal inputs always map to the same run.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::model::{AccountId, RunId, SchedulingProblem};

/// Hex characters of the digest kept in a generated run id.
pub const RUN_ID_DIGEST_LEN: usize = 24;

/// Resolve the run id for `problem` solved on behalf of `account_id`.
pub fn resolve_run_id(account_id: &AccountId, problem: &SchedulingProblem) -> Result<RunId> {
    if let Some(run_id) = non_blank(problem.run_id.as_deref()) {
        return Ok(RunId::new(run_id));
    }

    let canonical = match non_blank(problem.idempotency_key.as_deref()) {
        Some(key) => json!({
            "accountId": account_id.as_str(),
            "idempotencyKey": key,
        })
        .to_string(),
        None => canonical_problem(problem)?,
    };

    let digest = sha256_hex(&canonical);
    Ok(RunId::new(format!(
        "run-{}-{}",
        account_id,
        &digest[..RUN_ID_DIGEST_LEN]
    )))
}

/// Key-sorted JSON of `problem` with run id and idempotency key removed.
///
/// `serde_json::Map` keeps keys ordered, so equal problems serialize to
/// identical strings regardless of how they were built.
pub fn canonical_problem(problem: &SchedulingProblem) -> Result<String> {
    let mut value = serde_json::to_value(problem)?;
    if let Value::Object(map) = &mut value {
        map.remove("runId");
        map.remove("idempotencyKey");
    }
    Ok(value.to_string())
}

pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

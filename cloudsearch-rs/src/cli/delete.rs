//! `delete` command.

use crate::cli::args::DeleteArgs;
use crate::cli::output::Output;
use crate::cli::query::HitId;
use crate::client::CloudSearch;
use crate::error::{ExitCode, Result};
use crate::result::ErrorMessage;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub status: String,
    pub deletes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorMessage>,
}

/// Delete one document. A rejected batch is still printed, with the service
/// exit code.
pub fn run(client: &CloudSearch<HitId>, args: &DeleteArgs, output: &Output) -> Result<ExitCode> {
    let result = client.delete_by_id(&args.id);
    let code = if result.is_error {
        output.warn(&format!("delete of {} failed: {}", args.id, result.error_summary()));
        ExitCode::ServiceError
    } else {
        ExitCode::Success
    };

    output.print(&DeleteResponse {
        id: args.id.clone(),
        status: result.status,
        deletes: result.deletes,
        errors: result.errors,
    })?;
    Ok(code)
}

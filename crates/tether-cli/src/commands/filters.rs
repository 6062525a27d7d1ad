//! Compiled filter output

use std::path::Path;

use crate::context::SessionContext;
use crate::error::Result;

/// Print the filter set a session would use, one rule per line
pub fn run_filters(cwd: &Path, json: bool) -> Result<()> {
    let ctx = SessionContext::load(cwd)?;
    let filters = ctx.session.compile_filters(&ctx.workspace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&filters)?);
    } else {
        print!("{filters}");
    }
    Ok(())
}

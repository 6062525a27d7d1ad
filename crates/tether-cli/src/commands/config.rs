//! Emitted lsyncd configuration preview

use std::path::Path;

use tether_core::ConfigEmitter;

use crate::context::SessionContext;
use crate::error::Result;

/// Print the lsyncd configuration without starting a session
pub fn run_config(cwd: &Path) -> Result<()> {
    let ctx = SessionContext::load(cwd)?;
    let filters = ctx.session.compile_filters(&ctx.workspace)?;
    print!("{}", ConfigEmitter::new(ctx.session.config(), &filters).render());
    Ok(())
}

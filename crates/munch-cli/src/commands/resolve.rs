use crate::commands::show;
use crate::session;
use anyhow::Result;

/// Tally a tiered decision.
pub fn complete(id: String, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let decision_id = session::resolve_id(&engine, &id)?;
    let result = engine.complete_tiered_decision(&decision_id)?;
    if json {
        return session::print_json(&result);
    }
    show::print_result(&result);
    Ok(())
}

/// Draw a random group decision.
pub fn draw(id: String, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let decision_id = session::resolve_id(&engine, &id)?;
    let result = engine.resolve_random_group_decision(&decision_id)?;
    if json {
        return session::print_json(&result);
    }
    show::print_result(&result);
    Ok(())
}

use crate::commands::show;
use crate::session;
use anyhow::Result;
use munch_core::model::CollectionId;

pub fn run(
    collection: String,
    visit_date: Option<String>,
    user: Option<String>,
    json: bool,
) -> Result<()> {
    let engine = session::engine()?;
    let user = session::acting_user(user)?;
    let visit_date = session::parse_when(visit_date.as_deref())?;

    let result = engine.select_random(&CollectionId::from(collection), &user, visit_date)?;
    if json {
        return session::print_json(&result);
    }
    show::print_result(&result);
    Ok(())
}

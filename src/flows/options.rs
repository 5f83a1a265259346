//! Options flow - list the views a reference can ask for

use anyhow::Result;

use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::refs::view::{ANCESTOR_OPTION, OPTIONS};

/// Every option in table order, the `p` family last
pub fn list_options() -> ResultSet {
    OPTIONS
        .iter()
        .map(|option| ResultItem::option(option.name, option.description))
        .chain(std::iter::once(ResultItem::option(
            ANCESTOR_OPTION.0,
            ANCESTOR_OPTION.1,
        )))
        .collect()
}

/// Run options command
pub fn run_options(render: RenderConfig) -> Result<()> {
    let renderer = Renderer::with_config(render);
    println!("{}", renderer.render(&list_options()));
    Ok(())
}

use std::io::Write;

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::Repository;

use super::HEADER_ROW;

/// Render repositories as a table. Colors are only emitted when `styled` is
/// set and stdout is a terminal.
pub fn render(repos: &[Repository], styled: bool, out: &mut dyn Write) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            HEADER_ROW
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    if !styled {
        table.force_no_tty();
    }

    for repo in repos {
        let license = match &repo.shortname {
            Some(display) => Cell::new(&display.name).fg(display.color),
            None => Cell::new(repo.license.as_deref().unwrap_or("")),
        };

        table.add_row(vec![
            Cell::new(&repo.name),
            Cell::new(&repo.url).fg(Color::Blue),
            license,
            Cell::new(&repo.version),
        ]);
    }

    writeln!(out, "{}", table)?;
    Ok(())
}

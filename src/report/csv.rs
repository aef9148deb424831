use std::io::Write;

use anyhow::Result;

use crate::models::Repository;

use super::HEADER_ROW;

pub fn render(repos: &[Repository], out: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER_ROW)?;

    for repo in repos {
        writer.write_record([
            repo.name.as_str(),
            repo.url.as_str(),
            repo.license.as_deref().unwrap_or(""),
            repo.version.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

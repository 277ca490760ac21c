use crate::error::Result;

/// Open a bookmark in the system browser
pub fn open_url(url: &str) -> Result<()> {
    open::that(url)?;
    Ok(())
}

use super::{AppContext, PortCommand};
use log::debug;
use markport::error::Result;

#[derive(Debug, Clone)]
pub struct DeleteCommand {
    pub id: String,
}

impl PortCommand for DeleteCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        debug!("Removing node {} and its descendants", self.id);
        let removed = ctx.store.remove_tree(&self.id)?;
        eprintln!("Removed {} node(s)", removed);
        Ok(())
    }
}

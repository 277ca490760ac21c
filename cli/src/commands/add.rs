use super::{AppContext, PortCommand};
use log::debug;
use markport::error::Result;
use markport::models::CreateDetails;
use markport::store::BookmarkStore;

#[derive(Debug, Clone)]
pub struct AddCommand {
    pub title: String,
    pub url: Option<String>,
    pub parent: Option<String>,
}

impl PortCommand for AddCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let details = CreateDetails {
            parent_id: self.parent.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
        };
        debug!("Creating {:?} under {:?}", details.node_type(), details.parent_id);
        let node = ctx.store.create(&details)?;
        eprintln!(
            "Added {} '{}' at id {}",
            node.kind().as_str(),
            node.title(),
            node.id_str()
        );
        Ok(())
    }
}

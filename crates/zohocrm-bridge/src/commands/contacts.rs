//! Contact commands.

use serde_json::json;

use crate::adapter::{CallContext, ZohoAdapter};
use crate::cli::ContactsAction;
use crate::error::BridgeResult;

use super::print_json;

/// Runs a contact action for the given account.
pub async fn run(
    adapter: &ZohoAdapter,
    context: &CallContext,
    action: ContactsAction,
) -> BridgeResult<()> {
    match action {
        ContactsAction::List => {
            let contacts = adapter.get_contacts(context).await?;
            print_json(&contacts)
        }
        ContactsAction::Create { fields } => {
            let contact = adapter.create_contact(context, fields.into()).await?;
            print_json(&contact)
        }
        ContactsAction::Update { id, fields } => {
            let contact = adapter.update_contact(context, &id, fields.into()).await?;
            print_json(&contact)
        }
        ContactsAction::Delete { id } => {
            adapter.delete_contact(context, &id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

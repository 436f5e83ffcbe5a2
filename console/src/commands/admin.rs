use super::{print_json, KeysCommand, UsersCommand};
use cosign_http::types::SignRequest;
use cosign_http::ConsoleApi;
use serde_json::json;

pub async fn sign(api: &ConsoleApi, q1: String, e: String) -> anyhow::Result<()> {
    let response = api.sign(&SignRequest::new(q1, e)).await?;
    print_json(&response)
}

pub async fn keys(api: &ConsoleApi, action: KeysCommand) -> anyhow::Result<()> {
    match action {
        KeysCommand::List => print_json(&api.list_keys().await?),
        KeysCommand::Delete { id } => {
            api.delete_key(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn users(api: &ConsoleApi, action: UsersCommand) -> anyhow::Result<()> {
    match action {
        UsersCommand::List => print_json(&api.list_users().await?),
        UsersCommand::Get { id } => print_json(&api.get_user(&id).await?),
        UsersCommand::Delete { id } => {
            api.delete_user(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
        UsersCommand::Status { id, status } => {
            api.update_user_status(&id, status).await?;
            print_json(&json!({ "id": id, "status": status }))
        }
    }
}

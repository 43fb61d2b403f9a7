//! MongoDB client bootstrap.
//!
//! Connects, verifies the deployment with a ping, and ensures the indexes
//! the adapters rely on: the unique username index backs duplicate-username
//! detection at insert time.

use bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use tracing::info;

use super::documents::{NotificationDocument, UserDocument};

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const MESSAGES: &str = "messages";
pub const FRIENDSHIPS: &str = "friendships";
pub const NOTIFICATIONS: &str = "notifications";
pub const TEXT_FILES: &str = "text_files";

/// Connect to the deployment at `url` and open `database`.
pub async fn connect(url: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(url).await?;
    let db = client.database(database);
    db.run_command(doc! { "ping": 1 }).await?;
    ensure_indexes(&db).await?;
    info!(database, "connected to mongodb");
    Ok(db)
}

async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let unique_username = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<UserDocument>(USERS)
        .create_index(unique_username)
        .await?;

    let inbox = IndexModel::builder()
        .keys(doc! { "recipient_id": 1, "created_at": -1 })
        .build();
    db.collection::<NotificationDocument>(NOTIFICATIONS)
        .create_index(inbox)
        .await?;

    Ok(())
}

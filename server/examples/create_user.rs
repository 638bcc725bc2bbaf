//! Create a login account.
//!
//! Usage: `cargo run --example create_user -- <email> <password> <role> [lecturer_id]`
//! Reads `DATABASE_URL` from the environment or `.env`.

use anyhow::{bail, Context, Result};
use studyplan_server::auth::hash_password;
use studyplan_server::db;
use studyplan_server::permissions::Role;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [email, password, role, rest @ ..] = args.as_slice() else {
        bail!("Usage: create_user <email> <password> <role> [lecturer_id]");
    };
    let role: Role = role.parse()?;
    let lecturer_id = rest
        .first()
        .map(|id| Uuid::parse_str(id))
        .transpose()
        .context("lecturer_id must be a UUID")?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::create_pool(&database_url, 1).await?;
    db::run_migrations(&pool).await?;

    let hash = hash_password(password)?;
    let user = db::create_user(&pool, email, &hash, role, lecturer_id).await?;
    println!("Created {} user {} ({})", user.role, user.email, user.id);
    Ok(())
}

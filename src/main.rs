use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cms_console::api::CmsApi;
use cms_console::auth;
use cms_console::cache::QueryCache;
use cms_console::client::ApiClient;
use cms_console::config::{ArticlesCommand, CliArgs, Command, Config, SettingsCommand, UsersCommand};
use cms_console::models::{
    self, ArticleFilters, CreateArticleInput, CreateUserInput, UpdateArticleInput, UpdateUserInput,
    UserFilters,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap resolves env-backed arguments
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = Config::from_args(&args)?;
    config.validate()?;

    // Logging goes to stderr so stdout stays clean for command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(base_url = %config.base_url, "CMS console starting");

    let store = Arc::new(auth::SqliteTokenStore::new(&config.token_db)?);
    let client = ApiClient::new(
        &config.base_url,
        store,
        config.connect_timeout,
        config.request_timeout,
    )?
    .with_session_expired_hook(|| {
        eprintln!("Session expired. Run `cms-console login` to sign in again.");
    });

    let cache = if config.no_cache {
        QueryCache::disabled()
    } else {
        QueryCache::new(Duration::from_secs(config.cache_ttl))
    };
    let api = CmsApi::new(client, cache);

    match args.command {
        Command::Login { email } => run_login(&api, email).await,
        Command::Logout => {
            api.logout().await?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = api.me().await?;
            print_json(&user)
        }
        Command::Refresh => {
            let token = api.refresh_session().await?;
            println!(
                "Access token refreshed (token: {}...)",
                &token[..20.min(token.len())]
            );
            Ok(())
        }
        Command::ChangePassword => run_change_password(&api).await,
        Command::Articles { command } => run_articles(&api, command).await,
        Command::Users { command } => run_users(&api, command).await,
        Command::Settings { command } => run_settings(&api, command).await,
        Command::Upload { kind, file } => {
            let result = api.upload(kind, &file).await?;
            print_json(&result)
        }
        Command::Dashboard => run_dashboard(&api).await,
    }
}

async fn run_login(api: &CmsApi, email: Option<String>) -> Result<()> {
    let email: String = match email {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let password: String = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    let session = api.login(&email, &password).await?;
    println!("Signed in as {} ({})", session.user.email, role_name(session.user.role));
    Ok(())
}

async fn run_change_password(api: &CmsApi) -> Result<()> {
    let current: String = dialoguer::Password::new()
        .with_prompt("Current password")
        .interact()
        .context("Failed to read current password")?;
    let new: String = dialoguer::Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "Passwords do not match")
        .interact()
        .context("Failed to read new password")?;

    api.change_password(&current, &new).await?;
    println!("Password changed");
    Ok(())
}

async fn run_articles(api: &CmsApi, command: ArticlesCommand) -> Result<()> {
    match command {
        ArticlesCommand::List {
            page,
            limit,
            status,
            visibility,
            search,
            public,
        } => {
            let filters = ArticleFilters {
                page,
                limit,
                status,
                visibility,
                search,
                author_id: None,
            };
            let result = if public {
                api.list_public_articles(&filters).await?
            } else {
                api.list_articles(&filters).await?
            };

            for article in &result.articles {
                println!(
                    "{}  {:<9}  {:<12}  {}",
                    article.id,
                    status_name(article.status),
                    article.slug,
                    article.title
                );
            }
            println!(
                "page {}/{} ({} total)",
                result.meta.page, result.meta.total_pages, result.meta.total
            );
            Ok(())
        }
        ArticlesCommand::Get { id, public } => {
            let article = if public {
                api.get_public_article(&id).await?
            } else {
                api.get_article(&id).await?
            };
            print_json(&article)
        }
        ArticlesCommand::Create {
            title,
            slug,
            content_file,
            excerpt,
            thumbnail_url,
            status,
            visibility,
            meta_title,
            meta_description,
        } => {
            let content = tokio::fs::read_to_string(&content_file)
                .await
                .with_context(|| format!("Failed to read {}", content_file.display()))?;
            let input = CreateArticleInput {
                title,
                slug,
                content,
                excerpt,
                thumbnail_url,
                status,
                visibility,
                meta_title,
                meta_description,
                published_at: None,
            };
            let article = api.create_article(&input).await?;
            println!("Created article {}", article.id);
            print_json(&article)
        }
        ArticlesCommand::Update {
            id,
            title,
            slug,
            content_file,
            excerpt,
            thumbnail_url,
            status,
            visibility,
        } => {
            let content = match content_file {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                ),
                None => None,
            };
            let input = UpdateArticleInput {
                title,
                slug,
                content,
                excerpt,
                thumbnail_url,
                status,
                visibility,
                ..Default::default()
            };
            let article = api.update_article(&id, &input).await?;
            print_json(&article)
        }
        ArticlesCommand::Delete { id } => {
            api.delete_article(&id).await?;
            println!("Deleted article {}", id);
            Ok(())
        }
    }
}

async fn run_users(api: &CmsApi, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List {
            role,
            active,
            search,
        } => {
            let filters = UserFilters {
                role,
                is_active: active,
                search,
            };
            let users = api.list_users(&filters).await?;
            for user in &users {
                println!(
                    "{}  {:<7}  {:<8}  {}  <{}>",
                    user.id,
                    role_name(user.role),
                    if user.is_active { "active" } else { "inactive" },
                    user.name,
                    user.email
                );
            }
            Ok(())
        }
        UsersCommand::Create { email, name, role } => {
            let password: String = dialoguer::Password::new()
                .with_prompt("Password for the new account")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .context("Failed to read password")?;

            let user = api
                .create_user(&CreateUserInput {
                    email,
                    name,
                    role,
                    password,
                })
                .await?;
            println!("Created user {}", user.id);
            print_json(&user)
        }
        UsersCommand::Update {
            id,
            email,
            name,
            role,
        } => {
            let user = api
                .update_user(
                    &id,
                    &UpdateUserInput {
                        email,
                        name,
                        role,
                        password: None,
                    },
                )
                .await?;
            print_json(&user)
        }
        UsersCommand::Activate { id } => {
            let user = api.set_user_active(&id, true).await?;
            println!("Activated {}", user.email);
            Ok(())
        }
        UsersCommand::Deactivate { id } => {
            let user = api.set_user_active(&id, false).await?;
            println!("Deactivated {}", user.email);
            Ok(())
        }
        UsersCommand::Delete { id } => {
            api.delete_user(&id).await?;
            println!("Deleted user {}", id);
            Ok(())
        }
    }
}

async fn run_settings(api: &CmsApi, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::List { public } => {
            let settings = if public {
                api.list_public_settings().await?
            } else {
                api.list_settings().await?
            };
            for setting in &settings {
                println!(
                    "{:<30} {}  {}",
                    setting.key,
                    if setting.is_public { "public " } else { "private" },
                    setting.value
                );
            }
            Ok(())
        }
        SettingsCommand::Get { key } => {
            let settings = api.list_settings().await?;
            let setting = settings
                .into_iter()
                .find(|s| s.key == key)
                .with_context(|| format!("Setting not found: {}", key))?;
            print_json(&setting)
        }
        SettingsCommand::Set { key, value } => {
            let setting = api.update_setting(&key, &value).await?;
            println!("{} = {}", setting.key, setting.value);
            Ok(())
        }
        SettingsCommand::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let settings: HashMap<String, String> =
                serde_json::from_str(&raw).context("Settings file must be a JSON object of strings")?;

            let updated = api.update_settings(settings).await?;
            println!("Updated {} settings", updated.len());
            Ok(())
        }
    }
}

async fn run_dashboard(api: &CmsApi) -> Result<()> {
    let dashboard = api.dashboard_stats().await?;
    let stats = &dashboard.stats;
    println!(
        "articles: {} total, {} published, {} drafts",
        stats.total_articles, stats.published_articles, stats.draft_articles
    );
    println!("users:    {}", stats.total_users);
    println!("views:    {}", stats.total_views);

    if !dashboard.recent_articles.is_empty() {
        println!("recent:");
        for article in &dashboard.recent_articles {
            println!("  {}  {}", article.id, article.title);
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn role_name(role: models::UserRole) -> &'static str {
    match role {
        models::UserRole::Admin => "admin",
        models::UserRole::Editor => "editor",
        models::UserRole::Viewer => "viewer",
    }
}

fn status_name(status: models::ArticleStatus) -> &'static str {
    match status {
        models::ArticleStatus::Draft => "draft",
        models::ArticleStatus::Published => "published",
        models::ArticleStatus::Archived => "archived",
    }
}

//! CLI entry point for the blog core.
//!
//! # Responsibility
//! - Wire configuration, logging and storage the way an embedding app would.
//! - Print JSON DTOs so output is deterministic for quick sanity checks.
//!
//! Usage: `blogpost_cli [version|demo|posts]` (default `version`).

use blogpost_core::db::{open_db_in_memory, open_db_with_options};
use blogpost_core::dto::{map_all, CommentResponse, PostResponse};
use blogpost_core::{
    core_version, init_logging, BlogService, CoreConfig, NewPostDetail, SqliteBlogRepository,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }

    let command = std::env::args().nth(1).unwrap_or_else(|| "version".to_string());
    if command == "version" {
        println!("blogpost_core version={}", core_version());
        return Ok(());
    }

    let mut conn = match config.db_path.as_deref() {
        Some(path) => open_db_with_options(path, &config.db_options)?,
        None => open_db_in_memory()?,
    };
    let mut service = BlogService::new(SqliteBlogRepository::try_new(&mut conn)?);

    match command.as_str() {
        "demo" => {
            let post = service.add_post("Hello", &NewPostDetail::new("demo"))?;
            let comment = service.add_comment(post.id, "nice post")?;
            let post = service.tag_post(post.id, "demo")?;
            println!("{}", serde_json::to_string_pretty(&PostResponse::from(&post))?);
            println!(
                "{}",
                serde_json::to_string_pretty(&CommentResponse::from(&comment))?
            );
        }
        "posts" => {
            let posts = service.get_all_posts()?;
            let responses: Vec<PostResponse> = map_all(&posts);
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        other => return Err(format!("unknown command `{other}`; expected version|demo|posts").into()),
    }

    Ok(())
}

#[macro_use]
extern crate rocket;

mod app;
mod cli;
mod config;
mod dom;
mod error;
mod fallback;
mod filter;
mod generator;
mod loader;
mod models;
mod nav;
mod page;
mod prefs;
mod render;
mod seo;
mod serve;
mod watch;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use app::AppContext;
use cli::{split_list, CliArgs, Command, ThemeAction};
use config::SiteConfig;
use error::AppError;
use filter::FilterController;
use generator::{add_project, remove_project, Generator};
use loader::{Origin, PageKind};

fn main() {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let root = match args.config.as_deref().and_then(|p| p.parent()) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut config = SiteConfig::load(args.config.as_deref(), &root)?;
    args.apply_overrides(&mut config);
    let ctx = AppContext::new(config, root);

    match args.command.unwrap_or(Command::Build) {
        Command::Build => {
            let report = Generator::new(&ctx)?.build(&ctx.project_source())?;
            let from = match &report.origin {
                Origin::Resolved(label) => label.clone(),
                Origin::Fallback => "embedded sample projects".to_string(),
            };
            println!(
                "Generated {} project pages ({} files) in {} from {}",
                report.project_count,
                report.written.len(),
                ctx.output_dir().display(),
                from
            );
        }
        Command::Add {
            title,
            description,
            technologies,
            features,
        } => {
            let project = add_project(
                &ctx,
                &title,
                &description,
                split_list(technologies.as_deref()),
                split_list(features.as_deref()),
            )?;
            println!("Added new project: {} ({})", project.title, project.slug);
        }
        Command::Remove { id } => {
            let project = remove_project(&ctx, &id)?;
            println!("Removed project: {}", project.title);
        }
        Command::Search { category, query } => {
            let loaded = ctx.project_source().load(PageKind::Listing)?;
            let mut controller = FilterController::new(loaded.collection, ctx.config.debounce());
            if let Some(c) = category.as_deref() {
                controller.on_category_change(c);
            }
            if let Some(q) = query.as_deref() {
                controller.submit_search(q);
            }
            if controller.is_empty_result() {
                println!("No projects found");
            }
            for p in controller.visible() {
                let year = p.year.map(|y| y.to_string()).unwrap_or_default();
                println!("{}\t{}\t{}\t{}", p.slug, p.title, year, p.tags.join(","));
            }
            println!(
                "Showing {} of {} projects",
                controller.visible().len(),
                controller.total()
            );
        }
        Command::Theme { action } => {
            let mut toggle = ctx.theme_toggle();
            let theme = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => toggle.current(),
                ThemeAction::Light => toggle.set(prefs::Theme::Light)?,
                ThemeAction::Dark => toggle.set(prefs::Theme::Dark)?,
                ThemeAction::Toggle => toggle.toggle()?,
                ThemeAction::Reset => toggle.clear()?,
            };
            let source = if toggle.is_stored() { "stored" } else { "default" };
            println!("{} ({})", theme, source);
        }
        Command::Serve { port, watch } => {
            let port = port.unwrap_or(ctx.config.serve_port);
            let out = ctx.output_dir();
            std::fs::create_dir_all(&out)
                .map_err(|e| AppError::Generate(error::GenerateError::io(&out, e)))?;
            info!("Preview API at http://127.0.0.1:{}/api/projects", port);
            let mut server = serve::rocket(ctx, port);
            if watch {
                server = server.attach(watch::RebuildOnChange);
            }
            rocket::execute(server.launch())
                .map(|_| ())
                .map_err(|e| AppError::Serve(e.to_string()))?;
        }
    }
    Ok(())
}

use chrono::Local;
use log::{error, info, warn};
use rocket::fs::FileServer;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::tokio::task::spawn_blocking;
use rocket::{Build, Request, Rocket, State};
use serde_json::{json, Value};

use crate::app::AppContext;
use crate::filter::FilterController;
use crate::generator::{Generator, PageOutcome, PageSet};
use crate::loader::PageKind;

/// Filtered listing as JSON. Data is loaded per request and has no
/// fallback, so an unreachable source is reported rather than masked.
#[get("/api/projects?<category>&<q>")]
pub async fn api_projects(
    ctx: &State<AppContext>,
    category: Option<String>,
    q: Option<String>,
) -> Result<Json<Value>, Custom<Json<Value>>> {
    let ctx = ctx.inner().clone();
    let loaded = spawn_blocking(move || {
        let source = ctx.project_source();
        source.load(PageKind::Listing).map(|l| (l, ctx.config.debounce()))
    })
    .await
    .map_err(|e| {
        error!("Project load task failed: {}", e);
        Custom(Status::InternalServerError, Json(json!({ "error": "internal error" })))
    })?;

    let (loaded, debounce) = loaded.map_err(|e| {
        warn!("/api/projects: {}", e);
        Custom(Status::ServiceUnavailable, Json(json!({ "error": e.to_string() })))
    })?;

    let mut controller = FilterController::new(loaded.collection, debounce);
    if let Some(c) = category.as_deref() {
        controller.on_category_change(c);
    }
    if let Some(q) = q.as_deref() {
        controller.submit_search(q);
    }

    Ok(Json(json!({
        "category": controller.state().selected_category(),
        "query": controller.state().search_term(),
        "shown": controller.visible().len(),
        "total": controller.total(),
        "projects": controller.visible(),
    })))
}

fn generator_for(ctx: &AppContext) -> Generator<'_> {
    match Generator::new(ctx) {
        Ok(g) => g,
        Err(e) => {
            warn!("Falling back to built-in templates: {}", e);
            Generator::with_parts(
                ctx,
                PageSet::builtin(),
                ctx.config.default_theme,
                Local::now().date_naive(),
            )
        }
    }
}

/// Homepage rendered from current data, without a build.
#[get("/preview")]
pub async fn preview_home(ctx: &State<AppContext>) -> RawHtml<String> {
    let ctx = ctx.inner().clone();
    let html = spawn_blocking(move || {
        let loaded = ctx.project_source().load(PageKind::Home);
        let gen = generator_for(&ctx);
        match loaded {
            Ok(l) => gen.render_home(Some(&l.collection)),
            Err(e) => {
                warn!("Preview homepage: {}", e);
                gen.render_home(None)
            }
        }
    })
    .await
    .unwrap_or_else(|e| format!("<p>preview failed: {}</p>", e));
    RawHtml(html)
}

/// Detail page rendered on demand; unknown slugs get the 404 page.
#[get("/preview/projects/<file>")]
pub async fn preview_project(ctx: &State<AppContext>, file: &str) -> Custom<RawHtml<String>> {
    let ctx = ctx.inner().clone();
    let path = format!("/projects/{}", file);
    let outcome = spawn_blocking(move || {
        let loaded = ctx.project_source().load(PageKind::Detail);
        generator_for(&ctx).resolve_detail(loaded.as_ref(), &path)
    })
    .await;

    match outcome {
        Ok(page) => {
            let status = match page {
                PageOutcome::Found(_) => Status::Ok,
                PageOutcome::NotFound(_) => Status::NotFound,
                PageOutcome::Error(_) => Status::InternalServerError,
            };
            Custom(status, RawHtml(page.html().to_string()))
        }
        Err(e) => Custom(
            Status::InternalServerError,
            RawHtml(format!("<p>preview failed: {}</p>", e)),
        ),
    }
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> RawHtml<String> {
    match req.rocket().state::<AppContext>() {
        Some(ctx) => RawHtml(
            Generator::with_parts(
                ctx,
                PageSet::builtin(),
                ctx.config.default_theme,
                Local::now().date_naive(),
            )
            .render_not_found(),
        ),
        None => RawHtml("<h1>404</h1><p>Page not found.</p><a href='/'>Home</a>".to_string()),
    }
}

pub fn rocket(ctx: AppContext, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("port", port));
    let static_dir = ctx.output_dir();
    info!("Serving {} on port {}", static_dir.display(), port);

    rocket::custom(figment)
        .mount("/", routes![api_projects, preview_home, preview_project])
        .mount("/", FileServer::from(static_dir))
        .register("/", catchers![not_found])
        .manage(ctx)
}

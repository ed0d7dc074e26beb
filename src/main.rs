use std::{process, sync::Arc};

use brezza::{
    application::{assembler::PageAssembler, error::AppError},
    config,
    domain::content::{Category, Locale},
    domain::listing::published_for,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        manifest, telemetry,
        view_store::RestViewStore,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Check(_) => run_check(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let registry = manifest::load(&settings.content.manifest)
        .await
        .map_err(AppError::from)?;
    let store = RestViewStore::new(&settings.view_store).map_err(AppError::from)?;

    let assembler = Arc::new(PageAssembler::new(Arc::new(registry), Arc::new(store)));
    let router = http::build_router(HttpState { assembler });

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "brezza::serve",
        addr = %settings.server.public_addr,
        "serving public site"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_check(settings: config::Settings) -> Result<(), AppError> {
    let registry = manifest::load(&settings.content.manifest)
        .await
        .map_err(AppError::from)?;

    for category in [Category::Blogs, Category::Projects] {
        for lang in Locale::ALL {
            let published = published_for(&registry, category, lang).len();
            info!(
                target = "brezza::check",
                category = %category,
                lang = %lang,
                published,
                "publishable items"
            );
        }
    }

    info!(
        target = "brezza::check",
        total = registry.len(),
        "manifest is valid"
    );
    Ok(())
}

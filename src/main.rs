//! Biblioteca admin - command line front end
//!
//! Each invocation restores the persisted session, runs the route guards of
//! the page it touches, and prints the page state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use biblioteca_admin::{
    config::{AppConfig, LoggingConfig},
    menu,
    models::NombreForm,
    notice::Notice,
    routes::{self, GuardOutcome, Redirect, Route},
    services::{CatalogFilter, ListPage, PageResource},
    session::FileStorage,
    table::{Sort, SortDirection},
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "biblioteca-admin", version, about = "Biblioteca library administration client")]
struct Cli {
    /// Session file, overriding `session.storage_path`
    #[arg(long, env = "BIBLIOTECA_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BIBLIOTECA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Navigation entries for the current role
    Menu,
    List {
        collection: Collection,
        #[command(flatten)]
        view: ListArgs,
    },
    Show {
        collection: Collection,
        id: String,
    },
    Delete {
        collection: Collection,
        id: String,
    },
    /// Create or rename an author or genre
    SaveName {
        collection: NamedCollection,
        nombre: String,
        /// Existing id; creates a new entry when absent
        #[arg(long)]
        id: Option<String>,
    },
    /// Browse the book catalogue
    Catalog {
        #[arg(long, default_value = "")]
        titulo: String,
        #[arg(long, default_value = "")]
        autor: String,
        #[arg(long, default_value = "")]
        genero: String,
    },
    /// Borrow a book for the signed-in user
    Borrow {
        libro_id: String,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    /// Status value, or `all`
    #[arg(long)]
    status: Option<String>,
    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    desc: bool,
    /// 1-based page number
    #[arg(long)]
    page: Option<usize>,
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Collection {
    Libros,
    Autores,
    Generos,
    Prestamos,
}

impl Collection {
    fn route(self) -> Route {
        match self {
            Collection::Libros => Route::Libros,
            Collection::Autores => Route::Autores,
            Collection::Generos => Route::Generos,
            Collection::Prestamos => Route::Prestamos,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NamedCollection {
    Autores,
    Generos,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging);

    if let Some(path) = cli.session_file {
        config.session.storage_path = path;
    }
    let storage = Arc::new(FileStorage::new(config.session.storage_path.clone()));
    let state = AppState::new(config, storage)?;

    let _session_log = state
        .session
        .subscribe(|session| tracing::debug!(state = ?session.state(), "Session state"));

    tracing::debug!("Starting Biblioteca admin v{}", env!("CARGO_PKG_VERSION"));
    run(cli.command, &state).await
}

fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblioteca_admin={}", config.level).into());

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "biblioteca-admin.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if config.format == "json" {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
    guard
}

async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    let services = &state.services;
    match command {
        Command::Login { email, password } => {
            if let GuardOutcome::Redirect(route) = routes::guard(Route::Login, &state.session) {
                println!("Ya existe una sesión activa ({})", route);
                return Ok(());
            }
            match services.auth.login(&email, &password).await {
                Ok(Redirect(route)) => {
                    if let Some(user) = state.session.user() {
                        println!("Bienvenido, {} ({})", user.nombre, user.tipo_usuario);
                    }
                    println!("-> {}", route);
                }
                Err(e) => {
                    print_notices(vec![e.notice()]);
                    return Err(e.into());
                }
            }
        }
        Command::Logout => {
            let Redirect(route) = services.auth.logout();
            println!("Sesión cerrada -> {}", route);
        }
        Command::Whoami => match state.session.user() {
            Some(user) if state.session.is_authenticated() => {
                println!("{} <{}> [{}]", user.nombre, user.email, user.tipo_usuario);
            }
            _ => println!("Sin sesión"),
        },
        Command::Menu => {
            require(Route::Dashboard, state)?;
            if let Some(role) = state.session.role() {
                for item in menu::visible_for(role) {
                    println!("{:<12} {:<16} {}", item.title, item.icon, item.route);
                }
            }
        }
        Command::List { collection, view } => {
            require(collection.route(), state)?;
            match collection {
                Collection::Libros => list(services.libros(), &view).await?,
                Collection::Autores => list(services.autores(), &view).await?,
                Collection::Generos => list(services.generos(), &view).await?,
                Collection::Prestamos => list(services.prestamos(), &view).await?,
            }
        }
        Command::Show { collection, id } => {
            require(collection.route(), state)?;
            match collection {
                Collection::Libros => show(services.libros(), &id).await?,
                Collection::Autores => show(services.autores(), &id).await?,
                Collection::Generos => show(services.generos(), &id).await?,
                Collection::Prestamos => show(services.prestamos(), &id).await?,
            }
        }
        Command::Delete { collection, id } => {
            require(collection.route(), state)?;
            match collection {
                Collection::Libros => delete(services.libros(), &id).await?,
                Collection::Autores => delete(services.autores(), &id).await?,
                Collection::Generos => delete(services.generos(), &id).await?,
                Collection::Prestamos => delete(services.prestamos(), &id).await?,
            }
        }
        Command::SaveName { collection, nombre, id } => {
            let form = NombreForm::new(nombre);
            match collection {
                NamedCollection::Autores => {
                    require(Route::Autores, state)?;
                    save_name(services.autores(), id.as_deref(), form).await?
                }
                NamedCollection::Generos => {
                    require(Route::Generos, state)?;
                    save_name(services.generos(), id.as_deref(), form).await?
                }
            }
        }
        Command::Catalog { titulo, autor, genero } => {
            require(Route::Dashboard, state)?;
            let mut dashboard = services.dashboard();
            dashboard.load().await?;
            dashboard.apply_filters(CatalogFilter {
                titulo,
                nombre_autor: autor,
                nombre_genero: genero,
            });
            for libro in dashboard.filtered_books() {
                println!(
                    "{:>4} | {} | {} | {} | {}",
                    libro.id, libro.titulo, libro.nombre_autor, libro.nombre_genero, libro.estado.label()
                );
            }
        }
        Command::Borrow { libro_id } => {
            require(Route::Dashboard, state)?;
            let mut dashboard = services.dashboard();
            dashboard.load().await?;
            let result = dashboard.borrow(&libro_id).await;
            print_notices(dashboard.take_notices());
            result?;
        }
    }
    Ok(())
}

/// Run the guards of `route`, failing when they redirect
fn require(route: Route, state: &AppState) -> anyhow::Result<()> {
    match routes::guard(route, &state.session) {
        GuardOutcome::Allow => Ok(()),
        GuardOutcome::Redirect(to) => anyhow::bail!("Acceso denegado a {}, redirigido a {}", route, to),
    }
}

async fn list<R: PageResource>(mut page: ListPage<R>, view: &ListArgs) -> anyhow::Result<()> {
    let loaded = page.load().await;
    print_notices(page.take_notices());
    loaded?;

    let table = page.table_mut();
    if let Some(search) = &view.search {
        table.apply_filter(search);
    }
    if let Some(status) = &view.status {
        table.filter_by_status(status);
    }
    if let Some(column) = &view.sort {
        let direction = if view.desc { SortDirection::Desc } else { SortDirection::Asc };
        if !table.sort_by(Sort::new(column.as_str(), direction)) {
            tracing::warn!(column = %column, "Column is not sortable");
        }
    }
    if let Some(page_size) = view.page_size {
        table.set_page_size(page_size);
    }
    if let Some(number) = view.page {
        table.set_page(number.saturating_sub(1));
    }
    for event in table.take_events() {
        tracing::debug!(?event, "Table event");
    }

    let table = page.table();
    let headers: Vec<&str> = table.columns().iter().map(|c| c.header.as_str()).collect();
    println!("{}", headers.join(" | "));
    for row in table.render_page() {
        let cells: Vec<&str> = row.iter().map(|c| c.as_text()).collect();
        println!("{}", cells.join(" | "));
    }
    let paginator = table.paginator();
    println!(
        "Página {} de {} ({} registros)",
        paginator.page_index() + 1,
        paginator.page_count().max(1),
        table.filtered_len()
    );
    if table.has_filterable_column() {
        let options: Vec<&str> = table.status_options().iter().map(|o| o.value.as_str()).collect();
        println!("Estados: all, {}", options.join(", "));
    }
    Ok(())
}

async fn show<R: PageResource>(mut page: ListPage<R>, id: &str) -> anyhow::Result<()> {
    let detail = page.view(id).await;
    print_notices(page.take_notices());
    print!("{}", detail?);
    Ok(())
}

async fn delete<R: PageResource>(mut page: ListPage<R>, id: &str) -> anyhow::Result<()> {
    let result = page.delete(id).await;
    print_notices(page.take_notices());
    Ok(result?)
}

async fn save_name<R>(mut page: ListPage<R>, id: Option<&str>, form: NombreForm) -> anyhow::Result<()>
where
    R: PageResource<Form = NombreForm>,
{
    // The loaded rows are needed to detect unchanged forms
    if id.is_some() {
        page.load().await?;
    }
    let result = page.save(id, form).await;
    print_notices(page.take_notices());
    result?;
    Ok(())
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        eprintln!("{}", notice);
    }
}

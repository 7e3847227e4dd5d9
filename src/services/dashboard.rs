//! Home page: catalogue browsing and loan requests

use chrono::Local;
use validator::Validate;

use crate::{
    api::{ApiClient, Generos, Libros, Prestamos, ResourceClient},
    error::{AppError, AppResult},
    models::{Genero, Libro, LibroEstado, PrestamoForm},
    notice::Notice,
};

/// Catalogue filter; empty fields do not constrain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the title
    pub titulo: String,
    /// Case-insensitive substring of the author name
    pub nombre_autor: String,
    /// Exact genre name
    pub nombre_genero: String,
}

impl CatalogFilter {
    pub fn matches(&self, libro: &Libro) -> bool {
        contains_ci(&libro.titulo, &self.titulo)
            && contains_ci(&libro.nombre_autor, &self.nombre_autor)
            && (self.nombre_genero.is_empty() || libro.nombre_genero == self.nombre_genero)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowOutcome {
    Requested,
    AlreadyLent,
}

pub struct Dashboard {
    libros: ResourceClient<Libros>,
    generos: ResourceClient<Generos>,
    prestamos: ResourceClient<Prestamos>,
    books: Vec<Libro>,
    genres: Vec<Genero>,
    filter: CatalogFilter,
    notices: Vec<Notice>,
}

impl Dashboard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            libros: ResourceClient::new(api.clone()),
            generos: ResourceClient::new(api.clone()),
            prestamos: ResourceClient::new(api),
            books: Vec::new(),
            genres: Vec::new(),
            filter: CatalogFilter::default(),
            notices: Vec::new(),
        }
    }

    /// Fetch books and genres concurrently
    pub async fn load(&mut self) -> AppResult<()> {
        let (books, genres) = tokio::join!(self.libros.list(), self.generos.list());
        match books {
            Ok(books) => self.books = books,
            Err(e) => {
                tracing::error!("Error loading books: {}", e);
                return Err(e);
            }
        }
        match genres {
            Ok(genres) => self.genres = genres,
            Err(e) => tracing::error!("Error loading genres: {}", e),
        }
        Ok(())
    }

    pub fn set_catalog(&mut self, books: Vec<Libro>, genres: Vec<Genero>) {
        self.books = books;
        self.genres = genres;
    }

    pub fn genres(&self) -> &[Genero] {
        &self.genres
    }

    pub fn apply_filters(&mut self, filter: CatalogFilter) {
        self.filter = filter;
    }

    pub fn reset_filters(&mut self) {
        self.filter = CatalogFilter::default();
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn filtered_books(&self) -> Vec<&Libro> {
        self.books.iter().filter(|l| self.filter.matches(l)).collect()
    }

    /// Request a loan of `libro_id` for the signed-in user, dated today
    pub async fn borrow(&mut self, libro_id: &str) -> AppResult<BorrowOutcome> {
        let Some(libro) = self.books.iter().find(|l| l.id == libro_id) else {
            return Err(AppError::NotFound(format!("libro {}", libro_id)));
        };
        if libro.estado == LibroEstado::Prestado {
            self.notices.push(Notice::info("El libro ya está prestado"));
            return Ok(BorrowOutcome::AlreadyLent);
        }

        let Some(user) = self.prestamos.api().session().user() else {
            return Err(AppError::Authentication("No user signed in".to_string()));
        };
        let form = PrestamoForm {
            libro_id: libro.id.clone(),
            usuario_id: user.id,
            fecha_prestamo: Local::now().date_naive(),
        };
        form.validate()?;

        match self.prestamos.create(&form).await {
            Ok(()) => {
                tracing::info!(libro_id, usuario_id = %form.usuario_id, "Loan requested");
                self.notices.push(Notice::success("Préstamo realizado con éxito"));
                Ok(BorrowOutcome::Requested)
            }
            Err(e) => {
                tracing::error!("Error requesting loan: {}", e);
                self.notices.push(Notice::error("Error al realizar el préstamo"));
                Err(e)
            }
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

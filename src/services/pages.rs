//! List pages: a table view bound to one REST collection
//!
//! Row action buttons only enqueue a [`RowIntent`]; the page drains them and
//! performs the matching request, so table callbacks never block on I/O.

use chrono::Local;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use validator::Validate;

use crate::{
    api::{Autores, Generos, Libros, Prestamos, Resource, ResourceClient},
    config::TableConfig,
    detail::{DetailField, DetailView},
    error::{AppError, AppResult},
    models::{Autor, Genero, Libro, LibroEstado, Prestamo},
    notice::Notice,
    session::SessionChange,
    table::{ActionIcon, ColumnConfig, FilterOption, Formatted, RowAction, TableView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Edit,
    Delete,
    View,
}

impl IntentKind {
    pub fn icon(&self) -> ActionIcon {
        match self {
            IntentKind::Edit => ActionIcon::Edit,
            IntentKind::Delete => ActionIcon::Delete,
            IntentKind::View => ActionIcon::Visibility,
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            IntentKind::Edit => "Editar",
            IntentKind::Delete => "Eliminar",
            IntentKind::View => "Ver",
        }
    }
}

/// A row action the user triggered, identified by entity id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIntent {
    pub kind: IntentKind,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
    /// Form identical to the loaded entity; no request was sent
    Unchanged,
}

#[derive(Debug)]
pub enum IntentOutcome<F> {
    Editing { id: String, form: F },
    Deleted(String),
    Viewed(DetailView),
}

/// Presentation of a resource as a list page
pub trait PageResource: Resource {
    /// Singular display name, e.g. `Libro`
    const LABEL: &'static str;
    const PLURAL: &'static str;
    const INTENTS: &'static [IntentKind] = &[IntentKind::Edit, IntentKind::Delete, IntentKind::View];

    fn columns() -> Vec<ColumnConfig<Self::Entity>>;
    fn detail_title() -> &'static str;
    fn detail_fields() -> Vec<DetailField>;

    fn status_options() -> Vec<FilterOption> {
        Vec::new()
    }
}

impl PageResource for Libros {
    const LABEL: &'static str = "Libro";
    const PLURAL: &'static str = "Libros";

    fn columns() -> Vec<ColumnConfig<Libro>> {
        vec![
            ColumnConfig::new("id", "ID"),
            ColumnConfig::new("titulo", "Título"),
            ColumnConfig::new("nombre_autor", "Autor"),
            ColumnConfig::new("imagen", "Imagen").not_sortable().not_filterable(),
            ColumnConfig::new("nombre_genero", "Género"),
            ColumnConfig::new("descripcion", "Descripción"),
            ColumnConfig::new("estado", "Estado").with_filter_options(LibroEstado::filter_options()),
        ]
    }

    fn detail_title() -> &'static str {
        "Detalles del Libro"
    }

    fn detail_fields() -> Vec<DetailField> {
        vec![
            DetailField::text("id", "ID"),
            DetailField::text("titulo", "Título"),
            DetailField::text("nombre_autor", "Autor"),
            DetailField::text("nombre_genero", "Género"),
            DetailField::text("descripcion", "Descripción"),
            DetailField::text("estado", "Estado"),
            DetailField::image("imagen", "Imagen"),
        ]
    }
}

impl PageResource for Autores {
    const LABEL: &'static str = "Autor";
    const PLURAL: &'static str = "Autores";

    fn columns() -> Vec<ColumnConfig<Autor>> {
        vec![
            ColumnConfig::new("id", "ID"),
            ColumnConfig::new("nombre", "Nombre Autor"),
        ]
    }

    fn detail_title() -> &'static str {
        "Detalles del Autor"
    }

    fn detail_fields() -> Vec<DetailField> {
        vec![
            DetailField::text("id", "ID"),
            DetailField::text("nombre", "Nombre Autor"),
        ]
    }
}

impl PageResource for Generos {
    const LABEL: &'static str = "Género";
    const PLURAL: &'static str = "Géneros";

    fn columns() -> Vec<ColumnConfig<Genero>> {
        vec![
            ColumnConfig::new("id", "ID"),
            ColumnConfig::new("nombre", "Nombre Género"),
        ]
    }

    fn detail_title() -> &'static str {
        "Detalles del Género"
    }

    fn detail_fields() -> Vec<DetailField> {
        vec![
            DetailField::text("id", "ID"),
            DetailField::text("nombre", "Nombre Género"),
        ]
    }
}

impl PageResource for Prestamos {
    const LABEL: &'static str = "Préstamo";
    const PLURAL: &'static str = "Préstamos";
    // Loans are created from the dashboard
    const INTENTS: &'static [IntentKind] = &[IntentKind::Delete, IntentKind::View];

    fn columns() -> Vec<ColumnConfig<Prestamo>> {
        vec![
            ColumnConfig::new("prestamo_id", "ID Préstamo"),
            ColumnConfig::new("libro_titulo", "Título del Libro"),
            ColumnConfig::new("usuario_nombre", "Nombre del Usuario"),
            ColumnConfig::new("fecha_prestamo", "Fecha de Préstamo"),
            ColumnConfig::new("fecha_devolucion_esperada", "Fecha de Devolución Esperada").with_formatter(
                |p: &Prestamo| {
                    let text = p.fecha_devolucion_esperada.format("%Y-%m-%d").to_string();
                    if p.is_overdue(Local::now().date_naive()) {
                        Formatted::Styled { text, class: "text-red-600 font-semibold".to_string() }
                    } else {
                        Formatted::Text(text)
                    }
                },
            ),
        ]
    }

    fn detail_title() -> &'static str {
        "Detalles del Préstamo"
    }

    fn detail_fields() -> Vec<DetailField> {
        vec![
            DetailField::text("prestamo_id", "ID Préstamo"),
            DetailField::text("libro_titulo", "Título del Libro"),
            DetailField::text("usuario_nombre", "Nombre del Usuario"),
            DetailField::text("fecha_prestamo", "Fecha de Préstamo"),
            DetailField::text("fecha_devolucion_esperada", "Fecha de Devolución Esperada"),
            DetailField::text("fecha_devolucion_real", "Fecha de Devolución"),
        ]
    }
}

pub struct ListPage<R: PageResource> {
    client: ResourceClient<R>,
    table: TableView<R::Entity>,
    intents: UnboundedReceiver<RowIntent>,
    notices: Vec<Notice>,
}

impl<R: PageResource> ListPage<R> {
    pub fn new(client: ResourceClient<R>, config: &TableConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actions = R::INTENTS
            .iter()
            .map(|&kind| {
                let tx = tx.clone();
                RowAction::new(kind.icon(), kind.tooltip(), move |row: &R::Entity| {
                    // The receiver lives as long as the page
                    let _ = tx.send(RowIntent { kind, id: R::id(row).to_string() });
                })
            })
            .collect();

        let table = TableView::from_config(R::columns(), config)
            .with_actions(actions)
            .with_status_options(R::status_options())
            .with_labels(format!("Agregar {}", R::LABEL), format!("Buscar {}", R::PLURAL));

        Self {
            client,
            table,
            intents: rx,
            notices: Vec::new(),
        }
    }

    pub fn table(&self) -> &TableView<R::Entity> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableView<R::Entity> {
        &mut self.table
    }

    fn noun() -> String {
        R::LABEL.to_lowercase()
    }

    /// Fetch the collection. On failure the previous rows are kept.
    pub async fn load(&mut self) -> AppResult<()> {
        self.table.is_loading = true;
        let result = self.client.list().await;
        self.table.is_loading = false;

        match result {
            Ok(rows) => {
                tracing::debug!(resource = R::PATH, count = rows.len(), "Loaded");
                self.table.error = None;
                self.table.set_data(rows);
                Ok(())
            }
            Err(e) => {
                let message = format!("Error al cargar {}", R::PLURAL.to_lowercase());
                self.table.error = Some(message.clone());
                Err(self.fail(e, message))
            }
        }
    }

    /// Loaded entity with the given id
    pub fn entity(&self, id: &str) -> Option<&R::Entity> {
        self.table.data().iter().find(|e| R::id(e) == id)
    }

    /// Form prefilled from a loaded entity
    pub fn edit_form(&self, id: &str) -> Option<R::Form> {
        self.entity(id).map(R::form_of)
    }

    /// Create (`id` absent) or update an entity, then reload. A failed reload
    /// only leaves a notice and the table error; the write still succeeded.
    pub async fn save(&mut self, id: Option<&str>, form: R::Form) -> AppResult<SaveOutcome> {
        if let Err(errors) = form.validate() {
            let e = AppError::from(errors);
            self.notices.push(e.notice());
            return Err(e);
        }

        let noun = Self::noun();
        let outcome = match id {
            Some(id) => {
                if self.edit_form(id).as_ref() == Some(&form) {
                    self.notices.push(Notice::info("No hay cambios para actualizar"));
                    return Ok(SaveOutcome::Unchanged);
                }
                if let Err(e) = self.client.update(id, &form).await {
                    return Err(self.fail(e, format!("Error al actualizar el {}", noun)));
                }
                tracing::info!(resource = R::PATH, id, "Updated");
                self.notices.push(Notice::success(format!("{} actualizado con éxito", R::LABEL)));
                SaveOutcome::Updated
            }
            None => {
                if let Err(e) = self.client.create(&form).await {
                    return Err(self.fail(e, format!("Error al agregar el {}", noun)));
                }
                tracing::info!(resource = R::PATH, "Created");
                self.notices.push(Notice::success(format!("{} agregado con éxito", R::LABEL)));
                SaveOutcome::Created
            }
        };

        self.reload().await;
        Ok(outcome)
    }

    pub async fn delete(&mut self, id: &str) -> AppResult<()> {
        let noun = Self::noun();
        if let Err(e) = self.client.delete(id).await {
            return Err(self.fail(
                e,
                format!("No se pudo eliminar el {}. Por favor, intente de nuevo.", noun),
            ));
        }
        tracing::info!(resource = R::PATH, id, "Deleted");
        self.notices
            .push(Notice::success(format!("El {} ha sido eliminado con éxito.", noun)));
        self.reload().await;
        Ok(())
    }

    /// Refresh after a successful write
    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!(resource = R::PATH, "Refresh after write failed: {}", e);
        }
    }

    /// Fetch one entity and render its detail view
    pub async fn view(&mut self, id: &str) -> AppResult<DetailView> {
        match self.client.get(id).await {
            Ok(entity) => Ok(DetailView::render(R::detail_title(), &entity, &R::detail_fields())),
            Err(e) => Err(self.fail(e, format!("Error al obtener detalles del {}", Self::noun()))),
        }
    }

    /// Intents queued by row actions since the last call
    pub fn take_intents(&mut self) -> Vec<RowIntent> {
        let mut intents = Vec::new();
        while let Ok(intent) = self.intents.try_recv() {
            intents.push(intent);
        }
        intents
    }

    /// Drain queued intents and perform them in order
    pub async fn process_intents(&mut self) -> Vec<AppResult<IntentOutcome<R::Form>>> {
        let mut outcomes = Vec::new();
        for RowIntent { kind, id } in self.take_intents() {
            let outcome = match kind {
                IntentKind::Edit => match self.edit_form(&id) {
                    Some(form) => Ok(IntentOutcome::Editing { id, form }),
                    None => Err(AppError::NotFound(format!("{} {}", R::PATH, id))),
                },
                IntentKind::Delete => self.delete(&id).await.map(|_| IntentOutcome::Deleted(id)),
                IntentKind::View => self.view(&id).await.map(IntentOutcome::Viewed),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Log, notify, and drop the session when the backend rejected it
    fn fail(&mut self, e: AppError, message: String) -> AppError {
        tracing::error!(resource = R::PATH, "{}: {}", message, e);
        if e.is_session_rejected() {
            if let Err(err) = self.client.api().session().apply(SessionChange::SignedOut) {
                tracing::warn!("Failed to sign out: {}", err);
            }
            self.notices.push(e.notice());
        } else {
            self.notices.push(Notice::error(message));
        }
        e
    }
}

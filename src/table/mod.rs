//! Generic tabular view: filtering, sorting and pagination over any `Row` collection
//!
//! The view owns the collection it renders but never fetches data. User
//! intents are queued as [`TableEvent`]s and drained by the owning page with
//! [`TableView::take_events`]; row actions run caller-supplied callbacks.

pub mod action;
pub mod column;
pub mod filter;
pub mod paginator;
pub mod sort;
pub mod value;

pub use action::{ActionIcon, RowAction};
pub use column::{CellValue, ColumnConfig, FilterOption, Formatted};
pub use filter::{FilterState, DEFAULT_STATUS_FIELD, STATUS_ALL};
pub use paginator::{PageEvent, Paginator};
pub use sort::{Sort, SortDirection};
pub use value::{FieldValue, Record, Row, SortKind};

use crate::config::TableConfig;

/// Field rendered as an image reference unless configured otherwise
pub const DEFAULT_IMAGE_FIELD: &str = "imagen";

const ACTIONS_COLUMN: &str = "actions";
const IMAGE_CLASS: &str = "w-14 h-14 object-cover rounded-full";

/// Notifications emitted by the view to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Add,
    PageChange(PageEvent),
    SortChange(Sort),
}

pub struct TableView<T: Row> {
    columns: Vec<ColumnConfig<T>>,
    actions: Vec<RowAction<T>>,
    data: Vec<T>,
    /// Indices into `data` after filtering and sorting
    visible: Vec<usize>,
    filter: FilterState,
    sort: Sort,
    paginator: Paginator,
    status_options: Vec<FilterOption>,
    status_field: String,
    image_field: String,
    events: Vec<TableEvent>,
    pub add_button_text: String,
    pub search_placeholder: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T: Row> TableView<T> {
    pub fn new(columns: Vec<ColumnConfig<T>>) -> Self {
        Self::from_config(columns, &TableConfig::default())
    }

    pub fn from_config(columns: Vec<ColumnConfig<T>>, config: &TableConfig) -> Self {
        Self {
            columns,
            actions: Vec::new(),
            data: Vec::new(),
            visible: Vec::new(),
            filter: FilterState::default(),
            sort: Sort::default(),
            paginator: Paginator::new(config.default_page_size, config.page_size_options.clone()),
            status_options: Vec::new(),
            status_field: DEFAULT_STATUS_FIELD.to_string(),
            image_field: DEFAULT_IMAGE_FIELD.to_string(),
            events: Vec::new(),
            add_button_text: "Agregar".to_string(),
            search_placeholder: "Buscar".to_string(),
            is_loading: false,
            error: None,
        }
    }

    pub fn with_actions(mut self, actions: Vec<RowAction<T>>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_status_options(mut self, options: Vec<FilterOption>) -> Self {
        self.status_options = options;
        self
    }

    pub fn with_status_field(mut self, field: impl Into<String>) -> Self {
        self.status_field = field.into();
        self.refresh();
        self
    }

    pub fn with_image_field(mut self, field: impl Into<String>) -> Self {
        self.image_field = field.into();
        self
    }

    pub fn with_default_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self.refresh();
        self
    }

    pub fn with_labels(mut self, add_button_text: impl Into<String>, search_placeholder: impl Into<String>) -> Self {
        self.add_button_text = add_button_text.into();
        self.search_placeholder = search_placeholder.into();
        self
    }

    /// Replace the collection, keeping the current filter and sort
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.refresh();
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn columns(&self) -> &[ColumnConfig<T>] {
        &self.columns
    }

    pub fn actions(&self) -> &[RowAction<T>] {
        &self.actions
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selected_status(&self) -> &str {
        &self.filter.status
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Filter rows by free text; resets to the first page
    pub fn apply_filter(&mut self, text: &str) {
        self.filter.set_search(text);
        self.refresh();
        self.paginator.first_page();
    }

    /// Select a status value (`"all"` disables the status predicate)
    pub fn filter_by_status(&mut self, status: &str) {
        self.filter.set_status(status);
        self.refresh();
        self.paginator.first_page();
    }

    /// Change the sort indicator. Sorting on a non-sortable or unknown
    /// column is ignored and returns `false`.
    pub fn sort_by(&mut self, sort: Sort) -> bool {
        if let Some(column) = sort.column() {
            let sortable = self
                .columns
                .iter()
                .any(|c| c.name == column && c.sortable);
            if !sortable {
                return false;
            }
        }
        self.sort = sort.clone();
        self.refresh();
        self.events.push(TableEvent::SortChange(sort));
        true
    }

    pub fn set_page(&mut self, page_index: usize) -> bool {
        let event = self.paginator.go_to(page_index);
        self.push_page_event(event)
    }

    pub fn next_page(&mut self) -> bool {
        let event = self.paginator.next_page();
        self.push_page_event(event)
    }

    pub fn previous_page(&mut self) -> bool {
        let event = self.paginator.previous_page();
        self.push_page_event(event)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let event = self.paginator.set_page_size(page_size);
        self.push_page_event(event)
    }

    fn push_page_event(&mut self, event: Option<PageEvent>) -> bool {
        match event {
            Some(e) => {
                self.events.push(TableEvent::PageChange(e));
                true
            }
            None => false,
        }
    }

    /// User asked to create a new row
    pub fn request_add(&mut self) {
        self.events.push(TableEvent::Add);
    }

    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of rows passing the current filter
    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// All rows passing the current filter, in sort order
    pub fn filtered_rows(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().map(move |&i| &self.data[i])
    }

    /// Rows on the current page
    pub fn page_rows(&self) -> Vec<&T> {
        self.visible[self.paginator.range()]
            .iter()
            .map(|&i| &self.data[i])
            .collect()
    }

    /// Run an action callback on a row of the current page
    pub fn invoke_action(&self, row_on_page: usize, action_index: usize) -> bool {
        let range = self.paginator.range();
        let Some(&data_index) = self.visible[range].get(row_on_page) else {
            return false;
        };
        match self.actions.get(action_index) {
            Some(action) => {
                action.invoke(&self.data[data_index]);
                true
            }
            None => false,
        }
    }

    /// Column names in display order, plus the actions column when needed
    pub fn displayed_columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        if !self.actions.is_empty() {
            names.push(ACTIONS_COLUMN);
        }
        names
    }

    pub fn has_filterable_column(&self) -> bool {
        self.columns.iter().any(|c| c.filter_options.is_some())
    }

    /// Explicit status options, else those of the first column declaring some
    pub fn status_options(&self) -> &[FilterOption] {
        if !self.status_options.is_empty() {
            return &self.status_options;
        }
        self.columns
            .iter()
            .find_map(|c| c.filter_options.as_deref())
            .unwrap_or(&[])
    }

    pub fn cell(&self, row: &T, column: &ColumnConfig<T>) -> CellValue {
        if column.name == self.image_field {
            return CellValue::Image {
                src: row.field(&column.name).unwrap_or(FieldValue::Null).to_string(),
                class: IMAGE_CLASS.to_string(),
            };
        }
        if let Some(formatted) = column.format(row) {
            return formatted.into();
        }
        CellValue::text(row.field(&column.name).unwrap_or(FieldValue::Null).to_string())
    }

    /// Cells of the current page, one vector per row
    pub fn render_page(&self) -> Vec<Vec<CellValue>> {
        self.page_rows()
            .into_iter()
            .map(|row| self.columns.iter().map(|c| self.cell(row, c)).collect())
            .collect()
    }

    fn refresh(&mut self) {
        let filter = &self.filter;
        let status_field = self.status_field.as_str();
        let mut visible: Vec<usize> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(*row, status_field))
            .map(|(i, _)| i)
            .collect();

        if let Some(column) = self.sort.column() {
            let direction = self.sort.direction;
            let keys: Vec<FieldValue> = self
                .data
                .iter()
                .map(|row| row.field(column).unwrap_or(FieldValue::Null))
                .collect();
            let kind = SortKind::of(visible.iter().map(|&i| &keys[i]));
            visible.sort_by(|&a, &b| direction.apply(keys[a].compare(&keys[b], kind)));
        }

        self.visible = visible;
        self.paginator.set_length(self.visible.len());
    }
}

impl<T: Row> std::fmt::Debug for TableView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableView")
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("visible", &self.visible.len())
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("paginator", &self.paginator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn libro(id: i64, titulo: &str, estado: &str) -> Record {
        let mut r = Record::new();
        r.insert("id".into(), FieldValue::Int(id));
        r.insert("titulo".into(), titulo.into());
        r.insert("estado".into(), estado.into());
        r
    }

    fn columns() -> Vec<ColumnConfig<Record>> {
        vec![
            ColumnConfig::new("id", "ID"),
            ColumnConfig::new("titulo", "Título"),
            ColumnConfig::new("imagen", "Imagen").not_sortable().not_filterable(),
            ColumnConfig::new("estado", "Estado").with_filter_options(vec![
                FilterOption::new("disponible", "Disponible"),
                FilterOption::new("prestado", "Prestado"),
                FilterOption::new("reservado", "Reservado"),
            ]),
        ]
    }

    fn three_books() -> TableView<Record> {
        let mut table = TableView::new(columns());
        table.set_data(vec![
            libro(1, "Cien años de soledad", "disponible"),
            libro(2, "Rayuela", "prestado"),
            libro(3, "Ficciones", "reservado"),
        ]);
        table
    }

    #[test]
    fn test_status_filter_scenario() {
        let mut table = three_books();
        table.filter_by_status("prestado");
        assert_eq!(table.filtered_len(), 1);
        assert_eq!(
            table.page_rows()[0].field("titulo"),
            Some(FieldValue::from("Rayuela"))
        );
        table.filter_by_status(STATUS_ALL);
        assert_eq!(table.filtered_len(), 3);
    }

    #[test]
    fn test_search_scenario() {
        let mut table = three_books();
        table.apply_filter("cien");
        assert_eq!(table.filtered_len(), 1);
        table.apply_filter("xyz");
        assert_eq!(table.filtered_len(), 0);
    }

    #[test]
    fn test_clearing_filter_restores_all_rows() {
        let mut table = three_books();
        for text in ["a", "RAY", "zzz", "  ", "3"] {
            table.apply_filter(text);
            table.apply_filter("");
            assert_eq!(table.filtered_len(), 3);
        }
    }

    #[test]
    fn test_status_all_is_identity_with_search() {
        let mut table = three_books();
        for text in ["a", "ficc", "o", "nothing"] {
            table.filter_by_status(STATUS_ALL);
            table.apply_filter(text);
            let with_all: Vec<_> = table.filtered_rows().cloned().collect();

            let mut search_only = three_books();
            search_only.apply_filter(text);
            let alone: Vec<_> = search_only.filtered_rows().cloned().collect();
            assert_eq!(with_all, alone);
        }
    }

    #[test]
    fn test_combined_search_and_status() {
        let mut table = three_books();
        table.filter_by_status("disponible");
        table.apply_filter("rayuela");
        assert_eq!(table.filtered_len(), 0);
        assert_eq!(table.selected_status(), "disponible");
    }

    #[test]
    fn test_filter_resets_to_first_page() {
        let mut table = TableView::new(columns());
        table.set_data((1..=20).map(|i| libro(i, "Libro", "disponible")).collect());
        assert!(table.set_page(2));
        assert_eq!(table.paginator().page_index(), 2);
        table.apply_filter("libro");
        assert_eq!(table.paginator().page_index(), 0);
    }

    #[test]
    fn test_pagination_emits_page_change() {
        let mut table = TableView::new(columns());
        table.set_data((1..=10).map(|i| libro(i, "Libro", "disponible")).collect());
        assert_eq!(table.page_rows().len(), 8);
        assert!(table.next_page());
        assert_eq!(table.page_rows().len(), 2);
        assert!(!table.next_page());
        let events = table.take_events();
        assert_eq!(
            events,
            vec![TableEvent::PageChange(PageEvent {
                page_index: 1,
                previous_page_index: 0,
                page_size: 8,
                length: 10,
            })]
        );
        assert!(table.take_events().is_empty());
    }

    #[test]
    fn test_sort_desc_by_id_and_event() {
        let mut table = three_books();
        assert!(table.sort_by(Sort::new("id", SortDirection::Desc)));
        let ids: Vec<String> = table
            .filtered_rows()
            .map(|r| r.field("id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert!(matches!(table.take_events()[0], TableEvent::SortChange(_)));
    }

    #[test]
    fn test_sort_mixed_titles_is_ordered() {
        let mut table = TableView::new(columns());
        let titles = ["300", "1984", "1Q84", "2001", "Ficciones", "10"];
        let rows = (0..400)
            .map(|i| libro(i, titles[i as usize % titles.len()], "disponible"))
            .collect();
        table.set_data(rows);
        assert!(table.sort_by(Sort::new("titulo", SortDirection::Asc)));

        let sorted: Vec<String> = table
            .filtered_rows()
            .map(|r| r.field("titulo").unwrap().to_string())
            .collect();
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sorted.first().map(String::as_str), Some("10"));
        assert_eq!(sorted.last().map(String::as_str), Some("Ficciones"));
    }

    #[test]
    fn test_sort_on_unsortable_column_is_ignored() {
        let mut table = three_books();
        assert!(!table.sort_by(Sort::new("imagen", SortDirection::Asc)));
        assert!(table.take_events().is_empty());
    }

    #[test]
    fn test_cell_rendering() {
        let columns = vec![
            ColumnConfig::new("titulo", "Título"),
            ColumnConfig::new("imagen", "Imagen"),
            ColumnConfig::new("estado", "Estado").with_formatter(|r: &Record| Formatted::Styled {
                text: r.field("estado").unwrap_or(FieldValue::Null).to_string().to_uppercase(),
                class: "badge".into(),
            }),
            ColumnConfig::new("missing", "Missing"),
        ];
        let mut table = TableView::new(columns);
        let mut row = libro(1, "Rayuela", "prestado");
        row.insert("imagen".into(), "https://img/rayuela.png".into());
        table.set_data(vec![row]);

        let cells = &table.render_page()[0];
        assert_eq!(cells[0], CellValue::text("Rayuela"));
        assert!(matches!(&cells[1], CellValue::Image { src, .. } if src == "https://img/rayuela.png"));
        assert_eq!(
            cells[2],
            CellValue::Text { text: "PRESTADO".into(), class: Some("badge".into()) }
        );
        assert_eq!(cells[3], CellValue::text(""));
    }

    #[test]
    fn test_actions_column_and_invoke() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut table = three_books().with_actions(vec![RowAction::new(
            "delete",
            "Eliminar",
            move |r: &Record| sink.lock().unwrap().push(r.field("id").unwrap().to_string()),
        )]);
        table.filter_by_status("reservado");

        assert_eq!(table.displayed_columns().last(), Some(&"actions"));
        assert!(table.invoke_action(0, 0));
        assert!(!table.invoke_action(1, 0));
        assert!(!table.invoke_action(0, 1));
        assert_eq!(*seen.lock().unwrap(), vec!["3".to_string()]);
    }

    #[test]
    fn test_status_options_from_column() {
        let table = three_books();
        assert!(table.has_filterable_column());
        assert_eq!(table.status_options().len(), 3);
        assert_eq!(table.status_options()[1].value, "prestado");
    }

    #[test]
    fn test_custom_status_field() {
        let mut table = TableView::new(vec![ColumnConfig::new("situacion", "Situación")])
            .with_status_field("situacion");
        let mut a = Record::new();
        a.insert("situacion".into(), "activo".into());
        let mut b = Record::new();
        b.insert("situacion".into(), "baja".into());
        table.set_data(vec![a, b]);
        table.filter_by_status("baja");
        assert_eq!(table.filtered_len(), 1);
    }

    #[test]
    fn test_set_data_keeps_filter() {
        let mut table = three_books();
        table.apply_filter("rayuela");
        table.set_data(vec![libro(4, "Rayuela (2a ed.)", "disponible"), libro(5, "Pedro Páramo", "prestado")]);
        assert_eq!(table.filtered_len(), 1);
    }

    #[test]
    fn test_add_event() {
        let mut table = three_books();
        table.request_add();
        assert_eq!(table.take_events(), vec![TableEvent::Add]);
    }
}

//! Generic CRUD client for the REST resource collections

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use validator::Validate;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{Autor, Genero, Libro, LibroForm, NombreForm, Prestamo, PrestamoForm},
    table::Row,
};

/// A REST collection exposing list/get/create/update/delete
pub trait Resource: Send + Sync + 'static {
    /// Collection path segment, e.g. `libros`
    const PATH: &'static str;
    type Entity: DeserializeOwned + Row + Clone + Send + Sync + 'static;
    type Form: Serialize + Validate + PartialEq + Clone + Send + Sync + 'static;

    fn id(entity: &Self::Entity) -> &str;
    fn form_of(entity: &Self::Entity) -> Self::Form;
}

pub struct Libros;
pub struct Autores;
pub struct Generos;
pub struct Prestamos;

impl Resource for Libros {
    const PATH: &'static str = "libros";
    type Entity = Libro;
    type Form = LibroForm;

    fn id(entity: &Libro) -> &str {
        &entity.id
    }

    fn form_of(entity: &Libro) -> LibroForm {
        entity.into()
    }
}

impl Resource for Autores {
    const PATH: &'static str = "autores";
    type Entity = Autor;
    type Form = NombreForm;

    fn id(entity: &Autor) -> &str {
        &entity.id
    }

    fn form_of(entity: &Autor) -> NombreForm {
        entity.into()
    }
}

impl Resource for Generos {
    const PATH: &'static str = "generos";
    type Entity = Genero;
    type Form = NombreForm;

    fn id(entity: &Genero) -> &str {
        &entity.id
    }

    fn form_of(entity: &Genero) -> NombreForm {
        entity.into()
    }
}

impl Resource for Prestamos {
    const PATH: &'static str = "prestamos";
    type Entity = Prestamo;
    type Form = PrestamoForm;

    fn id(entity: &Prestamo) -> &str {
        &entity.prestamo_id
    }

    fn form_of(entity: &Prestamo) -> PrestamoForm {
        entity.into()
    }
}

pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn item_url(&self, id: &str) -> String {
        self.api.url(&format!("{}/{}", R::PATH, id))
    }

    /// `GET /{resource}`
    pub async fn list(&self) -> AppResult<Vec<R::Entity>> {
        tracing::debug!(resource = R::PATH, "Listing");
        let url = self.api.url(R::PATH);
        self.api.send_json(self.api.request(Method::GET, &url)).await
    }

    /// `GET /{resource}/{id}`
    pub async fn get(&self, id: &str) -> AppResult<R::Entity> {
        let url = self.item_url(id);
        self.api.send_json(self.api.request(Method::GET, &url)).await
    }

    /// `POST /{resource}`
    pub async fn create(&self, form: &R::Form) -> AppResult<()> {
        tracing::debug!(resource = R::PATH, "Creating");
        let url = self.api.url(R::PATH);
        self.api
            .send_empty(self.api.request(Method::POST, &url).json(form))
            .await
    }

    /// `PUT /{resource}/{id}`
    pub async fn update(&self, id: &str, form: &R::Form) -> AppResult<()> {
        tracing::debug!(resource = R::PATH, id, "Updating");
        let url = self.item_url(id);
        self.api
            .send_empty(self.api.request(Method::PUT, &url).json(form))
            .await
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        tracing::debug!(resource = R::PATH, id, "Deleting");
        let url = self.item_url(id);
        self.api.send_empty(self.api.request(Method::DELETE, &url)).await
    }
}

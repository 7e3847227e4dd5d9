//! Navigation targets and the guards that protect them

use serde::Serialize;

use crate::models::Role;
use crate::session::{SessionChange, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Dashboard,
    Libros,
    Generos,
    Autores,
    Prestamos,
    Reservas,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/auth/login",
            Route::Dashboard => "/admin/dashboard",
            Route::Libros => "/admin/libros",
            Route::Generos => "/admin/libros/generos",
            Route::Autores => "/admin/libros/autores",
            Route::Prestamos => "/admin/prestamos",
            Route::Reservas => "/admin/reservas",
        }
    }

    /// Routes behind the admin layout
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation instruction returned by login/logout and guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect(pub Route);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Route),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Only authenticated sessions pass; anything else is signed out
pub fn is_logged_guard(session: &SessionContext) -> GuardOutcome {
    if session.is_authenticated() {
        return GuardOutcome::Allow;
    }
    sign_out(session);
    GuardOutcome::Redirect(Route::Login)
}

/// Only anonymous sessions pass (login page)
pub fn isnt_logged_guard(session: &SessionContext) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Redirect(Route::Dashboard)
    } else {
        GuardOutcome::Allow
    }
}

/// The user must hold a role the admin tool knows
pub fn role_guard(session: &SessionContext) -> GuardOutcome {
    match session.role() {
        Some(Role::Personal) | Some(Role::Estudiante) => GuardOutcome::Allow,
        None => {
            tracing::warn!("Rejected navigation for user without a valid role");
            sign_out(session);
            GuardOutcome::Redirect(Route::Login)
        }
    }
}

/// Run the guards protecting `route`, in order, stopping at the first redirect
pub fn guard(route: Route, session: &SessionContext) -> GuardOutcome {
    if !route.requires_session() {
        return isnt_logged_guard(session);
    }
    match is_logged_guard(session) {
        GuardOutcome::Allow => role_guard(session),
        redirect => redirect,
    }
}

fn sign_out(session: &SessionContext) {
    if let Err(e) = session.apply(SessionChange::SignedOut) {
        tracing::warn!("Failed to sign out: {}", e);
    }
}

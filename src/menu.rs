//! Side navigation entries and their allowed roles

use crate::models::Role;
use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub route: Route,
    pub title: &'static str,
    /// Material icon name
    pub icon: &'static str,
    pub roles: &'static [Role],
}

const ANY_ROLE: &[Role] = &[Role::Personal, Role::Estudiante];
const STAFF: &[Role] = &[Role::Personal];

pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem { route: Route::Dashboard, title: "Home", icon: "dashboard", roles: ANY_ROLE },
    MenuItem { route: Route::Libros, title: "Libros", icon: "library_books", roles: STAFF },
    MenuItem { route: Route::Generos, title: "Géneros", icon: "category", roles: STAFF },
    MenuItem { route: Route::Autores, title: "Autores", icon: "person", roles: STAFF },
    MenuItem { route: Route::Prestamos, title: "Préstamos", icon: "import_contacts", roles: STAFF },
];

impl MenuItem {
    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

pub fn visible_for(role: Role) -> Vec<&'static MenuItem> {
    MENU_ITEMS.iter().filter(|item| item.allows(role)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_only_see_home() {
        let items = visible_for(Role::Estudiante);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].route, Route::Dashboard);
    }

    #[test]
    fn test_staff_see_everything() {
        assert_eq!(visible_for(Role::Personal).len(), MENU_ITEMS.len());
    }
}

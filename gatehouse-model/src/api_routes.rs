//! Route definitions for the user management API

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/auth/signup";
    pub const LOGOUT: &str = "/auth/logout";
}

pub mod users {
    pub const CURRENT: &str = "/users/me";
    pub const CHANGE_PASSWORD: &str = "/users/me/password";
}

pub mod admin {
    pub const USERS: &str = "/admin/users";
    pub const USER_ACTIVATE: &str = "/admin/users/{id}/activate";
    pub const USER_DEACTIVATE: &str = "/admin/users/{id}/deactivate";
    pub const USER_ROLE: &str = "/admin/users/{id}/role";
    pub const USERS_BULK: &str = "/admin/users/bulk";
}

pub mod utils {
    /// Replace a path parameter with a concrete value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }
}

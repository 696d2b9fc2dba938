// Handlers are grouped by resource: public auth endpoints (register/login)
// and the advertisements CRUD + search surface. Ownership gating happens
// inside the advertisement mutations, after the existence check.
pub mod advertisements;
pub mod auth;

//! Reader/admin view state.
//!
//! The page controller owns one [`ReaderState`] for the lifetime of a session
//! and passes it to whatever draws the current view. Nothing here is global.

use crate::catalog::CategoryFilter;
use crate::model::{sort_newest_first, AuthStatus, DocumentSummary, SessionUser};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Home,
    Document(u64),
    Login,
    Admin,
}

#[derive(Debug, Clone, Default)]
pub struct ReaderState {
    current_user: Option<SessionUser>,
    documents: Vec<DocumentSummary>,
    category: CategoryFilter,
    view: View,
}

impl ReaderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a session check: signed-in users land on the admin view.
    pub fn from_auth(status: AuthStatus) -> Self {
        let mut state = Self::new();
        if status.logged_in {
            state.current_user = status.user;
        }
        state.view = state.landing_view();
        state
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current_user.as_ref()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn landing_view(&self) -> View {
        if self.current_user.is_some() {
            View::Admin
        } else {
            View::Home
        }
    }

    pub fn sign_in(&mut self, user: SessionUser) {
        self.current_user = Some(user);
        self.view = View::Admin;
    }

    pub fn sign_out(&mut self) {
        self.current_user = None;
        self.view = View::Home;
    }

    pub fn show_home(&mut self, documents: Vec<DocumentSummary>) {
        self.documents = documents;
        self.view = View::Home;
    }

    pub fn show_login(&mut self) {
        self.view = View::Login;
    }

    /// Anonymous users are sent to the login view and the list is left as is.
    pub fn show_admin(&mut self, documents: Vec<DocumentSummary>) -> &View {
        if self.current_user.is_none() {
            self.view = View::Login;
        } else {
            self.documents = documents;
            self.view = View::Admin;
        }
        &self.view
    }

    pub fn open_document(&mut self, id: u64) {
        self.view = View::Document(id);
    }

    pub fn filter_by_category(&mut self, filter: CategoryFilter) {
        self.category = filter;
    }

    /// Reader list: current category only, newest first.
    pub fn visible_documents(&self) -> Vec<&DocumentSummary> {
        let mut visible: Vec<&DocumentSummary> = self
            .documents
            .iter()
            .filter(|doc| self.category.matches(&doc.category))
            .collect();
        sort_newest_first(&mut visible);
        visible
    }

    /// Admin table: every document regardless of the category filter.
    pub fn admin_documents(&self) -> Vec<&DocumentSummary> {
        let mut all: Vec<&DocumentSummary> = self.documents.iter().collect();
        sort_newest_first(&mut all);
        all
    }

    pub fn find(&self, id: u64) -> Option<&DocumentSummary> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}

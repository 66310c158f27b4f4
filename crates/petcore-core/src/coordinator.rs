//! Navigation state for the pet screens: a push stack plus one optional sheet.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewRoute {
    Dashboard,
    CreatePet,
    UpdatePet,
    PetProfile,
}

impl ViewRoute {
    pub fn title(self) -> &'static str {
        match self {
            ViewRoute::Dashboard => "My Pets",
            ViewRoute::CreatePet => "Add Pet",
            ViewRoute::UpdatePet => "Edit Pet",
            ViewRoute::PetProfile => "Pet Profile",
        }
    }
}

impl fmt::Display for ViewRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinator {
    pub path: Vec<ViewRoute>,
    pub sheet: Option<ViewRoute>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, route: ViewRoute) {
        debug!(%route, depth = self.path.len() + 1, "navigate");
        self.path.push(route);
    }

    /// Removes the top route; does nothing on an empty stack.
    pub fn pop(&mut self) -> Option<ViewRoute> {
        let popped = self.path.pop();
        if let Some(route) = popped {
            debug!(%route, "pop");
        }
        popped
    }

    pub fn pop_to_root(&mut self) {
        self.path.clear();
    }

    pub fn present(&mut self, route: ViewRoute) {
        debug!(%route, "present sheet");
        self.sheet = Some(route);
    }

    pub fn dismiss_sheet(&mut self) -> Option<ViewRoute> {
        self.sheet.take()
    }

    /// Top of the stack, or the dashboard at the root.
    pub fn current(&self) -> ViewRoute {
        self.path.last().copied().unwrap_or(ViewRoute::Dashboard)
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

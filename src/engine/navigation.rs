/// Screen a navigation entry leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Lesson(String),
    Quiz,
    WordBuilder,
    Search,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropdownId(pub usize);

#[derive(Clone, Debug)]
pub struct DropdownItem {
    pub label: String,
    /// `None` is a placeholder entry: selecting it only closes the menus.
    pub target: Option<Route>,
}

#[derive(Clone, Debug)]
pub enum NavItem {
    Link {
        label: String,
        route: Route,
    },
    Dropdown {
        id: DropdownId,
        label: String,
        items: Vec<DropdownItem>,
    },
}

impl NavItem {
    pub fn label(&self) -> &str {
        match self {
            NavItem::Link { label, .. } | NavItem::Dropdown { label, .. } => label,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NavTree {
    pub items: Vec<NavItem>,
}

impl NavTree {
    pub fn dropdown_items(&self, id: DropdownId) -> Option<&[DropdownItem]> {
        self.items.iter().find_map(|item| match item {
            NavItem::Dropdown { id: did, items, .. } if *did == id => Some(items.as_slice()),
            _ => None,
        })
    }

    pub fn dropdown_at(&self, index: usize) -> Option<DropdownId> {
        match self.items.get(index) {
            Some(NavItem::Dropdown { id, .. }) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Wide terminals: pointer hover opens dropdowns.
    Hover,
    /// Narrow terminals: dropdowns only open on click or key.
    Click,
}

/// Visibility flags for the navigation bar.
///
/// At most one dropdown is open. The collapsible menu and a dropdown may
/// be open together, but opening the menu closes any dropdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavState {
    pub menu_open: bool,
    pub open_dropdown: Option<DropdownId>,
    pub desktop: bool,
}

impl NavState {
    pub fn new(desktop: bool) -> Self {
        Self {
            menu_open: false,
            open_dropdown: None,
            desktop,
        }
    }

    pub fn activation(&self) -> Activation {
        if self.desktop {
            Activation::Hover
        } else {
            Activation::Click
        }
    }

    /// Content scrolling is suspended while the collapsible menu covers it.
    pub fn scroll_locked(&self) -> bool {
        self.menu_open
    }

    pub fn is_open(&self, id: DropdownId) -> bool {
        self.open_dropdown == Some(id)
    }

    pub fn anything_open(&self) -> bool {
        self.menu_open || self.open_dropdown.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    ToggleMenu,
    ToggleDropdown(DropdownId),
    HoverEnter(DropdownId),
    HoverLeave(DropdownId),
    OutsideClick,
    Escape,
    Viewport { desktop: bool },
    /// A dropdown entry was chosen. Navigation itself is the caller's job.
    SelectItem,
}

pub fn is_desktop(width: u16, breakpoint: u16) -> bool {
    width >= breakpoint
}

pub fn transition(state: NavState, event: NavEvent) -> NavState {
    let mut next = state;
    match event {
        NavEvent::ToggleMenu => {
            next.menu_open = !state.menu_open;
            if next.menu_open {
                next.open_dropdown = None;
            }
        }
        NavEvent::ToggleDropdown(id) => {
            next.open_dropdown = if state.is_open(id) { None } else { Some(id) };
        }
        NavEvent::HoverEnter(id) => {
            if state.activation() == Activation::Hover {
                next.open_dropdown = Some(id);
            }
        }
        NavEvent::HoverLeave(id) => {
            if state.activation() == Activation::Hover && state.is_open(id) {
                next.open_dropdown = None;
            }
        }
        NavEvent::OutsideClick | NavEvent::Escape | NavEvent::SelectItem => {
            next.menu_open = false;
            next.open_dropdown = None;
        }
        NavEvent::Viewport { desktop } => {
            next.desktop = desktop;
            if desktop {
                next.menu_open = false;
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: DropdownId = DropdownId(1);
    const B: DropdownId = DropdownId(2);

    fn run(state: NavState, events: &[NavEvent]) -> NavState {
        events.iter().fold(state, |s, e| transition(s, *e))
    }

    #[test]
    fn test_toggle_menu_flips_and_locks_scroll() {
        let s = transition(NavState::new(false), NavEvent::ToggleMenu);
        assert!(s.menu_open);
        assert!(s.scroll_locked());
        let s = transition(s, NavEvent::ToggleMenu);
        assert!(!s.menu_open);
        assert!(!s.scroll_locked());
    }

    #[test]
    fn test_opening_menu_closes_dropdown() {
        let s = run(NavState::new(false), &[NavEvent::ToggleDropdown(A), NavEvent::ToggleMenu]);
        assert!(s.menu_open);
        assert_eq!(s.open_dropdown, None);
    }

    #[test]
    fn test_dropdown_inside_open_menu_keeps_menu() {
        let s = run(NavState::new(false), &[NavEvent::ToggleMenu, NavEvent::ToggleDropdown(A)]);
        assert!(s.menu_open);
        assert!(s.is_open(A));
    }

    #[test]
    fn test_dropdowns_are_mutually_exclusive() {
        let s = run(NavState::new(true), &[NavEvent::ToggleDropdown(A), NavEvent::ToggleDropdown(B)]);
        assert!(s.is_open(B));
        assert!(!s.is_open(A));
    }

    #[test]
    fn test_double_toggle_is_identity() {
        for start in [NavState::new(true), NavState::new(false), transition(NavState::new(false), NavEvent::ToggleMenu)] {
            let s = run(start, &[NavEvent::ToggleDropdown(A), NavEvent::ToggleDropdown(A)]);
            assert_eq!(s, start);
        }
    }

    #[test]
    fn test_escape_and_outside_click_close_everything() {
        for ev in [NavEvent::Escape, NavEvent::OutsideClick, NavEvent::SelectItem] {
            let s = run(NavState::new(false), &[NavEvent::ToggleMenu, NavEvent::ToggleDropdown(A), ev]);
            assert!(!s.anything_open());
        }
    }

    #[test]
    fn test_viewport_up_closes_menu() {
        let s = run(NavState::new(false), &[NavEvent::ToggleMenu, NavEvent::ToggleDropdown(A)]);
        let s = transition(s, NavEvent::Viewport { desktop: true });
        assert!(!s.menu_open);
        assert!(s.desktop);
        assert!(s.is_open(A));
    }

    #[test]
    fn test_viewport_down_keeps_dropdown_and_switches_activation() {
        let s = transition(NavState::new(true), NavEvent::ToggleDropdown(A));
        assert_eq!(s.activation(), Activation::Hover);
        let s = transition(s, NavEvent::Viewport { desktop: false });
        assert!(s.is_open(A));
        assert_eq!(s.activation(), Activation::Click);
    }

    #[test]
    fn test_hover_only_acts_on_desktop() {
        let mobile = transition(NavState::new(false), NavEvent::HoverEnter(A));
        assert_eq!(mobile.open_dropdown, None);

        let desk = transition(NavState::new(true), NavEvent::HoverEnter(A));
        assert!(desk.is_open(A));
        let desk = transition(desk, NavEvent::HoverEnter(B));
        assert!(desk.is_open(B));
        // Leaving a dropdown that is not open changes nothing.
        let desk = transition(desk, NavEvent::HoverLeave(A));
        assert!(desk.is_open(B));
        let desk = transition(desk, NavEvent::HoverLeave(B));
        assert_eq!(desk.open_dropdown, None);
    }

    #[test]
    fn test_hover_leave_ignored_in_click_mode() {
        let s = transition(NavState::new(false), NavEvent::ToggleDropdown(A));
        let s = transition(s, NavEvent::HoverLeave(A));
        assert!(s.is_open(A));
    }

    #[test]
    fn test_breakpoint() {
        assert!(is_desktop(80, 80));
        assert!(!is_desktop(79, 80));
    }

    #[test]
    fn test_nav_tree_lookup() {
        let tree = NavTree {
            items: vec![
                NavItem::Link {
                    label: "Inicio".into(),
                    route: Route::Home,
                },
                NavItem::Dropdown {
                    id: A,
                    label: "Práctica".into(),
                    items: vec![DropdownItem {
                        label: "Quiz".into(),
                        target: Some(Route::Quiz),
                    }],
                },
            ],
        };
        assert_eq!(tree.dropdown_at(0), None);
        assert_eq!(tree.dropdown_at(1), Some(A));
        assert_eq!(tree.dropdown_items(A).map(|i| i.len()), Some(1));
        assert!(tree.dropdown_items(B).is_none());
        assert_eq!(tree.items[1].label(), "Práctica");
    }
}

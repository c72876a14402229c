//! Next / previous / older / newer navigation

mod resolver;

pub use resolver::{Direction, NavigationResolver};

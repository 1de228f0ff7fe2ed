pub mod dashboard;
pub mod fees;
pub mod manager;
pub mod students;
pub mod transport;
pub mod years;

pub use dashboard::DashboardScreen;
pub use fees::FeesScreen;
pub use manager::ManagerScreen;
pub use students::StudentsScreen;
pub use transport::TransportScreen;
pub use years::AcademicYearsScreen;

use school_console_core::catalog;
use school_console_core::domain::{SchoolClass, Section};

/// The class manager is the generic screen with nothing added.
pub fn classes_screen() -> ManagerScreen<SchoolClass> {
    ManagerScreen::new(catalog::classes())
}

/// Likewise the section manager.
pub fn sections_screen() -> ManagerScreen<Section> {
    ManagerScreen::new(catalog::sections())
}

pub mod aggregate;
pub mod catalog;
pub mod domain;
pub mod form;
pub mod notify;
pub mod ports;
pub mod session;
pub mod store;

pub use domain::{
    AcademicYear, DashboardSummary, FeePayment, Identified, Month, RecordStatus, SchoolClass,
    Section, Student, StudentPaymentRow, TransportGroup,
};
pub use ports::{AuthPort, EntityRoute, FieldErrors, Gateway, GatewayError, GatewayResult};
pub use session::{SessionContext, SessionStatus};

pub mod models;
pub mod request;
pub mod response;

pub use models::{
    AuditLog, HealthCheck, KeyInfo, LogQuery, LoginRequest, LoginResponse, Paginated,
    RecordStatus, SignRequest, SignResponse, SystemStats, UserInfo, UserRole,
};
pub use request::ConsoleRequest;
pub use response::ConsoleResponse;

pub type Result<T, E = crate::error::AppError> = std::result::Result<T, E>;

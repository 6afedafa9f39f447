/// OpenAPI documentation generation.
pub mod documentation;
/// Core command handling and reply assembly.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Session table hydration and flushing.
pub mod session_service;
/// Storage reconnection loop with degraded-mode tracking.
pub mod storage_supervisor;
